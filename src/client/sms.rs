use chrono::Utc;

use super::{HttpMethod, SmsapiClient, SmsapiError, parse_error};
use crate::domain::{
    MessageText, RawPhoneNumber, ScheduleDate, ScheduleSmsBag, ScheduleSmsToGroupBag,
    ScheduleSmssBag, SendOptions, SendSmsBag, SendSmsToGroupBag, SendSmssBag, Sms,
};
use crate::transport::{SmsForm, SmsListResponse, SmsTarget};

/// Sending and scheduling of SMS and flash SMS (`sms.do`).
///
/// Every method validates locally, then issues exactly one request. Flash variants differ only in
/// the `flash` flag: the handset shows the message immediately and does not store it.
#[derive(Clone, Copy)]
pub struct SmsFeature<'a> {
    client: &'a SmsapiClient,
}

impl<'a> SmsFeature<'a> {
    pub(super) fn new(client: &'a SmsapiClient) -> Self {
        Self { client }
    }

    /// Send one message; the result carries the message details.
    pub async fn send_sms(&self, bag: &SendSmsBag) -> Result<Sms, SmsapiError> {
        let form = sms_form(SmsTarget::One(bag.to()), bag.message(), &bag.options, None, false);
        self.single("sms.send", form).await
    }

    pub async fn send_flash_sms(&self, bag: &SendSmsBag) -> Result<Sms, SmsapiError> {
        let form = sms_form(SmsTarget::One(bag.to()), bag.message(), &bag.options, None, true);
        self.single("sms.send_flash", form).await
    }

    /// Send to every member of a group; one result per member, without message details.
    pub async fn send_sms_to_group(
        &self,
        bag: &SendSmsToGroupBag,
    ) -> Result<Vec<Sms>, SmsapiError> {
        let form = sms_form(SmsTarget::Group(bag.group()), bag.message(), &bag.options, None, false);
        self.group("sms.send_to_group", form).await
    }

    pub async fn send_flash_sms_to_group(
        &self,
        bag: &SendSmsToGroupBag,
    ) -> Result<Vec<Sms>, SmsapiError> {
        let form = sms_form(SmsTarget::Group(bag.group()), bag.message(), &bag.options, None, true);
        self.group("sms.send_flash_to_group", form).await
    }

    /// Send to many recipients; results follow the bag's recipient order, without message
    /// details.
    pub async fn send_smss(&self, bag: &SendSmssBag) -> Result<Vec<Sms>, SmsapiError> {
        let form = sms_form(SmsTarget::Many(bag.to()), bag.message(), &bag.options, None, false);
        self.many("sms.send_many", bag.to(), form).await
    }

    pub async fn send_flash_smss(&self, bag: &SendSmssBag) -> Result<Vec<Sms>, SmsapiError> {
        let form = sms_form(SmsTarget::Many(bag.to()), bag.message(), &bag.options, None, true);
        self.many("sms.send_flash_many", bag.to(), form).await
    }

    /// Schedule one message; `date_sent` of the result equals the bag's date.
    ///
    /// Fails with [`crate::ValidationError::DateNotInFuture`] before any request when the date
    /// has already passed.
    pub async fn schedule_sms(&self, bag: &ScheduleSmsBag) -> Result<Sms, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::One(bag.to()), bag.message(), &bag.options, date, false);
        self.single("sms.schedule", form).await
    }

    pub async fn schedule_flash_sms(&self, bag: &ScheduleSmsBag) -> Result<Sms, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::One(bag.to()), bag.message(), &bag.options, date, true);
        self.single("sms.schedule_flash", form).await
    }

    pub async fn schedule_smss(&self, bag: &ScheduleSmssBag) -> Result<Vec<Sms>, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::Many(bag.to()), bag.message(), &bag.options, date, false);
        self.many("sms.schedule_many", bag.to(), form).await
    }

    pub async fn schedule_flash_smss(
        &self,
        bag: &ScheduleSmssBag,
    ) -> Result<Vec<Sms>, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::Many(bag.to()), bag.message(), &bag.options, date, true);
        self.many("sms.schedule_flash_many", bag.to(), form).await
    }

    pub async fn schedule_sms_to_group(
        &self,
        bag: &ScheduleSmsToGroupBag,
    ) -> Result<Vec<Sms>, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::Group(bag.group()), bag.message(), &bag.options, date, false);
        self.group("sms.schedule_to_group", form).await
    }

    pub async fn schedule_flash_sms_to_group(
        &self,
        bag: &ScheduleSmsToGroupBag,
    ) -> Result<Vec<Sms>, SmsapiError> {
        ensure_future(bag.date())?;
        let date = Some(bag.date());
        let form = sms_form(SmsTarget::Group(bag.group()), bag.message(), &bag.options, date, true);
        self.group("sms.schedule_flash_to_group", form).await
    }

    async fn single(&self, operation: &'static str, form: SmsForm<'_>) -> Result<Sms, SmsapiError> {
        let response = self.dispatch(operation, form).await?;
        let SmsListResponse {
            list,
            content,
            invalid_numbers,
        } = response;

        if !invalid_numbers.is_empty() {
            return Err(incomplete(operation, 1, list, invalid_numbers));
        }
        let [mut sms] = <[Sms; 1]>::try_from(list)
            .map_err(|list| incomplete(operation, 1, list, Vec::new()))?;
        sms.content = content;
        Ok(sms)
    }

    async fn many(
        &self,
        operation: &'static str,
        recipients: &[RawPhoneNumber],
        form: SmsForm<'_>,
    ) -> Result<Vec<Sms>, SmsapiError> {
        let response = self.dispatch(operation, form).await?;

        if response.list.len() != recipients.len() || !response.invalid_numbers.is_empty() {
            return Err(incomplete(
                operation,
                recipients.len(),
                response.list,
                response.invalid_numbers,
            ));
        }
        Ok(crate::transport::order_by_recipients(
            recipients,
            response.list,
        ))
    }

    async fn group(
        &self,
        operation: &'static str,
        form: SmsForm<'_>,
    ) -> Result<Vec<Sms>, SmsapiError> {
        let response = self.dispatch(operation, form).await?;

        // Membership is resolved by the gateway, so only rejected members are detectable.
        if !response.invalid_numbers.is_empty() {
            let expected = response.list.len() + response.invalid_numbers.len();
            return Err(incomplete(
                operation,
                expected,
                response.list,
                response.invalid_numbers,
            ));
        }
        Ok(response.list)
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        form: SmsForm<'_>,
    ) -> Result<SmsListResponse, SmsapiError> {
        tracing::debug!(
            operation,
            recipients = ?recipient_count(form.target),
            group = matches!(form.target, SmsTarget::Group(_)),
            flash = form.flash,
            test = form.options.test,
            scheduled = form.date.is_some(),
            "sending sms"
        );

        let params = crate::transport::encode_sms_form(&form);
        let url = self.client.endpoint(&["sms.do"]);
        let body = self
            .client
            .execute(operation, HttpMethod::Post, url, params)
            .await?;

        crate::transport::decode_sms_list_json_response(&body).map_err(parse_error)
    }
}

/// Number of recipients known before sending; group membership is resolved by the gateway.
fn recipient_count(target: SmsTarget<'_>) -> Option<usize> {
    match target {
        SmsTarget::One(_) => Some(1),
        SmsTarget::Many(to) => Some(to.len()),
        SmsTarget::Group(_) => None,
    }
}

fn ensure_future(date: ScheduleDate) -> Result<(), SmsapiError> {
    date.ensure_after(Utc::now())?;
    Ok(())
}

fn incomplete(
    operation: &'static str,
    expected: usize,
    accepted: Vec<Sms>,
    invalid_numbers: Vec<String>,
) -> SmsapiError {
    tracing::warn!(
        operation,
        expected,
        accepted = accepted.len(),
        invalid = invalid_numbers.len(),
        "gateway accepted an incomplete batch"
    );
    SmsapiError::IncompleteBatch {
        expected,
        accepted,
        invalid_numbers,
    }
}

fn sms_form<'b>(
    target: SmsTarget<'b>,
    message: &'b MessageText,
    options: &'b SendOptions,
    date: Option<ScheduleDate>,
    flash: bool,
) -> SmsForm<'b> {
    SmsForm {
        // Message details are only requested for single-recipient sends.
        details: matches!(target, SmsTarget::One(_)),
        target,
        message,
        date,
        options,
        flash,
    }
}

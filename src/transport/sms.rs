use std::collections::{HashMap, VecDeque};

use chrono::DateTime;
use serde::Deserialize;

use super::TransportError;
use super::scalar::TransportScalar;
use crate::domain::{
    ErrorCode, ExternalId, GroupName, MaxParts, MessageText, RawPhoneNumber, ScheduleDate,
    SendOptions, SenderName, Sms, SmsContent, SmsId, SmsStatus,
};

/// Who a message goes to.
#[derive(Debug, Clone, Copy)]
pub enum SmsTarget<'a> {
    One(&'a RawPhoneNumber),
    Many(&'a [RawPhoneNumber]),
    Group(&'a GroupName),
}

/// Everything `sms.do` needs for one call, borrowed from a bag.
#[derive(Debug, Clone, Copy)]
pub struct SmsForm<'a> {
    pub target: SmsTarget<'a>,
    pub message: &'a MessageText,
    pub date: Option<ScheduleDate>,
    pub options: &'a SendOptions,
    pub flash: bool,
    pub details: bool,
}

#[derive(Debug, Clone)]
pub struct SmsListResponse {
    pub list: Vec<Sms>,
    pub content: Option<SmsContent>,
    pub invalid_numbers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SmsListJson {
    #[serde(default)]
    list: Vec<SmsJsonItem>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    length: Option<u32>,
    #[serde(default)]
    parts: Option<u32>,
    #[serde(default)]
    invalid_numbers: Vec<InvalidNumberJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct SmsJsonItem {
    id: String,
    number: TransportScalar,
    date_sent: TransportScalar,
    #[serde(default)]
    submitted_number: Option<TransportScalar>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    points: Option<TransportScalar>,
    #[serde(default)]
    idx: Option<String>,
    #[serde(default)]
    error: Option<TransportScalar>,
}

#[derive(Debug, Clone, Deserialize)]
struct InvalidNumberJson {
    #[serde(default)]
    number: Option<TransportScalar>,
    #[serde(default)]
    submitted_number: Option<TransportScalar>,
}

pub fn encode_sms_form(form: &SmsForm<'_>) -> Vec<(String, String)> {
    let mut params = vec![("format".to_owned(), "json".to_owned())];

    match form.target {
        SmsTarget::One(to) => {
            params.push((RawPhoneNumber::FIELD.to_owned(), to.raw().to_owned()));
        }
        SmsTarget::Many(to) => {
            let to = to
                .iter()
                .map(RawPhoneNumber::raw)
                .collect::<Vec<_>>()
                .join(",");
            params.push((RawPhoneNumber::FIELD.to_owned(), to));
        }
        SmsTarget::Group(group) => {
            params.push((GroupName::FIELD.to_owned(), group.as_str().to_owned()));
        }
    }
    params.push((
        MessageText::FIELD.to_owned(),
        form.message.as_str().to_owned(),
    ));
    if let Some(date) = form.date {
        params.push((ScheduleDate::FIELD.to_owned(), date.timestamp().to_string()));
    }
    if form.flash {
        params.push(("flash".to_owned(), "1".to_owned()));
    }
    if form.details {
        params.push(("details".to_owned(), "1".to_owned()));
    }
    push_options(&mut params, form.options);

    params
}

fn push_options(params: &mut Vec<(String, String)>, options: &SendOptions) {
    if options.test {
        params.push(("test".to_owned(), "1".to_owned()));
    }
    if let Some(idx) = options.external_id.as_ref() {
        params.push((ExternalId::FIELD.to_owned(), idx.as_str().to_owned()));
    }
    if options.check_idx {
        params.push(("check_idx".to_owned(), "1".to_owned()));
    }
    if let Some(from) = options.sender.as_ref() {
        params.push((SenderName::FIELD.to_owned(), from.as_str().to_owned()));
    }
    if let Some(max_parts) = options.max_parts {
        params.push((MaxParts::FIELD.to_owned(), max_parts.value().to_string()));
    }
    if options.normalize {
        params.push(("normalize".to_owned(), "1".to_owned()));
    }
    if options.nounicode {
        params.push(("nounicode".to_owned(), "1".to_owned()));
    }
    if options.fast {
        params.push(("fast".to_owned(), "1".to_owned()));
    }
    if let Some(url) = options.notify_url.as_ref() {
        params.push(("notify_url".to_owned(), url.as_str().to_owned()));
    }
    if let Some(partner_id) = options.partner_id.as_ref() {
        params.push(("partner_id".to_owned(), partner_id.clone()));
    }
}

pub fn decode_sms_list_json_response(json: &str) -> Result<SmsListResponse, TransportError> {
    let parsed: SmsListJson = serde_json::from_str(json)?;

    let list = parsed
        .list
        .into_iter()
        .map(decode_sms_item)
        .collect::<Result<Vec<_>, _>>()?;

    let content = match (parsed.message, parsed.length, parsed.parts) {
        (Some(message), Some(length), Some(parts)) => Some(SmsContent {
            message,
            length,
            parts,
        }),
        _ => None,
    };

    let invalid_numbers = parsed
        .invalid_numbers
        .into_iter()
        .filter_map(|it| it.submitted_number.or(it.number))
        .map(TransportScalar::into_string)
        .collect();

    Ok(SmsListResponse {
        list,
        content,
        invalid_numbers,
    })
}

fn decode_sms_item(item: SmsJsonItem) -> Result<Sms, TransportError> {
    let id = SmsId::new(item.id).map_err(|_| TransportError::MissingField { field: "id" })?;

    let number = RawPhoneNumber::new(item.number.as_str()).map_err(|_| {
        TransportError::InvalidPhoneNumber {
            value: item.number.as_str().to_owned(),
        }
    })?;

    let date_sent = item
        .date_sent
        .as_str()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| TransportError::InvalidTimestamp {
            value: item.date_sent.as_str().to_owned(),
        })?;

    Ok(Sms {
        id,
        number,
        submitted_number: item.submitted_number.map(TransportScalar::into_string),
        date_sent,
        status: SmsStatus::new(item.status.unwrap_or_default()),
        points: item.points.map(TransportScalar::into_string),
        idx: item.idx.filter(|idx| !idx.is_empty()),
        error: item.error.map(|code| ErrorCode::new(code.into_string())),
        content: None,
    })
}

/// Reorder results to follow `recipients`.
///
/// Results are matched on `submitted_number` (then `number`), each recipient slot consumed once so
/// duplicates line up in order. Results that match nothing fill the remaining slots in server
/// order.
pub fn order_by_recipients(recipients: &[RawPhoneNumber], list: Vec<Sms>) -> Vec<Sms> {
    let mut positions = HashMap::<&str, VecDeque<usize>>::new();
    for (idx, phone) in recipients.iter().enumerate() {
        positions.entry(phone.raw()).or_default().push_back(idx);
    }

    let mut slots: Vec<Option<Sms>> = (0..recipients.len()).map(|_| None).collect();
    let mut unmatched = Vec::new();

    for sms in list {
        let slot = {
            let submitted = sms
                .submitted_number
                .as_deref()
                .map(|raw| raw.trim().trim_start_matches('+'));
            [submitted, Some(sms.number.raw())]
                .into_iter()
                .flatten()
                .find_map(|key| positions.get_mut(key).and_then(VecDeque::pop_front))
        };
        match slot {
            Some(idx) => slots[idx] = Some(sms),
            None => unmatched.push(sms),
        }
    }

    let mut unmatched = unmatched.into_iter();
    let mut ordered = slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| unmatched.next()))
        .collect::<Vec<_>>();
    ordered.extend(unmatched);
    ordered
}

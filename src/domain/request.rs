use url::Url;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ContactId, ExternalId, GroupId, GroupName, MaxParts, MessageText, RawPhoneNumber,
    ScheduleDate, SenderName,
};

pub const SEND_SMS_MAX_RECIPIENTS: usize = 10_000;

/// Optional parameters shared by every send/schedule bag.
///
/// All flags default to off; unset values are not sent to the gateway.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Sandbox mode: the gateway validates and answers but delivers nothing.
    pub test: bool,
    pub external_id: Option<ExternalId>,
    /// Reject the request when `external_id` was already used in the last 24 hours.
    pub check_idx: bool,
    pub sender: Option<SenderName>,
    pub max_parts: Option<MaxParts>,
    /// Replace national characters with their Latin counterparts.
    pub normalize: bool,
    /// Reject messages that would need UCS-2 instead of switching encoding.
    pub nounicode: bool,
    /// Priority delivery (billed higher).
    pub fast: bool,
    pub notify_url: Option<Url>,
    pub partner_id: Option<String>,
}

#[derive(Debug, Clone)]
/// Immediate send to one recipient.
pub struct SendSmsBag {
    to: RawPhoneNumber,
    message: MessageText,
    pub options: SendOptions,
}

impl SendSmsBag {
    pub fn with_message(to: RawPhoneNumber, message: MessageText) -> Self {
        Self {
            to,
            message,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone)]
/// Immediate send of one text to an ordered list of recipients.
///
/// Duplicates are kept; each occurrence yields its own result.
pub struct SendSmssBag {
    to: Vec<RawPhoneNumber>,
    message: MessageText,
    pub options: SendOptions,
}

impl SendSmssBag {
    pub fn with_message(
        to: Vec<RawPhoneNumber>,
        message: MessageText,
    ) -> Result<Self, ValidationError> {
        check_recipients(&to)?;
        Ok(Self {
            to,
            message,
            options: SendOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to(&self) -> &[RawPhoneNumber] {
        &self.to
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone)]
/// Immediate send to every member of a contacts group, resolved by the gateway.
pub struct SendSmsToGroupBag {
    group: GroupName,
    message: MessageText,
    pub options: SendOptions,
}

impl SendSmsToGroupBag {
    pub fn with_message(group: GroupName, message: MessageText) -> Self {
        Self {
            group,
            message,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn group(&self) -> &GroupName {
        &self.group
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone)]
/// Send to one recipient at a fixed instant.
pub struct ScheduleSmsBag {
    date: ScheduleDate,
    to: RawPhoneNumber,
    message: MessageText,
    pub options: SendOptions,
}

impl ScheduleSmsBag {
    pub fn with_message(date: ScheduleDate, to: RawPhoneNumber, message: MessageText) -> Self {
        Self {
            date,
            to,
            message,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn date(&self) -> ScheduleDate {
        self.date
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone)]
/// Send to an ordered list of recipients at a fixed instant.
pub struct ScheduleSmssBag {
    date: ScheduleDate,
    to: Vec<RawPhoneNumber>,
    message: MessageText,
    pub options: SendOptions,
}

impl ScheduleSmssBag {
    pub fn with_message(
        date: ScheduleDate,
        to: Vec<RawPhoneNumber>,
        message: MessageText,
    ) -> Result<Self, ValidationError> {
        check_recipients(&to)?;
        Ok(Self {
            date,
            to,
            message,
            options: SendOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn date(&self) -> ScheduleDate {
        self.date
    }

    pub fn to(&self) -> &[RawPhoneNumber] {
        &self.to
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

#[derive(Debug, Clone)]
/// Send to every member of a contacts group at a fixed instant.
pub struct ScheduleSmsToGroupBag {
    date: ScheduleDate,
    group: GroupName,
    message: MessageText,
    pub options: SendOptions,
}

impl ScheduleSmsToGroupBag {
    pub fn with_message(date: ScheduleDate, group: GroupName, message: MessageText) -> Self {
        Self {
            date,
            group,
            message,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn date(&self) -> ScheduleDate {
        self.date
    }

    pub fn group(&self) -> &GroupName {
        &self.group
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}

fn check_recipients(to: &[RawPhoneNumber]) -> Result<(), ValidationError> {
    if to.is_empty() {
        return Err(ValidationError::Empty {
            field: RawPhoneNumber::FIELD,
        });
    }
    if to.len() > SEND_SMS_MAX_RECIPIENTS {
        return Err(ValidationError::TooManyRecipients {
            max: SEND_SMS_MAX_RECIPIENTS,
            actual: to.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
/// New contact in the contacts database.
pub struct CreateContactBag {
    phone_number: RawPhoneNumber,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

impl CreateContactBag {
    pub fn with_phone_number(phone_number: RawPhoneNumber) -> Self {
        Self {
            phone_number,
            email: None,
            first_name: None,
            last_name: None,
            description: None,
        }
    }

    pub fn phone_number(&self) -> &RawPhoneNumber {
        &self.phone_number
    }
}

#[derive(Debug, Clone)]
/// New contacts group.
pub struct CreateGroupBag {
    name: GroupName,
    pub description: Option<String>,
}

impl CreateGroupBag {
    pub fn new(name: GroupName) -> Self {
        Self {
            name,
            description: None,
        }
    }

    pub fn name(&self) -> &GroupName {
        &self.name
    }
}

#[derive(Debug, Clone)]
pub struct AssignContactToGroupBag {
    contact_id: ContactId,
    group_id: GroupId,
}

impl AssignContactToGroupBag {
    pub fn new(contact_id: ContactId, group_id: GroupId) -> Self {
        Self {
            contact_id,
            group_id,
        }
    }

    pub fn contact_id(&self) -> &ContactId {
        &self.contact_id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }
}

//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    AssignContactToGroupBag, CreateContactBag, CreateGroupBag, SEND_SMS_MAX_RECIPIENTS,
    ScheduleSmsBag, ScheduleSmsToGroupBag, ScheduleSmssBag, SendOptions, SendSmsBag,
    SendSmsToGroupBag, SendSmssBag,
};
pub use response::{Contact, ContactGroup, Sms, SmsContent};
pub use validation::ValidationError;
pub use value::{
    ApiToken, ContactId, ErrorCode, ExternalId, GroupId, GroupName, KnownErrorCode,
    KnownSmsStatus, MaxParts, MessageText, PhoneNumber, RawPhoneNumber, ScheduleDate, SenderName,
    SmsEncoding, SmsId, SmsStatus,
};

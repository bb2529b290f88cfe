use chrono::{DateTime, Utc};

use crate::domain::value::{
    ContactId, ErrorCode, GroupId, GroupName, RawPhoneNumber, SmsId, SmsStatus,
};

/// One message accepted by the gateway.
///
/// For scheduled sends `date_sent` is the scheduled instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Sms {
    pub id: SmsId,
    pub number: RawPhoneNumber,
    pub submitted_number: Option<String>,
    pub date_sent: DateTime<Utc>,
    pub status: SmsStatus,
    pub points: Option<String>,
    /// Echo of the bag's external id.
    pub idx: Option<String>,
    pub error: Option<ErrorCode>,
    /// Only populated for single-recipient sends.
    pub content: Option<SmsContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsContent {
    pub message: String,
    /// Length in Unicode code points.
    pub length: u32,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub phone_number: Option<RawPhoneNumber>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactGroup {
    pub id: GroupId,
    pub name: GroupName,
    pub description: Option<String>,
    pub contacts_count: Option<u32>,
}

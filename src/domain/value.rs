use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use phonenumber::country;

use crate::domain::validation::ValidationError;

fn non_empty_trimmed(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// SMSAPI OAuth token sent as `Authorization: Bearer <token>`.
///
/// Invariant: non-empty after trimming. `Debug` output is redacted.
pub struct ApiToken(String);

impl ApiToken {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "token";

    /// Create a validated [`ApiToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name (`from`).
///
/// Invariant: non-empty after trimming. The name must be registered in your SMSAPI account.
pub struct SenderName(String);

impl SenderName {
    /// Form field name used by SMSAPI (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Character set an SMS body is transmitted in.
pub enum SmsEncoding {
    /// GSM 03.38 default alphabet (7-bit septets).
    Gsm7,
    /// UCS-2, used as soon as one character falls outside GSM-7.
    Ucs2,
}

const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";
const GSM7_EXTENSION: &str = "\u{0c}^{}\\[~]|€";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by SMSAPI (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in Unicode code points, as reported back by the gateway.
    pub fn length(&self) -> usize {
        self.0.chars().count()
    }

    /// Encoding the gateway will pick for this text.
    pub fn encoding(&self) -> SmsEncoding {
        let all_gsm = self
            .0
            .chars()
            .all(|ch| GSM7_BASIC.contains(ch) || GSM7_EXTENSION.contains(ch));
        if all_gsm {
            SmsEncoding::Gsm7
        } else {
            SmsEncoding::Ucs2
        }
    }

    /// Number of SMS parts the text is split into.
    ///
    /// GSM-7 extension characters take two septets. Concatenated messages lose
    /// room for the user data header (153 septets or 67 UCS-2 characters per part).
    pub fn estimated_parts(&self) -> usize {
        let (units, single, multi) = match self.encoding() {
            SmsEncoding::Gsm7 => {
                let septets = self
                    .0
                    .chars()
                    .map(|ch| if GSM7_EXTENSION.contains(ch) { 2 } else { 1 })
                    .sum::<usize>();
                (septets, 160, 153)
            }
            SmsEncoding::Ucs2 => (self.0.encode_utf16().count(), 70, 67),
        };
        if units <= single {
            1
        } else {
            units.div_ceil(multi)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Name of a contacts-database group (`group`).
///
/// Invariant: non-empty after trimming.
pub struct GroupName(String);

impl GroupName {
    /// Form field name used by SMSAPI (`group`).
    pub const FIELD: &'static str = "group";

    /// Create a validated [`GroupName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    /// Borrow the validated group name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-chosen message identifier (`idx`), echoed back in results.
///
/// Invariant: non-empty after trimming, at most [`ExternalId::MAX_LEN`] characters.
pub struct ExternalId(String);

impl ExternalId {
    /// Form field name used by SMSAPI (`idx`).
    pub const FIELD: &'static str = "idx";

    /// Maximum accepted length in characters.
    pub const MAX_LEN: usize = 255;

    /// Create a validated [`ExternalId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = non_empty_trimmed(value.into(), Self::FIELD)?;
        let len = value.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the validated external id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message id assigned by the gateway.
pub struct SmsId(String);

impl SmsId {
    pub const FIELD: &'static str = "id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Contact id assigned by the contacts database.
pub struct ContactId(String);

impl ContactId {
    pub const FIELD: &'static str = "contact_id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Group id assigned by the contacts database.
pub struct GroupId(String);

impl GroupId {
    pub const FIELD: &'static str = "group_id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value.into(), Self::FIELD).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number as sent to SMSAPI (`to`).
///
/// Invariant: after trimming and dropping a single leading `+`, a non-empty run of ASCII
/// digits. This type does not validate numbering plans; parse into [`PhoneNumber`] for that.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Form field name used by SMSAPI (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(digits.to_owned()))
    }

    /// Normalized value as sent to SMSAPI.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawPhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// SMSAPI expects the international form without the leading `+`.
    fn from(value: PhoneNumber) -> Self {
        let digits = value.e164.trim_start_matches('+').to_owned();
        Self(digits)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Form field name used by SMSAPI (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        if !phonenumber::is_valid(&parsed) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Instant a scheduled message is sent at (`date`).
///
/// Any timezone is accepted and converted to the same instant in UTC. Invariant: whole-second
/// precision, since the gateway reports scheduled dates as unix seconds.
pub struct ScheduleDate(DateTime<Utc>);

impl ScheduleDate {
    /// Form field name used by SMSAPI (`date`).
    pub const FIELD: &'static str = "date";

    /// Create a validated [`ScheduleDate`].
    pub fn new<Tz: TimeZone>(value: DateTime<Tz>) -> Result<Self, ValidationError> {
        let value = value.with_timezone(&Utc);
        if value.timestamp_subsec_nanos() != 0 {
            return Err(ValidationError::SubSecondDate { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// The scheduled instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Unix timestamp in seconds.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Fail unless this instant is strictly after `now`.
    pub fn ensure_after(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.0 <= now {
            return Err(ValidationError::DateNotInFuture { field: Self::FIELD });
        }
        Ok(())
    }
}

impl PartialEq<DateTime<Utc>> for ScheduleDate {
    fn eq(&self, other: &DateTime<Utc>) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Upper bound on the number of parts a message may be split into (`max_parts`).
///
/// Invariant: `1..=10`.
pub struct MaxParts(u8);

impl MaxParts {
    /// Form field name used by SMSAPI (`max_parts`).
    pub const FIELD: &'static str = "max_parts";

    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Create a validated [`MaxParts`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::MaxPartsOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Per-message delivery status reported by SMSAPI.
///
/// The value is preserved as-is even when it is unknown to this crate.
pub struct SmsStatus(String);

impl SmsStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this status to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownSmsStatus> {
        KnownSmsStatus::from_status(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known SMSAPI message statuses.
pub enum KnownSmsStatus {
    Queue,
    Sent,
    Delivered,
    Accepted,
    Undelivered,
    Expired,
    Failed,
    Rejected,
    NotFound,
    Unknown,
    Renewal,
    Stop,
}

impl KnownSmsStatus {
    /// Convert a raw status string into a known variant.
    pub fn from_status(value: &str) -> Option<Self> {
        Some(match value {
            "QUEUE" => Self::Queue,
            "SENT" => Self::Sent,
            "DELIVERED" => Self::Delivered,
            "ACCEPTED" => Self::Accepted,
            "UNDELIVERED" => Self::Undelivered,
            "EXPIRED" => Self::Expired,
            "FAILED" => Self::Failed,
            "REJECTED" => Self::Rejected,
            "NOT_FOUND" => Self::NotFound,
            "UNKNOWN" => Self::Unknown,
            "RENEWAL" => Self::Renewal,
            "STOP" => Self::Stop,
            _ => return None,
        })
    }

    /// Whether the message has left the queue for good.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Queue | Self::Sent | Self::Accepted | Self::Renewal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Error code reported by SMSAPI.
///
/// The messaging endpoints use numbers, the contacts endpoints use snake_case strings; both
/// are preserved verbatim.
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The code as provided by SMSAPI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form of the code, if it is one.
    pub fn as_i32(&self) -> Option<i32> {
        self.0.trim().parse().ok()
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownErrorCode> {
        self.as_i32().and_then(KnownErrorCode::from_code)
    }

    /// Returns `true` if this code is considered retryable by the crate.
    pub fn is_retryable(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_retryable())
    }

    /// Returns `true` if this code represents an authentication/authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known SMSAPI messaging error codes.
///
/// Unknown codes are preserved as [`ErrorCode`] and return `None` from [`KnownErrorCode::from_code`].
pub enum KnownErrorCode {
    BadRequest,
    MessageEmptyOrTooLong,
    TooManyParts,
    NoValidNumbers,
    InvalidSender,
    FlashTooLong,
    InvalidParameterCount,
    TooManyMessages,
    InvalidIdx,
    GroupNotFound,
    GroupEmpty,
    ScheduleTooFar,
    TooManyAttemptsToNumber,
    DuplicateIdx,
    InvalidDate,
    InvalidAuthorization,
    InvalidCredentials,
    InsufficientCredits,
    IpNotAllowed,
    ActionNotAllowed,
    SubmissionFailed,
    SystemError,
    TooManySimultaneousRequests,
    TooManyRequests,
}

impl KnownErrorCode {
    /// Convert a raw SMSAPI integer code into a known variant.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            8 => Self::BadRequest,
            11 => Self::MessageEmptyOrTooLong,
            12 => Self::TooManyParts,
            13 => Self::NoValidNumbers,
            14 => Self::InvalidSender,
            17 => Self::FlashTooLong,
            18 => Self::InvalidParameterCount,
            19 => Self::TooManyMessages,
            20 => Self::InvalidIdx,
            40 => Self::GroupNotFound,
            41 => Self::GroupEmpty,
            50 => Self::ScheduleTooFar,
            52 => Self::TooManyAttemptsToNumber,
            53 => Self::DuplicateIdx,
            54 => Self::InvalidDate,
            101 => Self::InvalidAuthorization,
            102 => Self::InvalidCredentials,
            103 => Self::InsufficientCredits,
            105 => Self::IpNotAllowed,
            110 => Self::ActionNotAllowed,
            200 => Self::SubmissionFailed,
            201 => Self::SystemError,
            202 => Self::TooManySimultaneousRequests,
            203 => Self::TooManyRequests,
            _ => return None,
        })
    }

    /// Whether this error is likely transient and can be retried.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::SubmissionFailed
                | Self::SystemError
                | Self::TooManySimultaneousRequests
                | Self::TooManyRequests
        )
    }

    /// Whether this error indicates invalid credentials or account permissions.
    pub fn is_auth_error(self) -> bool {
        matches!(
            self,
            Self::InvalidAuthorization
                | Self::InvalidCredentials
                | Self::IpNotAllowed
                | Self::ActionNotAllowed
        )
    }
}

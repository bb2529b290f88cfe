//! Typed Rust client for the SMSAPI HTTP API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for wire-format
//! quirks, and a small client layer orchestrating requests. Every value is validated when it is
//! constructed, so a request that reaches the network is well-formed.
//!
//! ```rust,no_run
//! use smsapi::{ApiToken, MessageText, RawPhoneNumber, SendSmsBag, SmsapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsapi::SmsapiError> {
//!     let client = SmsapiClient::new(ApiToken::new("...")?)?;
//!     let bag = SendSmsBag::with_message(
//!         RawPhoneNumber::new("48500000000")?,
//!         MessageText::new("hello")?,
//!     );
//!     let sms = client.sms().send_sms(&bag).await?;
//!     println!("{} {}", sms.id.as_str(), sms.status.as_str());
//!     Ok(())
//! }
//! ```
//!
//! The client emits `tracing` events (`debug` per request, `warn` per rejected call); install a
//! subscriber to see them.
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxError, BoxFuture, ContactsFeature, GroupsFeature, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, Service, SmsFeature, SmsapiClient, SmsapiClientBuilder, SmsapiError, TOKEN_ENV,
    URI_ENV,
};
pub use domain::{
    ApiToken, AssignContactToGroupBag, Contact, ContactGroup, ContactId, CreateContactBag,
    CreateGroupBag, ErrorCode, ExternalId, GroupId, GroupName, KnownErrorCode, KnownSmsStatus,
    MaxParts, MessageText, PhoneNumber, RawPhoneNumber, SEND_SMS_MAX_RECIPIENTS, ScheduleDate,
    ScheduleSmsBag, ScheduleSmsToGroupBag, ScheduleSmssBag, SendOptions, SendSmsBag,
    SendSmsToGroupBag, SendSmssBag, SenderName, Sms, SmsContent, SmsEncoding, SmsId, SmsStatus,
    ValidationError,
};

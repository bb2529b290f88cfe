use std::io;

use chrono::{Duration, Timelike, Utc};
use smsapi::{
    AssignContactToGroupBag, CreateContactBag, CreateGroupBag, GroupName, MessageText,
    RawPhoneNumber, ScheduleDate, ScheduleSmsToGroupBag, SmsapiClientBuilder,
};
use tracing_subscriber::EnvFilter;

/// Create a throwaway group holding one contact, schedule a message to it for tomorrow noon
/// (UTC), then remove the group and the contact again.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let phone_raw = std::env::var("SMSAPI_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSAPI_PHONE environment variable is required",
        )
    })?;

    let client = SmsapiClientBuilder::from_env()?.build()?;
    let groups = client.contacts().groups();

    let name = format!("smsapi demo {}", Utc::now().timestamp());
    let group = groups
        .create_group(&CreateGroupBag::new(GroupName::new(name)?))
        .await?;
    let contact = client
        .contacts()
        .create_contact(&CreateContactBag::with_phone_number(RawPhoneNumber::new(
            phone_raw,
        )?))
        .await?;
    groups
        .assign_contact_to_group(&AssignContactToGroupBag::new(
            contact.id.clone(),
            group.id.clone(),
        ))
        .await?;

    let noon = (Utc::now() + Duration::days(1))
        .with_hour(12)
        .and_then(|it| it.with_minute(0))
        .and_then(|it| it.with_second(0))
        .and_then(|it| it.with_nanosecond(0))
        .ok_or_else(|| io::Error::other("cannot compute tomorrow noon"))?;
    let mut bag = ScheduleSmsToGroupBag::with_message(
        ScheduleDate::new(noon)?,
        group.name.clone(),
        MessageText::new("Scheduled hello from the smsapi demo.")?,
    );
    bag.options.test = std::env::var_os("SMSAPI_TEST").is_some();

    let result = client.sms().schedule_sms_to_group(&bag).await;

    groups.delete_group(&group.id).await?;
    client.contacts().delete_contact(&contact.id).await?;

    for sms in result? {
        println!(
            "id: {}, number: {}, date_sent: {}",
            sms.id.as_str(),
            sms.number,
            sms.date_sent
        );
    }

    Ok(())
}

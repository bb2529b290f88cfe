use std::io;

use smsapi::{MessageText, RawPhoneNumber, SendOptions, SendSmsBag, SmsapiClientBuilder};
use tracing_subscriber::EnvFilter;

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
    let message = std::env::var("SMSAPI_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsapi demo.".to_owned());

    let client = SmsapiClientBuilder::from_env()?.build()?;
    let bag = SendSmsBag::with_message(RawPhoneNumber::new(phone_raw)?, MessageText::new(message)?)
        .with_options(SendOptions {
            test: std::env::var_os("SMSAPI_TEST").is_some(),
            ..SendOptions::default()
        });

    let sms = client.sms().send_sms(&bag).await?;
    println!(
        "id: {}, number: {}, status: {}, points: {:?}",
        sms.id.as_str(),
        sms.number,
        sms.status.as_str(),
        sms.points
    );
    if let Some(content) = sms.content {
        println!("length: {}, parts: {}", content.length, content.parts);
    }

    Ok(())
}

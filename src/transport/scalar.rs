use serde::Deserialize;
use serde::de::Error as DeError;

/// Scalar that SMSAPI returns as either a JSON string or a JSON number.
///
/// For numbers, the raw JSON token is preserved to avoid formatting drift
/// (`0.160` remains `"0.160"`, long phone numbers never go through `f64`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportScalar(String);

impl TransportScalar {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportScalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                Ok(Self(parsed))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom(
                "expected scalar field to be JSON string or number",
            )),
        }
    }
}

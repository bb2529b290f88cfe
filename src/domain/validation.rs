use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize, actual: usize },
    TooManyRecipients { max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    MaxPartsOutOfRange { min: u8, max: u8, actual: u8 },
    SubSecondDate { field: &'static str },
    DateNotInFuture { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::MaxPartsOutOfRange { min, max, actual } => {
                write!(
                    f,
                    "max parts out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::SubSecondDate { field } => {
                write!(f, "{field} must have whole-second precision")
            }
            Self::DateNotInFuture { field } => write!(f, "{field} must be in the future"),
        }
    }
}

impl std::error::Error for ValidationError {}

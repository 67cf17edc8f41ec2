use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidRegion { input: String },
    InvalidBaseUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidRegion { input } => write!(f, "invalid region code: {input}"),
            Self::InvalidBaseUrl { input } => write!(f, "invalid base url: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::InvalidRegion {
            input: "XQ".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid region code: XQ");

        let err = ValidationError::InvalidBaseUrl {
            input: "not a url".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid base url: not a url");
    }
}

//! The single failure kind this layer models

use thiserror::Error;

/// A rejection from an entity service call.
///
/// Network failures, validation errors and not-found responses are all opaque
/// here; the message is carried through unchanged into the `error` slot of
/// the entity state for direct display.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ServiceError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ServiceError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_raw_message() {
        let err = ServiceError::new("entity not found");
        assert_eq!(err.to_string(), "entity not found");
        assert_eq!(err.message(), "entity not found");
    }

    #[test]
    fn test_from_string_conversions() {
        let a: ServiceError = "boom".into();
        let b: ServiceError = String::from("boom").into();
        assert_eq!(a, b);
    }
}

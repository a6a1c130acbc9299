use std::{fmt, time::Duration};

use reqwest::StatusCode;
use shared::constants::*;
use shared::identity::first_error_message;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug)]
pub enum TransportError {
    Request(reqwest::Error),
    Timeout(Duration),
    Status(StatusCode),
    Malformed(String),
    /// The lookup service answered but reported its own failure.
    Remote(String),
}

impl TransportError {
    /// Connection failures, stalls and 5xx answers get one more try.
    /// A body we can't read will read the same way twice.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_decode() && !e.is_builder(),
            Self::Timeout(_) => true,
            Self::Status(status) => status.is_server_error(),
            Self::Malformed(_) | Self::Remote(_) => false,
        }
    }

    /// Stricter rule for writes to an append-only sink. A stalled or dropped
    /// request may already have landed, so only a refused connection or a 5xx
    /// answer is sent again.
    pub fn is_resendable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect(),
            Self::Status(status) => status.is_server_error(),
            Self::Timeout(_) | Self::Malformed(_) | Self::Remote(_) => false,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "Request failed: {}", e),
            Self::Timeout(after) => write!(f, "No response after {} ms", after.as_millis()),
            Self::Status(status) => write!(f, "Unexpected status {}", status),
            Self::Malformed(detail) => write!(f, "Malformed response: {}", detail),
            Self::Remote(detail) => write!(f, "Lookup service error: {}", detail),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err)
    }
}

#[derive(Debug)]
pub enum SpinError {
    Validation(ValidationErrors),
    Transport(TransportError),
    DuplicatePhone,
    AlreadySubmitted,
    NotResolved,
}

impl SpinError {
    pub fn invalid_phone() -> Self {
        let mut err = ValidationError::new("invalid_contact_digits");
        err.message = Some(INVALID_CONTACT_ERROR.into());
        let mut errors = ValidationErrors::new();
        errors.add("phone", err);
        Self::Validation(errors)
    }

    /// The notice shown to the player, if any. A suppressed duplicate
    /// dispatch is never shown.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation(errors) => Some(first_error_message(errors)),
            Self::Transport(_) => Some(NETWORK_ERROR.to_string()),
            Self::DuplicatePhone => Some(DUPLICATE_PHONE_ERROR.to_string()),
            Self::AlreadySubmitted => None,
            Self::NotResolved => Some(NOT_RESOLVED_ERROR.to_string()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl fmt::Display for SpinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "Invalid identity: {}", first_error_message(errors)),
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::DuplicatePhone => write!(f, "Phone number already redeemed an entry"),
            Self::AlreadySubmitted => write!(f, "Entry already submitted in this session"),
            Self::NotResolved => write!(f, "No prize has been resolved yet"),
        }
    }
}

impl std::error::Error for SpinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for SpinError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<ValidationErrors> for SpinError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SpinError::invalid_phone().user_message().as_deref(),
            Some(INVALID_CONTACT_ERROR)
        );
        assert_eq!(
            SpinError::DuplicatePhone.user_message().as_deref(),
            Some(DUPLICATE_PHONE_ERROR)
        );
        assert_eq!(SpinError::AlreadySubmitted.user_message(), None);
        assert!(SpinError::from(TransportError::Timeout(Duration::from_secs(1))).is_retryable());
        assert!(!SpinError::DuplicatePhone.is_retryable());
    }

    #[test]
    fn test_transport_retry_classification() {
        assert!(TransportError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(TransportError::Status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!TransportError::Status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!TransportError::Malformed("x".into()).is_retryable());
        assert!(!TransportError::Remote("sheet missing".into()).is_retryable());
    }

    #[test]
    fn test_timed_out_write_is_not_resendable() {
        assert!(!TransportError::Timeout(Duration::from_secs(1)).is_resendable());
        assert!(TransportError::Status(StatusCode::SERVICE_UNAVAILABLE).is_resendable());
        assert!(!TransportError::Status(StatusCode::BAD_REQUEST).is_resendable());
        assert!(!TransportError::Malformed("x".into()).is_resendable());
    }
}

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::constants::*;

static CONTACT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9+\-() ]{8,15}$").expect("contact pattern is valid")
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Strips everything but ASCII digits, the same way the lookup sheet
/// normalizes its stored numbers.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(error("invalid_full_name", INVALID_NAME_ERROR));
    }
    Ok(())
}

pub fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    let contact = contact.trim();
    if !CONTACT_PATTERN.is_match(contact) {
        return Err(error("invalid_contact_format", INVALID_CONTACT_ERROR));
    }
    // "(+91) -- 123" passes the character class but has too few digits
    if normalize_phone(contact).len() < MIN_PHONE_DIGITS {
        return Err(error("invalid_contact_digits", INVALID_CONTACT_ERROR));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(error("invalid_email_format", INVALID_EMAIL_ERROR));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+91 (987) 654-3210"), "919876543210");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn test_contact_accepts_formatted_numbers() {
        assert!(validate_contact("9876543210").is_ok());
        assert!(validate_contact("+91 98765-43210").is_ok());
        assert!(validate_contact("(022) 2345678").is_ok());
    }

    #[test]
    fn test_contact_rejects_bad_input() {
        assert!(validate_contact("1234567").is_err());
        assert!(validate_contact("1234567890123456").is_err());
        assert!(validate_contact("98765x43210").is_err());
        assert!(validate_contact("(+91) -- 12").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@mail.example.in").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("no-at.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name("A").is_ok());
        assert!(validate_full_name("   ").is_err());
    }
}

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FieldErrors;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Record validation run before every insert: required fields and the email
/// pattern. Returns the normalized (name, email) pair, or per-field failures
/// the caller surfaces as a creation failure.
pub fn validate_new_user(
    name: Option<&str>,
    email: Option<&str>,
) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push("name", "Name is required");
    }

    let email = email
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(&email) {
        errors.push("email", "Please enter a valid email address");
    }

    if errors.is_empty() {
        Ok((name.to_string(), email))
    } else {
        Err(errors)
    }
}

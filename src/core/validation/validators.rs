//! Custom field validators
//!
//! Plugged into form derives with `#[validate(custom(function = ...))]`.

use crate::core::editor::plain_text;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Phone numbers: digits with optional leading `+`, spaces, dashes, dots
/// and parentheses, at least 6 digits
pub fn phone(value: &str) -> Result<(), ValidationError> {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    let re = PHONE.get_or_init(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone pattern is valid"));

    let digits = value.chars().filter(char::is_ascii_digit).count();
    if re.is_match(value) && (6..=15).contains(&digits) {
        Ok(())
    } else {
        Err(error("phone", "Enter a valid phone number"))
    }
}

/// Rich text must contain visible text once markup is removed
pub fn non_empty_rich_text(value: &str) -> Result<(), ValidationError> {
    if plain_text(value).is_empty() {
        Err(error("rich_text_empty", "Content cannot be empty"))
    } else {
        Ok(())
    }
}

/// IANA-style timezone names (`UTC`, `Europe/Paris`, `America/Argentina/Salta`)
pub fn timezone(value: &str) -> Result<(), ValidationError> {
    static TZ: OnceLock<Regex> = OnceLock::new();
    let re = TZ.get_or_init(|| {
        Regex::new(r"^(UTC|GMT|[A-Z][A-Za-z_\-]+(/[A-Z0-9][A-Za-z0-9_\-+]+){1,2})$")
            .expect("timezone pattern is valid")
    });

    if re.is_match(value) {
        Ok(())
    } else {
        Err(error("timezone", "Enter a timezone such as UTC or Europe/Paris"))
    }
}

/// Working days are ISO weekday numbers 1 (Monday) to 7, at least one, no repeats
pub fn working_days(days: &[u8]) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(error("working_days_empty", "Select at least one working day"));
    }
    if days.iter().any(|d| !(1..=7).contains(d)) {
        return Err(error("working_days_range", "Working days must be between 1 and 7"));
    }
    let mut seen = [false; 8];
    for day in days {
        if std::mem::replace(&mut seen[*day as usize], true) {
            return Err(error("working_days_duplicate", "Working days must not repeat"));
        }
    }
    Ok(())
}

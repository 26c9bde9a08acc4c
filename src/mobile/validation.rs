//! Field predicates shared by the mobile forms

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

/// Optional leading `+`, then digits with single spaces or dashes between them
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]+(?:[ -][0-9]+)*$").expect("phone pattern compiles")
});

pub const PHONE_MIN_DIGITS: usize = 6;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const RUC_DIGITS: usize = 11;

/// `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    if !PHONE_RE.is_match(phone) {
        return false;
    }
    let digits = digits_only(phone).len();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Empty, or exactly eleven digits
pub fn is_valid_ruc(ruc: &str) -> bool {
    let ruc = ruc.trim();
    ruc.is_empty() || (ruc.len() == RUC_DIGITS && ruc.chars().all(|c| c.is_ascii_digit()))
}

pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

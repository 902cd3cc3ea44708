//! Field and step validation for the enrollment form.
//!
//! Everything here is pure: the caller owns the draft and decides what to do with the
//! resulting [`ValidationErrors`].

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{EnrollmentDraft, EnrollmentField, ValidationErrors, WizardStep};

pub const REQUIRED: &str = "Required";
pub const INVALID_EMAIL: &str = "Valid email required";
pub const INVALID_ROUTING_NUMBER: &str = "Invalid routing number";
pub const INVALID_ACCOUNT_NUMBER: &str = "4-17 digits required";
pub const ACCOUNT_MISMATCH: &str = "Must match";

pub const ROUTING_NUMBER_LEN: usize = 9;
pub const ACCOUNT_NUMBER_MIN_LEN: usize = 4;
pub const ACCOUNT_NUMBER_MAX_LEN: usize = 17;

const ROUTING_WEIGHTS: [u32; ROUTING_NUMBER_LEN] = [3, 7, 1, 3, 7, 1, 3, 7, 1];

static EMAIL_SHAPE: OnceLock<Regex> = OnceLock::new();

fn email_shape() -> &'static Regex {
    EMAIL_SHAPE.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"))
}

/// Validate one field against the current draft. Returns the message to show, if any.
pub fn validate_field(field: EnrollmentField, draft: &EnrollmentDraft) -> Option<&'static str> {
    match field {
        EnrollmentField::Email => (!is_valid_email(&draft.email)).then_some(INVALID_EMAIL),
        EnrollmentField::RoutingNumber => {
            (!is_valid_routing_number(&draft.routing_number)).then_some(INVALID_ROUTING_NUMBER)
        }
        EnrollmentField::AccountNumber => {
            (!is_valid_account_number(&draft.account_number)).then_some(INVALID_ACCOUNT_NUMBER)
        }
        EnrollmentField::ConfirmAccountNumber => {
            (draft.account_number != draft.confirm_account_number).then_some(ACCOUNT_MISMATCH)
        }
        EnrollmentField::AcceptTerms => (!draft.accept_terms).then_some(REQUIRED),
        EnrollmentField::AccountType => None,
        EnrollmentField::CompanyName
        | EnrollmentField::ContactName
        | EnrollmentField::Phone
        | EnrollmentField::BankName
        | EnrollmentField::AccountHolderName
        | EnrollmentField::SignatureName => {
            let value = draft.text(field).unwrap_or_default();
            value.trim().is_empty().then_some(REQUIRED)
        }
    }
}

/// Validate exactly the fields belonging to `step`.
pub fn validate_step(step: WizardStep, draft: &EnrollmentDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in step.fields() {
        if let Some(message) = validate_field(*field, draft) {
            errors.insert(*field, message);
        }
    }
    errors
}

pub fn is_valid_email(value: &str) -> bool {
    !value.is_empty() && email_shape().is_match(value)
}

/// Nine ASCII digits whose 3-7-1 weighted sum is divisible by ten.
pub fn is_valid_routing_number(value: &str) -> bool {
    if value.len() != ROUTING_NUMBER_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let checksum: u32 = value
        .bytes()
        .zip(ROUTING_WEIGHTS)
        .map(|(digit, weight)| u32::from(digit - b'0') * weight)
        .sum();
    checksum % 10 == 0
}

pub fn is_valid_account_number(value: &str) -> bool {
    (ACCOUNT_NUMBER_MIN_LEN..=ACCOUNT_NUMBER_MAX_LEN).contains(&value.len())
        && value.bytes().all(|b| b.is_ascii_digit())
}

/// Keep only ASCII digits, truncated to `max_len`.
pub fn sanitize_digits(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_len)
        .collect()
}

/// Input cap applied while typing, for the numeric fields.
pub fn digit_limit(field: EnrollmentField) -> Option<usize> {
    match field {
        EnrollmentField::RoutingNumber => Some(ROUTING_NUMBER_LEN),
        EnrollmentField::AccountNumber | EnrollmentField::ConfirmAccountNumber => {
            Some(ACCOUNT_NUMBER_MAX_LEN)
        }
        _ => None,
    }
}

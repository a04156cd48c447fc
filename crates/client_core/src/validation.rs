//! Pure validation of contact form input.
//!
//! The acceptance checkbox is checked twice: [`check_policy_guard`] runs before
//! anything else and rejects with its own longer message, while [`validate`]
//! reports the short message alongside every other field error.

use std::sync::LazyLock;

use regex::Regex;
use shared::{domain::FormField, protocol::NewContactRequest};

use crate::form::{ContactFormInput, FieldErrors};

pub const FULL_NAME_REQUIRED: &str = "El nombre es requerido";
pub const EMAIL_REQUIRED: &str = "El email es requerido";
pub const EMAIL_INVALID: &str = "Email inválido";
pub const SUBJECT_REQUIRED: &str = "El asunto es requerido";
pub const MESSAGE_REQUIRED: &str = "El mensaje es requerido";
pub const POLICY_REQUIRED: &str = "Debes aceptar la política de privacidad";
pub const POLICY_GUARD: &str = "Debes aceptar la política de privacidad para enviar el mensaje";

/// `local@domain.tld` shape: non-whitespace runs around `@` and a later `.`.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid email regex"));

/// Normalized form data that passed every rule. Only [`validate`] builds one.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedContact {
    full_name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
}

impl ValidatedContact {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidatedContact> for NewContactRequest {
    fn from(value: ValidatedContact) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            phone_number: value.phone,
            subject: value.subject,
            message: value.message,
        }
    }
}

/// Fast rejection for an unticked privacy checkbox. Yields only the
/// `acceptPolicy` key so no other field is reported on that attempt.
pub fn check_policy_guard(input: &ContactFormInput) -> Result<(), FieldErrors> {
    match policy_error(input, POLICY_GUARD) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}

pub fn validate(input: &ContactFormInput) -> Result<ValidatedContact, FieldErrors> {
    let mut errors = policy_error(input, POLICY_REQUIRED).unwrap_or_default();

    let full_name = required(
        &input.full_name,
        FormField::FullName,
        FULL_NAME_REQUIRED,
        &mut errors,
    );
    let email = required(&input.email, FormField::Email, EMAIL_REQUIRED, &mut errors);
    if email.is_some() && !EMAIL_PATTERN.is_match(&input.email) {
        errors.insert(FormField::Email, EMAIL_INVALID);
    }
    let subject = required(&input.subject, FormField::Subject, SUBJECT_REQUIRED, &mut errors);
    let message = required(&input.message, FormField::Message, MESSAGE_REQUIRED, &mut errors);

    match (full_name, email, subject, message) {
        (Some(full_name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
            Ok(ValidatedContact {
                full_name,
                email,
                phone: optional(&input.phone),
                subject,
                message,
            })
        }
        _ => Err(errors),
    }
}

fn policy_error(input: &ContactFormInput, message: &str) -> Option<FieldErrors> {
    (!input.accept_policy).then(|| FieldErrors::single(FormField::AcceptPolicy, message))
}

fn required(
    raw: &str,
    field: FormField,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;

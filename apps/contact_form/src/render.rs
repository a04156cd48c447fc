//! Text rendering of the contact form states.

use client_core::{FieldErrors, FormField, SubmitOutcome};

pub const SUCCESS_TITLE: &str = "¡Mensaje enviado!";
pub const SUCCESS_BODY: &str = "Nos pondremos en contacto contigo pronto.";
pub const HOME_LINK: &str = "Ir al inicio";

pub fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::FullName => "Nombre completo",
        FormField::Email => "Email",
        FormField::Phone => "Teléfono (opcional)",
        FormField::Subject => "Asunto",
        FormField::Message => "Mensaje",
        FormField::AcceptPolicy => "Política de privacidad",
        FormField::Submit => "Envío",
    }
}

pub fn error_lines(errors: &FieldErrors) -> Vec<String> {
    errors
        .iter()
        .map(|(field, message)| {
            if field.is_input() {
                format!("{}: {message}", field_label(field))
            } else {
                message.to_string()
            }
        })
        .collect()
}

pub fn success_lines() -> Vec<String> {
    vec![
        SUCCESS_TITLE.to_string(),
        SUCCESS_BODY.to_string(),
        format!("[{HOME_LINK}]"),
    ]
}

/// Lines to print for an outcome, given the controller's error set after it.
pub fn outcome_lines(outcome: &SubmitOutcome, errors: &FieldErrors) -> Vec<String> {
    match outcome {
        SubmitOutcome::Succeeded | SubmitOutcome::AlreadySubmitted => success_lines(),
        SubmitOutcome::Rejected(rejected) => error_lines(rejected),
        SubmitOutcome::Failed => error_lines(errors),
        SubmitOutcome::Busy => vec!["Enviando...".to_string()],
    }
}

//! Client side of the contact form: input model, validation, and the
//! submission controller that talks to the contact store.

pub mod controller;
pub mod form;
pub mod store;
pub mod validation;

pub use controller::{
    ControllerConfig, FormSnapshot, SubmissionController, SubmitOutcome, SUBMIT_FAILED_MESSAGE,
};
pub use form::{ContactFormInput, FieldErrors};
pub use shared::domain::{FormField, SubmissionState};
pub use store::{ContactStore, InsertError, RestContactStore};
pub use validation::{check_policy_guard, validate, ValidatedContact};

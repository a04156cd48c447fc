use std::{sync::Arc, time::Duration};

use shared::{
    domain::{FormField, SubmissionState},
    protocol::NewContactRequest,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    form::{ContactFormInput, FieldErrors},
    store::{ContactStore, InsertError},
    validation::{check_policy_guard, validate, ValidatedContact},
};

pub const SUBMIT_FAILED_MESSAGE: &str =
    "Hubo un error al enviar el formulario. Por favor, inténtalo de nuevo.";
pub const SUBMIT_LABEL: &str = "Enviar mensaje";
pub const SUBMITTING_LABEL: &str = "Enviando...";
pub const DEFAULT_INSERT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Upper bound on one insert call; `None` waits for the store indefinitely.
    pub insert_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            insert_timeout: Some(DEFAULT_INSERT_TIMEOUT),
        }
    }
}

/// Everything the presentation layer renders for one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub input: ContactFormInput,
    pub errors: FieldErrors,
    pub state: SubmissionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard or validation failed; nothing was sent.
    Rejected(FieldErrors),
    /// Another submission of this form is still in flight.
    Busy,
    /// The form already succeeded and accepts no further submissions.
    AlreadySubmitted,
    Succeeded,
    Failed,
}

enum Admission {
    Busy,
    AlreadySubmitted,
    Rejected(FieldErrors),
    Accepted(ValidatedContact),
}

/// Owns the submission state machine of a single contact form:
/// `Idle -> Submitting -> Succeeded | Failed`, with `Failed -> Idle` on the
/// next attempt. At most one insert is in flight per controller.
pub struct SubmissionController {
    store: Arc<dyn ContactStore>,
    config: ControllerConfig,
    snapshot: watch::Sender<FormSnapshot>,
}

impl SubmissionController {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self::with_config(store, ControllerConfig::default())
    }

    pub fn with_config(store: Arc<dyn ContactStore>, config: ControllerConfig) -> Self {
        let (snapshot, _) = watch::channel(FormSnapshot::default());
        Self {
            store,
            config,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.snapshot.borrow().state
    }

    pub fn errors(&self) -> FieldErrors {
        self.snapshot.borrow().errors.clone()
    }

    pub fn input(&self) -> ContactFormInput {
        self.snapshot.borrow().input.clone()
    }

    pub fn controls_disabled(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    /// The submit button stays disabled until the privacy checkbox is ticked.
    pub fn submit_enabled(&self) -> bool {
        let snapshot = self.snapshot.borrow();
        matches!(
            snapshot.state,
            SubmissionState::Idle | SubmissionState::Failed
        ) && snapshot.input.accept_policy
    }

    pub fn submit_label(&self) -> &'static str {
        if self.controls_disabled() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshot.subscribe()
    }

    /// Applies an edit to the live input. Ignored while a submission is in
    /// flight and after the form has succeeded.
    pub fn edit_input(&self, edit: impl FnOnce(&mut ContactFormInput)) -> bool {
        self.snapshot.send_if_modified(|snapshot| match snapshot.state {
            SubmissionState::Submitting | SubmissionState::Succeeded => false,
            SubmissionState::Idle | SubmissionState::Failed => {
                let before = snapshot.input.clone();
                edit(&mut snapshot.input);
                snapshot.input != before
            }
        })
    }

    pub async fn submit(&self, input: ContactFormInput) -> SubmitOutcome {
        let record = match self.admit(input) {
            Admission::Accepted(record) => record,
            Admission::Busy => {
                debug!("contact submission ignored; another one is in flight");
                return SubmitOutcome::Busy;
            }
            Admission::AlreadySubmitted => {
                debug!("contact submission ignored; form already succeeded");
                return SubmitOutcome::AlreadySubmitted;
            }
            Admission::Rejected(errors) => {
                debug!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "contact submission rejected by validation"
                );
                return SubmitOutcome::Rejected(errors);
            }
        };

        let request = NewContactRequest::from(record);
        info!(
            has_phone = request.phone_number.is_some(),
            "submitting contact request"
        );

        let mut in_flight = InFlight {
            snapshot: &self.snapshot,
            settled: false,
        };
        let result = self.insert(&request).await;
        in_flight.settled = true;

        match result {
            Ok(()) => {
                self.snapshot.send_modify(|snapshot| {
                    snapshot.state = SubmissionState::Succeeded;
                    snapshot.input = ContactFormInput::default();
                    snapshot.errors = FieldErrors::default();
                });
                info!("contact request stored");
                SubmitOutcome::Succeeded
            }
            Err(error) => {
                warn!(%error, "contact request insert failed");
                self.snapshot.send_modify(mark_failed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Runs guard and validation against `input` and, when both pass, moves to
    /// `Submitting` in the same critical section so racing callers see it.
    fn admit(&self, input: ContactFormInput) -> Admission {
        let mut admission = Admission::Busy;
        self.snapshot.send_if_modified(|snapshot| match snapshot.state {
            SubmissionState::Submitting => false,
            SubmissionState::Succeeded => {
                admission = Admission::AlreadySubmitted;
                false
            }
            SubmissionState::Idle | SubmissionState::Failed => {
                snapshot.input = input;
                snapshot.state = SubmissionState::Idle;
                let verdict = check_policy_guard(&snapshot.input)
                    .and_then(|()| validate(&snapshot.input));
                match verdict {
                    Ok(record) => {
                        snapshot.errors = FieldErrors::default();
                        snapshot.state = SubmissionState::Submitting;
                        admission = Admission::Accepted(record);
                    }
                    Err(errors) => {
                        snapshot.errors = errors.clone();
                        admission = Admission::Rejected(errors);
                    }
                }
                true
            }
        });
        admission
    }

    async fn insert(&self, request: &NewContactRequest) -> Result<(), InsertError> {
        match self.config.insert_timeout {
            Some(limit) => {
                tokio::time::timeout(limit, self.store.insert_contact_request(request))
                    .await
                    .map_err(|_| InsertError::TimedOut(limit))?
            }
            None => self.store.insert_contact_request(request).await,
        }
    }
}

fn mark_failed(snapshot: &mut FormSnapshot) {
    snapshot.state = SubmissionState::Failed;
    snapshot.errors = FieldErrors::single(FormField::Submit, SUBMIT_FAILED_MESSAGE);
}

/// Folds a submission whose future was dropped mid-insert into `Failed`, so
/// the form never stays locked in `Submitting`.
struct InFlight<'a> {
    snapshot: &'a watch::Sender<FormSnapshot>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(error = %InsertError::Abandoned, "contact request insert failed");
            self.snapshot.send_modify(mark_failed);
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

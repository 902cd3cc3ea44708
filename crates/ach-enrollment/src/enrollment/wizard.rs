//! Three-step enrollment flow.
//!
//! ```text
//! Identity ──advance──▶ BankAccount ──advance──▶ Authorization ──submit──▶ Submitted
//!    ▲                      │   ▲                     │    │
//!    └────────back──────────┘   └────────back─────────┘    └─ failure: stays, draft kept
//! ```
//!
//! A submission runs in two phases so the caller can await the store in between.
//! While it is in flight every other transition is refused.

use super::domain::{
    EnrollmentDraft, EnrollmentField, FieldInput, SubmissionReceipt, ValidationErrors, WizardStep,
};
use super::service::{EnrollmentSink, SubmissionAck, SubmissionError, SUBMISSION_FAILED_MESSAGE};
use super::validator::{digit_limit, sanitize_digits, validate_step};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{step} has invalid fields: {errors}")]
    Invalid {
        step: WizardStep,
        errors: ValidationErrors,
    },
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("enrollment already submitted; start a new enrollment")]
    AlreadySubmitted,
    #[error("{0} has no previous step")]
    NoPreviousStep(WizardStep),
    #[error("{0} is completed by submitting, not advancing")]
    SubmitRequired(WizardStep),
    #[error("submission is only possible from the authorization step, not {0}")]
    NotOnAuthorizationStep(WizardStep),
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error("{field} cannot be edited on {step}")]
    FieldNotOnStep {
        field: EnrollmentField,
        step: WizardStep,
    },
    #[error("input does not fit field {0}")]
    InputMismatch(EnrollmentField),
    #[error("{}", SUBMISSION_FAILED_MESSAGE)]
    Submission(#[source] SubmissionError),
}

/// Owns the draft for one enrollment attempt.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentWizard {
    step: WizardStep,
    draft: EnrollmentDraft,
    errors: ValidationErrors,
    in_flight: bool,
    last_failure: Option<SubmissionError>,
    receipt: Option<SubmissionReceipt>,
}

impl EnrollmentWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on step one with a prefilled draft.
    pub fn with_draft(draft: EnrollmentDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &EnrollmentDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Most recent failed submission, cleared by the next attempt.
    pub fn last_failure(&self) -> Option<&SubmissionError> {
        self.last_failure.as_ref()
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Apply one edit. Numeric fields keep digits only, capped at their maximum length.
    pub fn update(
        &mut self,
        field: EnrollmentField,
        input: impl Into<FieldInput>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let step = self.step();
        if !step.editable(field) {
            return Err(WizardError::FieldNotOnStep { field, step });
        }

        match (field, input.into()) {
            (EnrollmentField::AcceptTerms, FieldInput::Flag(value)) => {
                self.draft.accept_terms = value;
            }
            (EnrollmentField::AccountType, FieldInput::AccountType(value)) => {
                self.draft.account_type = value;
            }
            (field, FieldInput::Text(value)) => {
                let value = match digit_limit(field) {
                    Some(limit) => sanitize_digits(&value, limit),
                    None => value,
                };
                let slot = self
                    .draft
                    .text_mut(field)
                    .ok_or(WizardError::InputMismatch(field))?;
                *slot = value;
            }
            (field, _) => return Err(WizardError::InputMismatch(field)),
        }

        self.errors.clear_field(field);
        Ok(())
    }

    /// Validate the current step and move forward when it is clean.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let step = self.step();
        let next = step.next().ok_or(WizardError::SubmitRequired(step))?;

        self.check_step(step)?;
        self.step = next;
        Ok(next)
    }

    /// Return to the previous step without validating or touching the error set.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let step = self.step();
        let previous = step.previous().ok_or(WizardError::NoPreviousStep(step))?;
        self.step = previous;
        Ok(previous)
    }

    /// Validate the authorization step and mark a submission as in flight.
    ///
    /// Returns the draft snapshot to hand to the store. Must be followed by
    /// [`complete_submit`](Self::complete_submit).
    pub fn begin_submit(&mut self) -> Result<EnrollmentDraft, WizardError> {
        self.ensure_editable()?;
        let step = self.step();
        if step != WizardStep::Authorization {
            return Err(WizardError::NotOnAuthorizationStep(step));
        }

        self.check_step(step)?;
        self.in_flight = true;
        self.last_failure = None;
        Ok(self.draft.clone())
    }

    /// Settle the in-flight submission. Failures keep the wizard on the authorization
    /// step with the draft intact so the signer can retry.
    pub fn complete_submit(
        &mut self,
        outcome: Result<SubmissionAck, SubmissionError>,
    ) -> Result<&SubmissionReceipt, WizardError> {
        if !self.in_flight {
            return Err(WizardError::NotSubmitting);
        }
        self.in_flight = false;

        match outcome {
            Ok(_ack) => {
                self.step = WizardStep::Submitted;
                let receipt = self
                    .receipt
                    .insert(SubmissionReceipt::from_draft(&self.draft));
                Ok(&*receipt)
            }
            Err(err) => {
                self.last_failure = Some(err.clone());
                Err(WizardError::Submission(err))
            }
        }
    }

    /// Run both submission phases against a synchronous sink.
    pub fn submit<K>(&mut self, sink: &K) -> Result<&SubmissionReceipt, WizardError>
    where
        K: EnrollmentSink + ?Sized,
    {
        let draft = self.begin_submit()?;
        let outcome = sink.submit(&draft);
        self.complete_submit(outcome)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.in_flight {
            return Err(WizardError::SubmissionPending);
        }
        if self.step() == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(())
    }

    fn check_step(&mut self, step: WizardStep) -> Result<(), WizardError> {
        self.errors = validate_step(step, &self.draft);
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Invalid {
                step,
                errors: self.errors.clone(),
            })
        }
    }
}

//! Enrollment intake: field validation, the three-step wizard, payload normalization,
//! and persistence handoff.

pub mod domain;
pub mod gateway;
pub mod repository;
pub mod router;
pub mod service;
pub mod validator;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    mandate_text, AccountType, EnrollmentDraft, EnrollmentField, FieldInput, SubmissionReceipt,
    ValidationErrors, WizardStep,
};
pub use gateway::{FieldAliases, GatewayError, SubmissionGateway, STANDARD_ALIASES};
pub use repository::{CanonicalRecord, StoreError, Submission, SubmissionId, SubmissionStore};
pub use router::{enrollment_router, EnrollmentApi};
pub use service::{
    EnrollmentService, EnrollmentSink, SubmissionAck, SubmissionError, SUBMISSION_FAILED_MESSAGE,
};
pub use validator::{validate_field, validate_step};
pub use wizard::{EnrollmentWizard, WizardError};

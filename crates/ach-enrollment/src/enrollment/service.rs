use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::EnrollmentDraft;
use super::gateway::{GatewayError, SubmissionGateway};
use super::repository::{CanonicalRecord, Submission, SubmissionId, SubmissionStore};
use crate::enrollment::repository::StoreError;
use crate::telemetry::last_four_hint;

/// Message shown to the signer whenever a submission attempt fails.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed. Please try again.";

/// Acknowledgment returned once the store accepted an enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAck {
    pub id: SubmissionId,
}

/// Destination for completed wizard drafts.
pub trait EnrollmentSink {
    fn submit(&self, draft: &EnrollmentDraft) -> Result<SubmissionAck, SubmissionError>;
}

/// Error raised while creating an enrollment. Always retryable from the caller's side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(#[from] GatewayError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Normalizes incoming enrollments and persists them.
pub struct EnrollmentService<S> {
    gateway: SubmissionGateway,
    store: Arc<S>,
}

impl<S> EnrollmentService<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_gateway(SubmissionGateway::standard(), store)
    }

    pub fn with_gateway(gateway: SubmissionGateway, store: Arc<S>) -> Self {
        Self { gateway, store }
    }

    /// Accept a loosely shaped payload from any submitter.
    pub fn submit_payload(&self, payload: &Value) -> Result<Submission, SubmissionError> {
        let record = self.gateway.normalize(payload).map_err(|err| {
            warn!(error = %err, "enrollment payload rejected");
            err
        })?;
        self.persist(record)
    }

    fn persist(&self, record: CanonicalRecord) -> Result<Submission, SubmissionError> {
        match self.store.insert(record) {
            Ok(stored) => {
                info!(
                    submission_id = %stored.id,
                    company = %stored.record.company_name,
                    account = %last_four_hint(&stored.record.account_number),
                    "enrollment stored"
                );
                Ok(stored)
            }
            Err(err) => {
                warn!(error = %err, "enrollment store insert failed");
                Err(err.into())
            }
        }
    }
}

impl<S> EnrollmentSink for EnrollmentService<S>
where
    S: SubmissionStore + 'static,
{
    fn submit(&self, draft: &EnrollmentDraft) -> Result<SubmissionAck, SubmissionError> {
        let record = self.gateway.normalize_draft(draft, Utc::now());
        let stored = self.persist(record)?;
        Ok(SubmissionAck { id: stored.id })
    }
}

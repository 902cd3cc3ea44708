use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{last_four, AccountType};

/// Opaque identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Fixed-shape enrollment record handed to persistence. Field names are part of the
/// storage contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_type: AccountType,
    pub routing_number: String,
    pub account_number: String,
    pub signature_name: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub viewed: bool,
}

impl CanonicalRecord {
    pub fn account_last_four(&self) -> String {
        last_four(&self.account_number)
    }
}

/// A stored enrollment as listed back to reviewers. Only `viewed` ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub record: CanonicalRecord,
}

impl Submission {
    pub fn viewed(&self) -> bool {
        self.record.viewed
    }

    pub fn status_label(&self) -> &'static str {
        if self.record.viewed {
            "Viewed"
        } else {
            "New"
        }
    }
}

/// Persistence collaborator. Implementations decide ids and ordering.
pub trait SubmissionStore: Send + Sync {
    fn insert(&self, record: CanonicalRecord) -> Result<Submission, StoreError>;
    fn list(&self) -> Result<Vec<Submission>, StoreError>;
    fn set_viewed(&self, id: &SubmissionId, viewed: bool) -> Result<(), StoreError>;
    fn delete(&self, id: &SubmissionId) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("submission not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

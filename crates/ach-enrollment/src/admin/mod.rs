//! Reviewer tooling: the redacted-by-default submission projection and the authenticated
//! HTTP surface over the store.

pub mod auth;
pub mod feedback;
pub mod ports;
pub mod review;
pub mod router;

#[cfg(test)]
mod tests;

pub use auth::{bearer_token, CredentialCheck, SharedSecret};
pub use feedback::{CopyFeedback, COPY_FEEDBACK_TTL};
pub use ports::{Clipboard, ClipboardError, ConfirmPrompt};
pub use review::{
    AdminError, AdminReviewStore, DeleteOutcome, Mutation, OpenedSubmission, SubmissionRow,
    ACCOUNT_LABEL, DELETE_PROMPT, MASK_PREFIX, ROUTING_LABEL,
};
pub use router::{admin_router, AdminApi};

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::auth::CredentialCheck;
use super::feedback::CopyFeedback;
use super::ports::{Clipboard, ClipboardError, ConfirmPrompt};
use crate::enrollment::repository::{StoreError, Submission, SubmissionId, SubmissionStore};

pub const MASK_PREFIX: &str = "••••••••";
pub const DELETE_PROMPT: &str = "Delete this submission?";
pub const ROUTING_LABEL: &str = "routing";
pub const ACCOUNT_LABEL: &str = "account";

/// Store mutation that was applied locally before the store answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    MarkViewed,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::MarkViewed => f.write_str("mark viewed"),
            Mutation::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("invalid admin credential")]
    Auth,
    #[error("admin session is not authenticated")]
    NotAuthenticated,
    #[error("submission {0} is not in the current list")]
    UnknownSubmission(SubmissionId),
    #[error("could not load submissions: {0}")]
    Load(#[source] StoreError),
    /// The local projection already reflects the change; the store does not. Not reconciled.
    #[error("{mutation} of {id} applied locally but the store rejected it: {source}")]
    StoreMutation {
        mutation: Mutation,
        id: SubmissionId,
        #[source]
        source: StoreError,
    },
    #[error("account number for {0} is masked")]
    AccountMasked(SubmissionId),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// List-row rendering: never exposes more than the last four account digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRow {
    pub id: SubmissionId,
    pub company_name: String,
    pub contact_name: String,
    pub bank_name: String,
    pub account_hint: String,
    pub submitted_on: String,
    pub status: &'static str,
}

/// Record selected for the detail view, with the outcome of persisting its viewed flag.
#[derive(Debug)]
pub struct OpenedSubmission<'a> {
    pub submission: &'a Submission,
    pub marked: Result<(), AdminError>,
}

struct AdminSession {
    credential: String,
    submissions: Vec<Submission>,
    revealed: HashSet<SubmissionId>,
    opened: Option<SubmissionId>,
}

impl AdminSession {
    fn find(&self, id: &SubmissionId) -> Result<&Submission, AdminError> {
        self.submissions
            .iter()
            .find(|submission| &submission.id == id)
            .ok_or_else(|| AdminError::UnknownSubmission(id.clone()))
    }

    fn find_mut(&mut self, id: &SubmissionId) -> Result<&mut Submission, AdminError> {
        self.submissions
            .iter_mut()
            .find(|submission| &submission.id == id)
            .ok_or_else(|| AdminError::UnknownSubmission(id.clone()))
    }

    fn replace_submissions(&mut self, submissions: Vec<Submission>) {
        let present: HashSet<&SubmissionId> =
            submissions.iter().map(|submission| &submission.id).collect();
        self.revealed.retain(|id| present.contains(id));
        if let Some(opened) = &self.opened {
            if !present.contains(opened) {
                self.opened = None;
            }
        }
        self.submissions = submissions;
    }
}

/// Reviewer-side projection of stored submissions.
///
/// Holds the session credential, the list as last pulled from the store, which account
/// numbers are revealed, and the transient "copied" label. Nothing here is persisted.
pub struct AdminReviewStore<S> {
    store: Arc<S>,
    credentials: Arc<dyn CredentialCheck>,
    clipboard: Arc<dyn Clipboard>,
    prompt: Arc<dyn ConfirmPrompt>,
    session: Option<AdminSession>,
    feedback: CopyFeedback,
}

impl<S> AdminReviewStore<S>
where
    S: SubmissionStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        credentials: Arc<dyn CredentialCheck>,
        clipboard: Arc<dyn Clipboard>,
        prompt: Arc<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            store,
            credentials,
            clipboard,
            prompt,
            session: None,
            feedback: CopyFeedback::default(),
        }
    }

    pub fn with_feedback(mut self, feedback: CopyFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Check the credential and pull the submission list. No session exists unless both succeed.
    pub fn authenticate(&mut self, credential: &str) -> Result<&[Submission], AdminError> {
        if !self.credentials.verify(credential) {
            warn!("admin credential rejected");
            self.session = None;
            return Err(AdminError::Auth);
        }

        let submissions = self.store.list().map_err(AdminError::Load)?;
        info!(count = submissions.len(), "admin session opened");
        let session = self.session.insert(AdminSession {
            credential: credential.to_string(),
            submissions,
            revealed: HashSet::new(),
            opened: None,
        });
        Ok(session.submissions.as_slice())
    }

    /// Re-pull the list with the held credential. Reveal flags survive for records still present.
    pub fn refresh(&mut self) -> Result<&[Submission], AdminError> {
        let credential = self.session()?.credential.clone();
        if !self.credentials.verify(&credential) {
            warn!("held admin credential no longer accepted");
            self.logout();
            return Err(AdminError::Auth);
        }

        let submissions = self.store.list().map_err(AdminError::Load)?;
        let session = self.session_mut()?;
        session.replace_submissions(submissions);
        Ok(session.submissions.as_slice())
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.feedback.clear();
    }

    /// Submissions in store order.
    pub fn list(&self) -> Result<&[Submission], AdminError> {
        Ok(self.session()?.submissions.as_slice())
    }

    pub fn rows(&self) -> Result<Vec<SubmissionRow>, AdminError> {
        let session = self.session()?;
        Ok(session
            .submissions
            .iter()
            .map(|submission| SubmissionRow {
                id: submission.id.clone(),
                company_name: submission.record.company_name.clone(),
                contact_name: submission.record.contact_name.clone(),
                bank_name: submission.record.bank_name.clone(),
                account_hint: format!("****{}", submission.record.account_last_four()),
                submitted_on: submission
                    .record
                    .submitted_at
                    .format("%Y-%m-%d")
                    .to_string(),
                status: submission.status_label(),
            })
            .collect())
    }

    pub fn submission(&self, id: &SubmissionId) -> Result<&Submission, AdminError> {
        self.session()?.find(id)
    }

    /// Select a submission for the detail view and mark it viewed.
    ///
    /// The detail view opens even when the store rejects the viewed flag; that failure is
    /// carried in [`OpenedSubmission::marked`] rather than failing the call.
    pub fn open(&mut self, id: &SubmissionId) -> Result<OpenedSubmission<'_>, AdminError> {
        self.session()?.find(id)?;
        self.session_mut()?.opened = Some(id.clone());
        let marked = self.mark_viewed(id);
        let submission = self.session()?.find(id)?;
        Ok(OpenedSubmission { submission, marked })
    }

    pub fn opened(&self) -> Option<&Submission> {
        let session = self.session.as_ref()?;
        let id = session.opened.as_ref()?;
        session.find(id).ok()
    }

    pub fn close(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.opened = None;
        }
    }

    /// Idempotent: a record already marked viewed is left alone and the store is not called.
    pub fn mark_viewed(&mut self, id: &SubmissionId) -> Result<(), AdminError> {
        let submission = self.session_mut()?.find_mut(id)?;
        if submission.record.viewed {
            return Ok(());
        }
        submission.record.viewed = true;

        self.store.set_viewed(id, true).map_err(|source| {
            warn!(submission_id = %id, error = %source, "mark viewed not persisted");
            AdminError::StoreMutation {
                mutation: Mutation::MarkViewed,
                id: id.clone(),
                source,
            }
        })
    }

    pub fn reveal(&mut self, id: &SubmissionId) -> Result<(), AdminError> {
        let session = self.session_mut()?;
        session.find(id)?;
        session.revealed.insert(id.clone());
        Ok(())
    }

    pub fn mask(&mut self, id: &SubmissionId) -> Result<(), AdminError> {
        let session = self.session_mut()?;
        session.find(id)?;
        session.revealed.remove(id);
        Ok(())
    }

    /// Flip the disclosure state, returning whether the number is now revealed.
    pub fn toggle_reveal(&mut self, id: &SubmissionId) -> Result<bool, AdminError> {
        if self.is_revealed(id) {
            self.mask(id)?;
            Ok(false)
        } else {
            self.reveal(id)?;
            Ok(true)
        }
    }

    pub fn is_revealed(&self, id: &SubmissionId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.revealed.contains(id))
    }

    /// Account number as it should be rendered right now.
    pub fn account_display(&self, id: &SubmissionId) -> Result<String, AdminError> {
        let submission = self.submission(id)?;
        if self.is_revealed(id) {
            Ok(submission.record.account_number.clone())
        } else {
            Ok(format!(
                "{MASK_PREFIX}{}",
                submission.record.account_last_four()
            ))
        }
    }

    /// Put `value` on the clipboard and show `label` as copied for the feedback window.
    pub fn copy(&mut self, value: &str, label: &str) -> Result<(), AdminError> {
        self.clipboard.write_text(value)?;
        self.feedback.record(label);
        Ok(())
    }

    pub fn copy_routing_number(&mut self, id: &SubmissionId) -> Result<(), AdminError> {
        let routing = self.submission(id)?.record.routing_number.clone();
        self.copy(&routing, ROUTING_LABEL)
    }

    /// Only a revealed account number can be copied.
    pub fn copy_account_number(&mut self, id: &SubmissionId) -> Result<(), AdminError> {
        let account = self.submission(id)?.record.account_number.clone();
        if !self.is_revealed(id) {
            return Err(AdminError::AccountMasked(id.clone()));
        }
        self.copy(&account, ACCOUNT_LABEL)
    }

    /// Label of the most recent copy, empty once its feedback window has elapsed.
    pub fn copied(&self) -> &str {
        self.feedback.label()
    }

    /// Ask for confirmation, drop the record locally, then delete it from the store.
    ///
    /// The local removal stands even when the store delete fails; the returned
    /// [`AdminError::StoreMutation`] is the only signal of the divergence.
    pub fn delete(&mut self, id: &SubmissionId) -> Result<DeleteOutcome, AdminError> {
        self.session()?.find(id)?;
        if !self.prompt.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let session = self.session_mut()?;
        session.submissions.retain(|submission| &submission.id != id);
        session.revealed.remove(id);
        if session.opened.as_ref() == Some(id) {
            session.opened = None;
        }

        match self.store.delete(id) {
            Ok(()) => {
                info!(submission_id = %id, "submission deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(source) => {
                warn!(submission_id = %id, error = %source, "delete not persisted");
                Err(AdminError::StoreMutation {
                    mutation: Mutation::Delete,
                    id: id.clone(),
                    source,
                })
            }
        }
    }

    fn session(&self) -> Result<&AdminSession, AdminError> {
        self.session.as_ref().ok_or(AdminError::NotAuthenticated)
    }

    fn session_mut(&mut self) -> Result<&mut AdminSession, AdminError> {
        self.session.as_mut().ok_or(AdminError::NotAuthenticated)
    }
}

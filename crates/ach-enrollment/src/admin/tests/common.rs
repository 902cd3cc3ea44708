use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::admin::auth::SharedSecret;
use crate::admin::ports::{Clipboard, ClipboardError, ConfirmPrompt};
use crate::admin::review::AdminReviewStore;
use crate::enrollment::domain::AccountType;
use crate::enrollment::repository::{
    CanonicalRecord, StoreError, Submission, SubmissionId, SubmissionStore,
};

pub(super) const SECRET: &str = "hunter2";

/// Store seeded with fixed submissions; mutations can be switched to fail.
#[derive(Default)]
pub(super) struct SeededStore {
    records: Mutex<Vec<Submission>>,
    fail_mutations: AtomicBool,
    set_viewed_calls: Mutex<Vec<SubmissionId>>,
}

impl SeededStore {
    pub(super) fn with(records: Vec<Submission>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub(super) fn fail_mutations(&self) {
        self.fail_mutations.store(true, Ordering::SeqCst);
    }

    pub(super) fn records(&self) -> Vec<Submission> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn set_viewed_calls(&self) -> Vec<SubmissionId> {
        self.set_viewed_calls
            .lock()
            .expect("calls mutex poisoned")
            .clone()
    }

    pub(super) fn push(&self, submission: Submission) {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(submission);
    }

    fn check_mutation(&self) -> Result<(), StoreError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("write timeout".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SubmissionStore for SeededStore {
    fn insert(&self, record: CanonicalRecord) -> Result<Submission, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let stored = Submission {
            id: SubmissionId(format!("sub-{:04}", guard.len() + 1)),
            record,
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.records())
    }

    fn set_viewed(&self, id: &SubmissionId, viewed: bool) -> Result<(), StoreError> {
        self.set_viewed_calls
            .lock()
            .expect("calls mutex poisoned")
            .push(id.clone());
        self.check_mutation()?;
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|submission| &submission.id == id)
            .ok_or(StoreError::NotFound)?;
        record.record.viewed = viewed;
        Ok(())
    }

    fn delete(&self, id: &SubmissionId) -> Result<(), StoreError> {
        self.check_mutation()?;
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let before = guard.len();
        guard.retain(|submission| &submission.id != id);
        if guard.len() == before {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub(super) struct RecordingClipboard {
    pub(super) writes: Mutex<Vec<String>>,
    pub(super) broken: bool,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.broken {
            return Err(ClipboardError::Unavailable("no display".to_string()));
        }
        self.writes
            .lock()
            .expect("clipboard mutex poisoned")
            .push(text.to_string());
        Ok(())
    }
}

pub(super) struct FixedAnswer {
    pub(super) answer: bool,
    pub(super) asked: Mutex<Vec<String>>,
}

impl FixedAnswer {
    pub(super) fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, message: &str) -> bool {
        self.asked
            .lock()
            .expect("prompt mutex poisoned")
            .push(message.to_string());
        self.answer
    }
}

pub(super) fn submission(id: &str, company: &str, account_number: &str) -> Submission {
    Submission {
        id: SubmissionId::from(id),
        record: CanonicalRecord {
            company_name: company.to_string(),
            contact_name: "Dana Ruiz".to_string(),
            email: "dana@acmefreight.com".to_string(),
            phone: "515-555-0100".to_string(),
            bank_name: "First Prairie Bank".to_string(),
            account_holder_name: company.to_string(),
            account_type: AccountType::Checking,
            routing_number: "021000021".to_string(),
            account_number: account_number.to_string(),
            signature_name: "Dana Ruiz".to_string(),
            submitted_at: Utc
                .with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
                .single()
                .expect("valid timestamp"),
            viewed: false,
        },
    }
}

pub(super) fn seeded_store() -> Arc<SeededStore> {
    Arc::new(SeededStore::with(vec![
        submission("sub-0002", "Zephyr Logistics", "000123456789"),
        submission("sub-0001", "Acme Freight LLC", "4455667788"),
    ]))
}

pub(super) struct Harness {
    pub(super) store: Arc<SeededStore>,
    pub(super) clipboard: Arc<RecordingClipboard>,
    pub(super) prompt: Arc<FixedAnswer>,
    pub(super) review: AdminReviewStore<SeededStore>,
}

pub(super) fn harness_with(confirm: bool) -> Harness {
    let store = seeded_store();
    let clipboard = Arc::new(RecordingClipboard::default());
    let prompt = Arc::new(FixedAnswer::new(confirm));
    let review = AdminReviewStore::new(
        store.clone(),
        Arc::new(SharedSecret::new(SECRET)),
        clipboard.clone(),
        prompt.clone(),
    );
    Harness {
        store,
        clipboard,
        prompt,
        review,
    }
}

pub(super) fn logged_in(confirm: bool) -> Harness {
    let mut harness = harness_with(confirm);
    harness
        .review
        .authenticate(SECRET)
        .expect("credential accepted");
    harness
}

pub(super) struct OfflineStore;

impl SubmissionStore for OfflineStore {
    fn insert(&self, _record: CanonicalRecord) -> Result<Submission, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_viewed(&self, _id: &SubmissionId, _viewed: bool) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &SubmissionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

use ach_enrollment::admin::{Clipboard, ClipboardError, ConfirmPrompt};
use ach_enrollment::enrollment::{CanonicalRecord, StoreError, Submission, SubmissionId, SubmissionStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store. Submissions are listed in insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    records: Arc<Mutex<Vec<Submission>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemorySubmissionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Submission>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("submission store lock poisoned".to_string()))
    }
}

impl SubmissionStore for InMemorySubmissionStore {
    fn insert(&self, record: CanonicalRecord) -> Result<Submission, StoreError> {
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Submission {
            id: SubmissionId(format!("sub-{next:06}")),
            record,
        };
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn set_viewed(&self, id: &SubmissionId, viewed: bool) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let submission = guard
            .iter_mut()
            .find(|submission| &submission.id == id)
            .ok_or(StoreError::NotFound)?;
        submission.record.viewed = viewed;
        Ok(())
    }

    fn delete(&self, id: &SubmissionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let position = guard
            .iter()
            .position(|submission| &submission.id == id)
            .ok_or(StoreError::NotFound)?;
        guard.remove(position);
        Ok(())
    }
}

/// Clipboard that keeps what was copied so the demo can echo it.
#[derive(Default)]
pub(crate) struct InMemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl InMemoryClipboard {
    pub(crate) fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for InMemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// Prompt with a fixed answer, printing the question it was asked.
pub(crate) struct ScriptedPrompt {
    pub(crate) answer: bool,
}

impl ConfirmPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        println!("  ? {message} {}", if self.answer { "[y]" } else { "[n]" });
        self.answer
    }
}

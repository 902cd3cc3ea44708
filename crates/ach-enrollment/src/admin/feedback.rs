use std::time::Duration;

use tokio::time::Instant;

/// How long the "copied" label stays visible after a copy.
pub const COPY_FEEDBACK_TTL: Duration = Duration::from_millis(2000);

/// Single-slot "copied" indicator. A newer copy replaces the label and its deadline, so
/// only the most recent copy's expiry matters.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    ttl: Duration,
    current: Option<(String, Instant)>,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::with_ttl(COPY_FEEDBACK_TTL)
    }
}

impl CopyFeedback {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn record(&mut self, label: impl Into<String>) {
        self.current = Some((label.into(), Instant::now() + self.ttl));
    }

    /// Label of the last copy, or an empty string once its deadline passed.
    pub fn label(&self) -> &str {
        match &self.current {
            Some((label, deadline)) if Instant::now() < *deadline => label,
            _ => "",
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn label_expires_after_ttl() {
        let mut feedback = CopyFeedback::default();
        assert_eq!(feedback.label(), "");

        feedback.record("routing");
        advance(Duration::from_millis(1999)).await;
        assert_eq!(feedback.label(), "routing");

        advance(Duration::from_millis(1)).await;
        assert_eq!(feedback.label(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn newer_copy_overrides_pending_expiry() {
        let mut feedback = CopyFeedback::default();
        feedback.record("routing");
        advance(Duration::from_millis(500)).await;
        feedback.record("account");

        advance(Duration::from_millis(1500)).await;
        assert_eq!(feedback.label(), "account");

        advance(Duration::from_millis(500)).await;
        assert_eq!(feedback.label(), "");
    }
}

//! Scripted reputation source for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::ReputationError;
use super::sources::{LookupContext, ReputationSource};
use super::types::{ReputationSignal, SourceKind};

/// Answers from a fixed table. Unknown usernames return `UserNotFound`.
pub struct MockReputationSource {
    kind: SourceKind,
    signals: HashMap<String, ReputationSignal>,
    failing: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_token: parking_lot::Mutex<Option<String>>,
}

impl MockReputationSource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            signals: HashMap::new(),
            failing: false,
            delay: None,
            calls: AtomicUsize::new(0),
            last_token: parking_lot::Mutex::new(None),
        }
    }

    pub fn with_signal(mut self, username: &str, signal: ReputationSignal) -> Self {
        self.signals.insert(username.to_string(), signal);
        self
    }

    /// Every lookup fails with a request error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Every lookup sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().clone()
    }
}

#[async_trait]
impl ReputationSource for MockReputationSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn lookup(
        &self,
        username: &str,
        ctx: &LookupContext,
    ) -> Result<ReputationSignal, ReputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock() = ctx.github_token.clone();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing {
            return Err(ReputationError::RequestFailed {
                source_kind: self.kind,
                reason: "mock failure".to_string(),
            });
        }

        self.signals
            .get(username)
            .copied()
            .ok_or_else(|| ReputationError::UserNotFound {
                source_kind: self.kind,
                username: username.to_string(),
            })
    }
}

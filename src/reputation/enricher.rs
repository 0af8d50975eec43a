use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use moka::sync::Cache;
use tracing::{debug, warn};

use crate::candidate::{CandidateId, ScoredCandidate};

use super::config::ReputationConfig;
use super::error::ReputationError;
use super::sources::{LookupContext, ReputationSource, http_sources};
use super::types::{ReputationProfile, ReputationSignal, SourceKind};
use super::usernames::extract_usernames;

type SignalKey = (SourceKind, String);

/// Attaches a reputation score to shortlisted candidates.
///
/// Never fails: every lookup error or timeout becomes the zero signal for that source.
pub struct ReputationEnricher {
    sources: Vec<Arc<dyn ReputationSource>>,
    cache: Cache<SignalKey, ReputationSignal>,
    timeout: Duration,
    concurrency: usize,
}

impl std::fmt::Debug for ReputationEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReputationEnricher")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .field("timeout", &self.timeout)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl ReputationEnricher {
    pub fn new(sources: Vec<Arc<dyn ReputationSource>>, config: &ReputationConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            sources,
            cache,
            timeout: config.timeout,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Builds an enricher backed by the GitHub, LeetCode and CodeChef HTTP sources.
    pub fn from_config(config: &ReputationConfig) -> Result<Self, ReputationError> {
        Ok(Self::new(http_sources(config)?, config))
    }

    /// An enricher with no sources; every candidate scores zero.
    pub fn disabled() -> Self {
        Self::new(Vec::new(), &ReputationConfig::default())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Extracts usernames from `text` and looks each one up concurrently.
    pub async fn profile(&self, text: &str, ctx: &LookupContext) -> ReputationProfile {
        let usernames = extract_usernames(text);
        let mut profile = ReputationProfile::new(usernames.clone());

        if usernames.is_empty() {
            return profile;
        }

        let mut lookups = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            if let Some(username) = usernames.get(source.kind()) {
                lookups.push(self.lookup(source.as_ref(), username, ctx));
            }
        }

        for signal in join_all(lookups).await {
            profile.apply(signal);
        }

        profile
    }

    async fn lookup(
        &self,
        source: &dyn ReputationSource,
        username: &str,
        ctx: &LookupContext,
    ) -> ReputationSignal {
        let kind = source.kind();
        let key = (kind, username.to_lowercase());

        if let Some(signal) = self.cache.get(&key) {
            debug!(source = %kind, username = %username, "Reputation cache hit");
            return signal;
        }

        let result = match tokio::time::timeout(self.timeout, source.lookup(username, ctx)).await {
            Ok(result) => result,
            Err(_) => Err(ReputationError::Timeout {
                source_kind: kind,
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(signal) if signal.kind() == kind => {
                self.cache.insert(key, signal);
                signal
            }
            Ok(signal) => {
                warn!(
                    source = %kind,
                    returned = %signal.kind(),
                    "Reputation source returned a signal for another platform, ignoring"
                );
                ReputationSignal::zero(kind)
            }
            Err(e) => {
                warn!(
                    source = %kind,
                    username = %username,
                    error = %e,
                    "Reputation lookup failed, using zero signal"
                );
                ReputationSignal::zero(kind)
            }
        }
    }

    /// Adds `reputation_score` to every candidate in `shortlist`, preserving order.
    pub async fn enrich(
        &self,
        shortlist: Vec<ScoredCandidate>,
        ctx: &LookupContext,
    ) -> Vec<ScoredCandidate> {
        debug!(
            num_candidates = shortlist.len(),
            concurrency = self.concurrency,
            "Enriching shortlist with reputation"
        );

        let lookups: Vec<_> = shortlist
            .iter()
            .map(|c| (c.id().clone(), c.candidate().effective_text().to_string()))
            .map(|(id, text)| async move {
                let profile = self.profile(&text, ctx).await;
                (id, profile)
            })
            .collect();

        let mut profiles: HashMap<CandidateId, ReputationProfile> = stream::iter(lookups)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        shortlist
            .into_iter()
            .map(|c| {
                let profile = profiles.remove(c.id()).unwrap_or_default();
                c.with_reputation(profile)
            })
            .collect()
    }
}

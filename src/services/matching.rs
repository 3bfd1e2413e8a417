use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::core::MatchEngine;
use crate::models::{CandidateFilter, ClientPreferences, MatchResult};
use crate::services::cache::{CacheError, CacheKey, ResultCache, DEFAULT_MATCH_TTL_SECS};
use crate::services::profile_store::{LookupError, ProfileStore};

/// Terminal failures of a match request
#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    LookupFailed(#[from] LookupError),
}

/// Knobs for one match request
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub lookup_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_write_timeout: Duration,
    pub filter_by_budget: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(DEFAULT_MATCH_TTL_SECS),
            cache_write_timeout: Duration::from_secs(2),
            filter_by_budget: true,
        }
    }
}

/// Fetches inputs, ranks them, and writes the ranking through to the cache
///
/// Lookup failures end the request. Cache failures are logged and dropped.
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn ProfileStore>,
    cache: Arc<dyn ResultCache>,
    engine: MatchEngine,
    options: MatchOptions,
}

impl MatchService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        cache: Arc<dyn ResultCache>,
        engine: MatchEngine,
        options: MatchOptions,
    ) -> Self {
        Self {
            store,
            cache,
            engine,
            options,
        }
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }

    /// Rank artists for a client and populate the match cache
    ///
    /// `preferences_override`, when given, replaces the stored preferences
    /// for this request only.
    pub async fn match_client(
        &self,
        client_id: &str,
        preferences_override: Option<ClientPreferences>,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(MatchError::Validation("clientId is required".to_string()));
        }

        // Both fetches share one deadline
        let deadline = tokio::time::Instant::now() + self.options.lookup_timeout;

        let preferences = match preferences_override {
            Some(mut prefs) => {
                prefs.client_id = client_id.to_string();
                prefs
            }
            None => {
                self.with_lookup_deadline(
                    deadline,
                    "client preferences",
                    self.store.get_client_preferences(client_id),
                )
                .await?
            }
        };

        let filter = if self.options.filter_by_budget {
            CandidateFilter::from_preferences(&preferences)
        } else {
            None
        };

        let candidates = self
            .with_lookup_deadline(deadline, "artist candidates", self.store.list_artist_candidates(filter))
            .await?;

        tracing::debug!("Found {} candidates for {}", candidates.len(), client_id);

        let matches = self.engine.compute_matches(&preferences, candidates);

        if let Err(e) = self.write_through(client_id, &matches).await {
            tracing::warn!("Failed to cache matches for {}: {}", client_id, e);
        }

        Ok(matches)
    }

    /// Read a previously cached ranking for a client
    pub async fn cached_matches(&self, client_id: &str) -> Result<Option<Vec<MatchResult>>, CacheError> {
        let client_id = client_id.trim();
        let Some(json) = self.cache.get(&CacheKey::matches(client_id)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn with_lookup_deadline<T>(
        &self,
        deadline: tokio::time::Instant,
        what: &str,
        lookup: impl Future<Output = Result<T, LookupError>>,
    ) -> Result<T, LookupError> {
        match tokio::time::timeout_at(deadline, lookup).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Failed(format!(
                "Timed out fetching {} within {:?}",
                what, self.options.lookup_timeout
            ))),
        }
    }

    async fn write_through(&self, client_id: &str, matches: &[MatchResult]) -> Result<(), CacheError> {
        let payload = serde_json::to_string(matches)?;
        let key = CacheKey::matches(client_id);

        tokio::time::timeout(
            self.options.cache_write_timeout,
            self.cache.put(&key, payload, self.options.cache_ttl),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.options.cache_write_timeout))?
    }
}

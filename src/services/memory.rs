use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use crate::core::filters::matches_rate_filter;
use crate::models::{ArtistCandidate, CandidateFilter, ClientPreferences};
use crate::services::cache::{CacheError, ResultCache};
use crate::services::profile_store::{LookupError, ProfileStore};

/// Fixture-backed profile store for local runs and tests
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    preferences: HashMap<String, ClientPreferences>,
    artists: Vec<ArtistCandidate>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(mut self, preferences: ClientPreferences) -> Self {
        self.preferences.insert(preferences.client_id.clone(), preferences);
        self
    }

    pub fn with_artists(mut self, artists: impl IntoIterator<Item = ArtistCandidate>) -> Self {
        self.artists.extend(artists);
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_client_preferences(&self, client_id: &str) -> Result<ClientPreferences, LookupError> {
        self.preferences
            .get(client_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(client_id.to_string()))
    }

    async fn list_artist_candidates(
        &self,
        filter: Option<CandidateFilter>,
    ) -> Result<Vec<ArtistCandidate>, LookupError> {
        let filter = filter.unwrap_or_default();
        Ok(self
            .artists
            .iter()
            .filter(|artist| matches_rate_filter(artist, &filter))
            .cloned()
            .collect())
    }
}

/// Process-local result cache that records expiry per entry
#[derive(Debug, Default)]
pub struct InMemoryResultCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of an entry, if present and not expired
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .and_then(|(_, expires_at)| expires_at.checked_duration_since(Instant::now()))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), (payload, Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((payload, _)) => Ok(Some(payload.clone())),
            None => Ok(None),
        }
    }

    fn mode(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_artist(id: &str, rate: Option<f64>) -> ArtistCandidate {
        ArtistCandidate {
            id: id.to_string(),
            display_name: id.to_string(),
            hourly_rate: rate,
            style_tags: vec![],
            portfolio_images: vec![],
        }
    }

    #[tokio::test]
    async fn test_store_applies_rate_filter() {
        let store = InMemoryProfileStore::new().with_artists(vec![
            create_artist("cheap", Some(60.0)),
            create_artist("mid", Some(120.0)),
            create_artist("unknown", None),
        ]);

        let all = store.list_artist_candidates(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let filter = CandidateFilter { min_rate: Some(100.0), max_rate: None };
        let narrowed = store.list_artist_candidates(Some(filter)).await.unwrap();
        let ids: Vec<&str> = narrowed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["mid"]);
    }

    #[tokio::test]
    async fn test_store_not_found() {
        let store = InMemoryProfileStore::new();
        let err = store.get_client_preferences("nobody").await.unwrap_err();
        assert_eq!(err, LookupError::NotFound("nobody".to_string()));
    }

    #[tokio::test]
    async fn test_cache_expiry() {
        let cache = InMemoryResultCache::new();
        cache.put("live", "[]".to_string(), Duration::from_secs(60)).await.unwrap();
        cache.put("dead", "[]".to_string(), Duration::ZERO).await.unwrap();

        assert_eq!(cache.get("live").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(cache.get("dead").await.unwrap(), None);
        assert!(cache.ttl_remaining("live").unwrap() > Duration::from_secs(59));
        assert_eq!(cache.len(), 1);
    }
}

use async_trait::async_trait;
use thiserror::Error;
use crate::models::{ArtistCandidate, CandidateFilter, ClientPreferences};

/// Errors surfaced by a profile store lookup
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("Preferences not found for client {0}")]
    NotFound(String),

    #[error("Lookup failed: {0}")]
    Failed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Failed(format!("HTTP request failed: {}", err))
    }
}

/// Read access to client preferences and artist candidates
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the preferences row owned by `client_id`
    async fn get_client_preferences(&self, client_id: &str) -> Result<ClientPreferences, LookupError>;

    /// List artists eligible for ranking, optionally narrowed by hourly rate
    async fn list_artist_candidates(
        &self,
        filter: Option<CandidateFilter>,
    ) -> Result<Vec<ArtistCandidate>, LookupError>;
}

//! Inkmatch - artist matching service for the tattoo marketplace
//!
//! Scores artists against a client's style and budget preferences, ranks
//! them, and writes the ranking through to a short-lived cache keyed by
//! client identity.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{MatchEngine, ScoringStrategy, StyleOverlapScorer, HeuristicBoostScorer};
pub use models::{ClientPreferences, ArtistCandidate, MatchResult, MatchRequest, MatchResponse};
pub use services::{MatchService, MatchError, ProfileStore, ResultCache};

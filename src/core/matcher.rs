use std::sync::Arc;
use crate::models::{ArtistCandidate, ClientPreferences, MatchResult};
use crate::core::scoring::{ScoringStrategy, StyleOverlapScorer};

/// Scores and ranks candidate artists against one client's preferences
///
/// # Pipeline Stages
/// 1. Per-candidate scoring through the configured [`ScoringStrategy`]
/// 2. Stable descending sort by match percentage
///
/// The engine ranks, it never filters: every candidate passed in comes back
/// out. Budget narrowing happens upstream when candidates are fetched.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    strategy: Arc<dyn ScoringStrategy>,
}

impl MatchEngine {
    pub fn new(strategy: Arc<dyn ScoringStrategy>) -> Self {
        Self { strategy }
    }

    pub fn with_default_strategy() -> Self {
        Self::new(Arc::new(StyleOverlapScorer))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Rank candidates for a client
    ///
    /// # Arguments
    /// * `preferences` - The client's matching preferences
    /// * `candidates` - Candidate pool, possibly empty
    ///
    /// # Returns
    /// All candidates as [`MatchResult`]s, highest match first. Equal scores
    /// keep their input order.
    pub fn compute_matches(
        &self,
        preferences: &ClientPreferences,
        candidates: Vec<ArtistCandidate>,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .into_iter()
            .map(|artist| {
                let match_percentage = self.strategy.score(&artist, preferences).min(100);
                MatchResult { artist, match_percentage }
            })
            .collect();

        // slice::sort_by is stable
        results.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));

        results
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_strategy()
    }
}

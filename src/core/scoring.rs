use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use crate::models::{ArtistCandidate, ClientPreferences, HeuristicParams};
use crate::core::filters::style_fraction;

/// Errors raised while building a scorer from configuration
#[derive(Debug, Error, PartialEq)]
pub enum ScoringConfigError {
    #[error("Baseline range is empty: {min}..={max}")]
    EmptyBaseline { min: u8, max: u8 },

    #[error("Score ceiling {0} exceeds 100")]
    CeilingOutOfRange(u8),
}

/// Pluggable per-candidate scoring policy
///
/// Implementations return a match percentage in 0..=100.
pub trait ScoringStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn score(&self, candidate: &ArtistCandidate, preferences: &ClientPreferences) -> u8;
}

/// Scorer selection as it appears in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    StyleOverlap,
    HeuristicBoost,
}

/// Convert a 0-1 fraction to an integer percentage
#[inline]
pub fn fraction_to_percentage(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Deterministic style-overlap scorer
///
/// score = round(100 * |candidate tags ∩ preferred| / |preferred|)
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleOverlapScorer;

impl ScoringStrategy for StyleOverlapScorer {
    fn name(&self) -> &'static str {
        "style_overlap"
    }

    fn score(&self, candidate: &ArtistCandidate, preferences: &ClientPreferences) -> u8 {
        fraction_to_percentage(style_fraction(candidate, preferences))
    }
}

/// Randomized baseline adjusted by budget fit and style overlap
///
/// Stand-in for a learned ranking model. The RNG is seedable so output can
/// be pinned in tests.
pub struct HeuristicBoostScorer {
    params: HeuristicParams,
    rng: Mutex<StdRng>,
}

impl HeuristicBoostScorer {
    pub fn new(params: HeuristicParams) -> Result<Self, ScoringConfigError> {
        Self::with_rng(params, StdRng::from_entropy())
    }

    pub fn with_seed(params: HeuristicParams, seed: u64) -> Result<Self, ScoringConfigError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: HeuristicParams, rng: StdRng) -> Result<Self, ScoringConfigError> {
        if params.baseline_min > params.baseline_max {
            return Err(ScoringConfigError::EmptyBaseline {
                min: params.baseline_min,
                max: params.baseline_max,
            });
        }
        if params.score_ceiling > 100 {
            return Err(ScoringConfigError::CeilingOutOfRange(params.score_ceiling));
        }

        Ok(Self {
            params,
            rng: Mutex::new(rng),
        })
    }

    fn baseline(&self) -> i32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(self.params.baseline_min..=self.params.baseline_max) as i32
    }
}

impl fmt::Debug for HeuristicBoostScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeuristicBoostScorer")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ScoringStrategy for HeuristicBoostScorer {
    fn name(&self) -> &'static str {
        "heuristic_boost"
    }

    fn score(&self, candidate: &ArtistCandidate, preferences: &ClientPreferences) -> u8 {
        let mut score = self.baseline();

        if let (Some(rate), Some(max)) = (candidate.hourly_rate, preferences.budget_max) {
            if rate <= max {
                score += self.params.budget_bonus;
            } else {
                score -= self.params.budget_penalty;
            }
        }

        let style_bonus = style_fraction(candidate, preferences) * self.params.style_bonus_cap as f64;
        score += style_bonus.round() as i32;

        score.clamp(0, self.params.score_ceiling as i32) as u8
    }
}

/// Build the configured scorer
pub fn build_strategy(
    kind: StrategyKind,
    params: HeuristicParams,
    seed: Option<u64>,
) -> Result<Arc<dyn ScoringStrategy>, ScoringConfigError> {
    Ok(match kind {
        StrategyKind::StyleOverlap => Arc::new(StyleOverlapScorer),
        StrategyKind::HeuristicBoost => match seed {
            Some(seed) => Arc::new(HeuristicBoostScorer::with_seed(params, seed)?),
            None => Arc::new(HeuristicBoostScorer::new(params)?),
        },
    })
}

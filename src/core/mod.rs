// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{matching_styles, style_fraction, matches_rate_filter};
pub use matcher::MatchEngine;
pub use scoring::{
    build_strategy, fraction_to_percentage, HeuristicBoostScorer, ScoringConfigError, ScoringStrategy,
    StrategyKind, StyleOverlapScorer,
};

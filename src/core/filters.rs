use std::collections::HashSet;
use crate::models::{ArtistCandidate, ClientPreferences, CandidateFilter};

/// Preferred styles the candidate carries, in preference order
///
/// Comparison is exact string equality. Duplicate tags on either side
/// count once.
pub fn matching_styles<'a>(
    candidate: &ArtistCandidate,
    preferences: &'a ClientPreferences,
) -> Vec<&'a str> {
    let tags: HashSet<&str> = candidate.style_tags.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    preferences
        .preferred_styles
        .iter()
        .map(String::as_str)
        .filter(|style| seen.insert(*style) && tags.contains(style))
        .collect()
}

/// Fraction (0.0 to 1.0) of the client's preferred styles the candidate covers
///
/// The denominator is the number of distinct preferred styles, not the
/// candidate's tag count. No preferred styles means full credit.
#[inline]
pub fn style_fraction(candidate: &ArtistCandidate, preferences: &ClientPreferences) -> f64 {
    let preferred: HashSet<&str> = preferences
        .preferred_styles
        .iter()
        .map(String::as_str)
        .collect();

    if preferred.is_empty() {
        return 1.0;
    }

    matching_styles(candidate, preferences).len() as f64 / preferred.len() as f64
}

/// Check if a candidate's hourly rate falls inside the filter window
///
/// An unknown rate never satisfies a bound that is set.
#[inline]
pub fn matches_rate_filter(candidate: &ArtistCandidate, filter: &CandidateFilter) -> bool {
    if filter.is_empty() {
        return true;
    }

    let Some(rate) = candidate.hourly_rate else {
        return false;
    };

    if let Some(min) = filter.min_rate {
        if rate < min {
            return false;
        }
    }

    if let Some(max) = filter.max_rate {
        if rate > max {
            return false;
        }
    }

    true
}

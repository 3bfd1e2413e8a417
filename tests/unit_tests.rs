// Unit tests for Inkmatch

use inkmatch::core::{
    filters::{matching_styles, matches_rate_filter, style_fraction},
    scoring::{fraction_to_percentage, ScoringStrategy, StyleOverlapScorer},
    MatchEngine,
};
use inkmatch::models::{ArtistCandidate, CandidateFilter, ClientPreferences, MatchResult};

fn artist(id: &str, tags: &[&str]) -> ArtistCandidate {
    ArtistCandidate {
        id: id.to_string(),
        display_name: format!("Artist {}", id),
        hourly_rate: None,
        style_tags: tags.iter().map(|t| t.to_string()).collect(),
        portfolio_images: vec![format!("portfolio/{}/1.jpg", id)],
    }
}

fn preferences(styles: &[&str]) -> ClientPreferences {
    let mut prefs = ClientPreferences::new("client_1");
    prefs.preferred_styles = styles.iter().map(|s| s.to_string()).collect();
    prefs
}

fn ids(results: &[MatchResult]) -> Vec<&str> {
    results.iter().map(|r| r.artist.id.as_str()).collect()
}

#[test]
fn test_scenario_a_partial_overlap() {
    let engine = MatchEngine::with_default_strategy();
    let prefs = preferences(&["Realism", "Blackwork"]);
    let candidates = vec![
        artist("1", &["Realism"]),
        artist("2", &["Realism", "Blackwork"]),
        artist("3", &["Watercolor"]),
    ];

    let scorer = StyleOverlapScorer;
    let per_candidate: Vec<u8> = candidates.iter().map(|c| scorer.score(c, &prefs)).collect();
    assert_eq!(per_candidate, vec![50, 100, 0]);

    let results = engine.compute_matches(&prefs, candidates);
    assert_eq!(ids(&results), vec!["2", "1", "3"]);
}

#[test]
fn test_scenario_b_no_preferences_is_full_credit() {
    let engine = MatchEngine::with_default_strategy();
    let prefs = preferences(&[]);
    let candidates = vec![
        artist("x", &["Watercolor"]),
        artist("y", &[]),
        artist("z", &["Realism", "Tribal"]),
    ];

    let results = engine.compute_matches(&prefs, candidates);

    assert_eq!(ids(&results), vec!["x", "y", "z"]);
    assert!(results.iter().all(|r| r.match_percentage == 100));
}

#[test]
fn test_percentage_formula_across_overlaps() {
    let prefs = preferences(&["Realism", "Blackwork", "Fine Line", "Japanese", "Tribal", "Dotwork", "Neo-Traditional"]);
    let all: Vec<&str> = prefs.preferred_styles.iter().map(String::as_str).collect();
    let scorer = StyleOverlapScorer;

    for overlap in 0..=all.len() {
        let mut tags = all[..overlap].to_vec();
        tags.push("Watercolor");
        let candidate = artist("c", &tags);

        let expected = (100.0 * overlap as f64 / all.len() as f64).round() as u8;
        assert_eq!(scorer.score(&candidate, &prefs), expected, "overlap {}", overlap);
    }
}

#[test]
fn test_ranking_preserves_length_and_order() {
    let engine = MatchEngine::default();
    let prefs = preferences(&["Realism", "Blackwork", "Japanese"]);
    let styles = ["Realism", "Blackwork", "Japanese", "Watercolor"];

    let candidates: Vec<ArtistCandidate> = (0..40)
        .map(|i| {
            let tags: Vec<&str> = styles.iter().copied().filter(|_| i % 3 == 0 || i % 5 == 0).take(i % 4).collect();
            artist(&i.to_string(), &tags)
        })
        .collect();
    let input_pos: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();

    let results = engine.compute_matches(&prefs, candidates);

    assert_eq!(results.len(), 40);
    for pair in results.windows(2) {
        assert!(pair[0].match_percentage >= pair[1].match_percentage);
        if pair[0].match_percentage == pair[1].match_percentage {
            let a = input_pos.iter().position(|id| *id == pair[0].artist.id).unwrap();
            let b = input_pos.iter().position(|id| *id == pair[1].artist.id).unwrap();
            assert!(a < b, "tie between {} and {} not stable", pair[0].artist.id, pair[1].artist.id);
        }
    }
}

#[test]
fn test_match_result_keeps_candidate_fields() {
    let engine = MatchEngine::default();
    let mut candidate = artist("9", &["Realism"]);
    candidate.hourly_rate = Some(140.0);

    let results = engine.compute_matches(&preferences(&["Realism"]), vec![candidate.clone()]);

    assert_eq!(results[0].artist, candidate);
    assert_eq!(results[0].match_percentage, 100);
}

#[test]
fn test_helpers() {
    let prefs = preferences(&["Realism", "Blackwork"]);
    let candidate = artist("1", &["Blackwork", "Tribal"]);

    assert_eq!(matching_styles(&candidate, &prefs), vec!["Blackwork"]);
    assert_eq!(style_fraction(&candidate, &prefs), 0.5);
    assert_eq!(fraction_to_percentage(0.5), 50);

    let filter = CandidateFilter { min_rate: None, max_rate: Some(100.0) };
    assert!(!matches_rate_filter(&candidate, &filter));
}

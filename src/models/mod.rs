// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ClientPreferences, ArtistCandidate, MatchResult, ExperienceLevel, CandidateFilter, HeuristicParams};
pub use requests::MatchRequest;
pub use responses::{MatchResponse, HealthResponse, ErrorResponse};

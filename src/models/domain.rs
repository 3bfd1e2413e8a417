use serde::{Deserialize, Deserializer, Serialize};

/// Experience bucket a client can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Any,
    #[serde(rename = "1-3 years")]
    OneToThreeYears,
    #[serde(rename = "3-5 years")]
    ThreeToFiveYears,
    #[serde(rename = "5-10 years")]
    FiveToTenYears,
    #[serde(rename = "10+ years")]
    TenPlusYears,
}

/// Client matching preferences
///
/// One row per client, created at signup with empty/default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPreferences {
    #[serde(rename = "clientId", alias = "client_id", default, deserialize_with = "null_as_default")]
    pub client_id: String,
    #[serde(rename = "preferredStyles", alias = "preferred_styles", default, deserialize_with = "null_as_default")]
    pub preferred_styles: Vec<String>,
    #[serde(rename = "budgetMin", alias = "budget_min", default)]
    pub budget_min: Option<f64>,
    #[serde(rename = "budgetMax", alias = "budget_max", default)]
    pub budget_max: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(
        rename = "searchRadius",
        alias = "search_radius",
        default = "default_search_radius",
        deserialize_with = "null_as_default_radius"
    )]
    pub search_radius: u32,
    #[serde(rename = "preferredExperience", alias = "preferred_experience", default, deserialize_with = "null_as_default")]
    pub preferred_experience: ExperienceLevel,
}

impl ClientPreferences {
    /// Signup defaults for a freshly registered client
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            preferred_styles: Vec::new(),
            budget_min: None,
            budget_max: None,
            location: String::new(),
            search_radius: default_search_radius(),
            preferred_experience: ExperienceLevel::Any,
        }
    }

    pub fn has_budget_bounds(&self) -> bool {
        self.budget_min.is_some() || self.budget_max.is_some()
    }
}

fn default_search_radius() -> u32 { 25 }

/// Nullable database columns read as the field's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_default_radius<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(|radius| radius.unwrap_or_else(default_search_radius))
}

/// Read projection of an artist considered for ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistCandidate {
    pub id: String,
    #[serde(rename = "displayName", alias = "display_name", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "hourlyRate", alias = "hourly_rate", default)]
    pub hourly_rate: Option<f64>,
    #[serde(rename = "styleTags", alias = "style_tags", default, deserialize_with = "null_as_default")]
    pub style_tags: Vec<String>,
    #[serde(rename = "portfolioImages", alias = "portfolio_images", default, deserialize_with = "null_as_default")]
    pub portfolio_images: Vec<String>,
}

/// Candidate augmented with its computed match percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub artist: ArtistCandidate,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: u8,
}

/// Hourly-rate window applied while fetching candidates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CandidateFilter {
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
}

impl CandidateFilter {
    /// Derive a filter from the client's budget bounds, if any are set
    pub fn from_preferences(preferences: &ClientPreferences) -> Option<Self> {
        preferences.has_budget_bounds().then(|| Self {
            min_rate: preferences.budget_min,
            max_rate: preferences.budget_max,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min_rate.is_none() && self.max_rate.is_none()
    }
}

/// Tunables for the heuristic-boost scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicParams {
    pub baseline_min: u8,
    pub baseline_max: u8,
    pub budget_bonus: i32,
    pub budget_penalty: i32,
    pub style_bonus_cap: i32,
    pub score_ceiling: u8,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            baseline_min: 75,
            baseline_max: 95,
            budget_bonus: 5,
            budget_penalty: 10,
            style_bonus_cap: 10,
            score_ceiling: 99,
        }
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use crate::core::StrategyKind;
use crate::models::HeuristicParams;
use crate::services::{MatchOptions, StoreTables, DEFAULT_MATCH_TTL_SECS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_preferences_table")]
    pub preferences_table: String,
    #[serde(default = "default_candidates_table")]
    pub candidates_table: String,
    pub request_timeout_secs: Option<u64>,
}

impl StoreSettings {
    pub fn tables(&self) -> StoreTables {
        StoreTables {
            client_preferences: self.preferences_table.clone(),
            artist_candidates: self.candidates_table.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(30))
    }
}

fn default_preferences_table() -> String { "client_preferences".to_string() }
fn default_candidates_table() -> String { "artist_candidates".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    pub l1_cache_size: Option<u64>,
    pub write_timeout_ms: Option<u64>,
}

fn default_ttl_secs() -> u64 { DEFAULT_MATCH_TTL_SECS }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub filter_by_budget: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
            filter_by_budget: true,
        }
    }
}

fn default_lookup_timeout_ms() -> u64 { 10_000 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub strategy: StrategyKind,
    pub seed: Option<u64>,
    #[serde(default)]
    pub heuristic: HeuristicConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicConfig {
    #[serde(default = "default_baseline_min")]
    pub baseline_min: u8,
    #[serde(default = "default_baseline_max")]
    pub baseline_max: u8,
    #[serde(default = "default_budget_bonus")]
    pub budget_bonus: i32,
    #[serde(default = "default_budget_penalty")]
    pub budget_penalty: i32,
    #[serde(default = "default_style_bonus_cap")]
    pub style_bonus_cap: i32,
    #[serde(default = "default_score_ceiling")]
    pub score_ceiling: u8,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            baseline_min: default_baseline_min(),
            baseline_max: default_baseline_max(),
            budget_bonus: default_budget_bonus(),
            budget_penalty: default_budget_penalty(),
            style_bonus_cap: default_style_bonus_cap(),
            score_ceiling: default_score_ceiling(),
        }
    }
}

impl From<&HeuristicConfig> for HeuristicParams {
    fn from(value: &HeuristicConfig) -> Self {
        Self {
            baseline_min: value.baseline_min,
            baseline_max: value.baseline_max,
            budget_bonus: value.budget_bonus,
            budget_penalty: value.budget_penalty,
            style_bonus_cap: value.style_bonus_cap,
            score_ceiling: value.score_ceiling,
        }
    }
}

fn default_baseline_min() -> u8 { 75 }
fn default_baseline_max() -> u8 { 95 }
fn default_budget_bonus() -> i32 { 5 }
fn default_budget_penalty() -> i32 { 10 }
fn default_style_bonus_cap() -> i32 { 10 }
fn default_score_ceiling() -> u8 { 99 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with INKMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., INKMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("INKMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_fallbacks(settings)?.try_deserialize()
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            lookup_timeout: Duration::from_millis(self.matching.lookup_timeout_ms),
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            cache_write_timeout: Duration::from_millis(self.cache.write_timeout_ms.unwrap_or(2_000)),
            filter_by_budget: self.matching.filter_by_budget,
        }
    }
}

/// Honour the conventional unprefixed variables deployment platforms set
fn apply_env_fallbacks(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("PROFILE_STORE_URL", "store.url"),
        ("PROFILE_STORE_API_KEY", "store.api_key"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

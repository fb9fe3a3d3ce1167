use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
///
/// Every section has compiled-in defaults matching the engine's calibration,
/// so the binary runs with no configuration file present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Result cap applied when a single-mode request names no maximum.
    #[serde(default = "default_single_limit")]
    pub default_limit: u16,
    /// Result cap applied when a band-mode request names no maximum.
    #[serde(default = "default_band_limit")]
    pub default_band_limit: u16,
    /// Hard cap on the number of returned results.
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Extra skill aliases merged over the built-in instrument table,
    /// alias phrase -> canonical key.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_single_limit(),
            default_band_limit: default_band_limit(),
            max_limit: default_max_limit(),
            thresholds: ThresholdsConfig::default(),
            aliases: HashMap::new(),
        }
    }
}

fn default_single_limit() -> u16 { 5 }
fn default_band_limit() -> u16 { 3 }
fn default_max_limit() -> u16 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_skill_exact")]
    pub skill_exact: f64,
    #[serde(default = "default_skill_relaxed")]
    pub skill_relaxed: f64,
    #[serde(default = "default_location_exact")]
    pub location_exact: f64,
    #[serde(default = "default_location_relaxed")]
    pub location_relaxed: f64,
    #[serde(default = "default_trait_exact")]
    pub trait_exact: f64,
    #[serde(default = "default_trait_relaxed")]
    pub trait_relaxed: f64,
    #[serde(default = "default_trait_coverage_exact")]
    pub trait_coverage_exact: f64,
    #[serde(default = "default_trait_coverage_relaxed")]
    pub trait_coverage_relaxed: f64,
    #[serde(default = "default_years_window")]
    pub years_window: i64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            skill_exact: default_skill_exact(),
            skill_relaxed: default_skill_relaxed(),
            location_exact: default_location_exact(),
            location_relaxed: default_location_relaxed(),
            trait_exact: default_trait_exact(),
            trait_relaxed: default_trait_relaxed(),
            trait_coverage_exact: default_trait_coverage_exact(),
            trait_coverage_relaxed: default_trait_coverage_relaxed(),
            years_window: default_years_window(),
        }
    }
}

fn default_skill_exact() -> f64 { 0.95 }
fn default_skill_relaxed() -> f64 { 0.78 }
fn default_location_exact() -> f64 { 0.85 }
fn default_location_relaxed() -> f64 { 0.75 }
fn default_trait_exact() -> f64 { 0.85 }
fn default_trait_relaxed() -> f64 { 0.75 }
fn default_trait_coverage_exact() -> f64 { 0.8 }
fn default_trait_coverage_relaxed() -> f64 { 0.6 }
fn default_years_window() -> i64 { 4 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_years_weight")]
    pub years: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_traits_weight")]
    pub traits: f64,
    #[serde(default = "default_years_decay")]
    pub years_decay: f64,
    #[serde(default = "default_balance_bonus")]
    pub balance_bonus: f64,
    #[serde(default = "default_cohesion_bonus")]
    pub cohesion_bonus: f64,
    #[serde(default = "default_fallback_years_score")]
    pub fallback_years_score: f64,
    #[serde(default = "default_fallback_years_weight")]
    pub fallback_years_weight: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill: default_skill_weight(),
            years: default_years_weight(),
            location: default_location_weight(),
            traits: default_traits_weight(),
            years_decay: default_years_decay(),
            balance_bonus: default_balance_bonus(),
            cohesion_bonus: default_cohesion_bonus(),
            fallback_years_score: default_fallback_years_score(),
            fallback_years_weight: default_fallback_years_weight(),
        }
    }
}

fn default_skill_weight() -> f64 { 4.0 }
fn default_years_weight() -> f64 { 2.5 }
fn default_location_weight() -> f64 { 2.5 }
fn default_traits_weight() -> f64 { 3.5 }
fn default_years_decay() -> f64 { 4.0 }
fn default_balance_bonus() -> f64 { 0.5 }
fn default_cohesion_bonus() -> f64 { 0.75 }
fn default_fallback_years_score() -> f64 { 0.2 }
fn default_fallback_years_weight() -> f64 { 0.5 }

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
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with SESH)
    ///    e.g. SESH__MATCHING__MAX_LIMIT -> matching.max_limit
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SESH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SESH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

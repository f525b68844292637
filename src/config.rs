//! Configuration management.
//!
//! Loads settings from environment variables and .env file. Every value has
//! a default so a bare `ODDS_API_KEY=... nfl-props-odds` reproduces the
//! weekly NFL slate export.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::data::models::MarketKey;

/// Event IDs for the NFL slate exported when `EVENT_IDS` is not set.
pub const DEFAULT_EVENT_IDS: [&str; 16] = [
    "612c2c3f6ca9e10d4b7ead21a2b0ff38",
    "eca3b71919531e7ae0b4f3f501157e6c",
    "7a5e353202d40a844491fa5753bc3097",
    "92665529cce6b8089e793d1e7d5e4b66",
    "022add645ca37d612dbb69e8ef02f6b9",
    "b5b9d07cdd5c7bd14e943ccd7973e6a2",
    "5f14ebd3a8f10d141a7f0c2dcf510368",
    "60fdc65ee27ab7dbe07dc06ef35afadc",
    "8c0e75b0a4ea07212e741acf25ad96b6",
    "c483f5c8e0ee5f1f5abdd75870eeeffc",
    "afb7e137dbb2a3de38d2d3cb68897e3b",
    "a2f9dcdf49ccacf33036a0b795413a6e",
    "a1682ca5d9e0c4b14d19ed69d6299806",
    "ba439e5505ce1ee745d2e48f2d2f31e6",
    "fa20351fa9ca26c47f93abc8a9b2c941",
    "d94f808523ced7460f7c88c758c481f5",
];

pub const DEFAULT_OUTPUT_PATH: &str = "nfl_player_props_odds_consolidated.xlsx";

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Settings {
    // The Odds API
    pub odds_api_key: String,
    pub odds_api_base_url: String,
    pub sport_key: String,
    pub regions: String,
    pub odds_format: String,
    /// Zero means no explicit timeout.
    pub request_timeout_secs: u64,

    // Slate
    pub event_ids: Vec<String>,

    // Bookmakers
    pub primary_bookmaker: String,
    pub secondary_bookmaker: String,
    pub secondary_markets: Vec<String>,

    // Output
    pub output_path: PathBuf,

    // Logging
    pub log_level: String,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            odds_api_key: String::new(),
            odds_api_base_url: "https://api.the-odds-api.com".to_string(),
            sport_key: "americanfootball_nfl".to_string(),
            regions: "us".to_string(),
            odds_format: "american".to_string(),
            request_timeout_secs: 0,
            event_ids: DEFAULT_EVENT_IDS.iter().map(|s| s.to_string()).collect(),
            primary_bookmaker: "DraftKings".to_string(),
            secondary_bookmaker: "FanDuel".to_string(),
            secondary_markets: vec![MarketKey::Receptions.as_str().to_string()],
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Load settings from environment variables (and .env file).
    pub fn from_env() -> Self {
        // Try to load .env file (ignore if not found).
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Self {
            odds_api_key: env_str("ODDS_API_KEY", &defaults.odds_api_key),
            odds_api_base_url: env_str("ODDS_API_BASE_URL", &defaults.odds_api_base_url),
            sport_key: env_str("ODDS_API_SPORT", &defaults.sport_key),
            regions: env_str("ODDS_API_REGIONS", &defaults.regions),
            odds_format: env_str("ODDS_API_ODDS_FORMAT", &defaults.odds_format),
            request_timeout_secs: env_u64("ODDS_API_TIMEOUT_SECS", defaults.request_timeout_secs),

            event_ids: env_csv_or("EVENT_IDS", defaults.event_ids),

            primary_bookmaker: env_str("PRIMARY_BOOKMAKER", &defaults.primary_bookmaker),
            secondary_bookmaker: env_str("SECONDARY_BOOKMAKER", &defaults.secondary_bookmaker),
            secondary_markets: env_csv_or("SECONDARY_MARKETS", defaults.secondary_markets),

            output_path: std::env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),

            log_level: env_str("LOG_LEVEL", &defaults.log_level),
            log_json: env_bool("LOG_JSON", defaults.log_json),
        }
    }

    /// Validate configuration for critical requirements.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.odds_api_key.trim().is_empty() {
            errors.push("ODDS_API_KEY is required".to_string());
        }

        if self.event_ids.is_empty() {
            errors.push("EVENT_IDS must list at least one event".to_string());
        }

        if self.primary_bookmaker.is_empty() || self.secondary_bookmaker.is_empty() {
            errors.push("PRIMARY_BOOKMAKER and SECONDARY_BOOKMAKER must be non-empty".to_string());
        } else if self.primary_bookmaker == self.secondary_bookmaker {
            errors.push("PRIMARY_BOOKMAKER and SECONDARY_BOOKMAKER must differ".to_string());
        }

        for key in &self.secondary_markets {
            if MarketKey::from_str(key).is_err() {
                errors.push(format!("SECONDARY_MARKETS contains unknown market: {key}"));
            }
        }

        if self.output_path.as_os_str().is_empty() {
            errors.push("OUTPUT_PATH must be non-empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Markets the secondary bookmaker is allowed to fill. Unknown keys are
    /// dropped here; `validate` reports them.
    pub fn secondary_market_keys(&self) -> Vec<MarketKey> {
        self.secondary_markets
            .iter()
            .filter_map(|k| MarketKey::from_str(k).ok())
            .collect()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_csv_or(key: &str, default: Vec<String>) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => split_csv(&raw),
        Err(_) => default,
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

//! Configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `WHSHEET_*` environment variables.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "whsheet.toml";

/// Prefix for environment overrides (e.g., WHSHEET_DB_PATH)
pub const ENV_PREFIX: &str = "WHSHEET_";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file; None keeps everything in memory
    pub db_path: Option<String>,
    /// Storage namespace for this app's keys
    pub namespace: String,
    /// Key holding the character array
    pub characters_key: String,
    /// tracing filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: Some("whsheet.db".to_string()),
            namespace: "whitehack".to_string(),
            characters_key: "characters".to_string(),
            log_filter: "whsheet=info".to_string(),
        }
    }
}

impl Config {
    /// In-memory configuration (for testing)
    pub fn in_memory() -> Self {
        Self {
            db_path: None,
            ..Self::default()
        }
    }

    /// Defaults only
    pub fn base() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    /// Defaults, then the TOML file, then the environment
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::base()
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the layered configuration
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}

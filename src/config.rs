//! Portal configuration loaded from a TOML file.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [ranking]
//! max_rank = 5
//!
//! [storage]
//! db_path = "shortlist.db"
//! applicants_key = "applicants"
//! reviews_key = "reviews"
//! shortlist_key = "shortlist"
//!
//! [events]
//! channel_capacity = 256
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Rank;

/// Configuration load or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The defaults could not be rendered.
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    /// A rank ceiling of zero leaves nothing to assign.
    #[error("ranking.max_rank must be at least 1")]
    InvalidMaxRank,
    /// Two collections would share one storage key.
    #[error("storage keys must be distinct, `{0}` is used twice")]
    DuplicateKey(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Rank settings.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Change notification settings.
    #[serde(default)]
    pub events: EventsConfig,
}

/// Rank settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Highest assignable rank; rank 1 is best.
    #[serde(default = "default_max_rank")]
    pub max_rank: Rank,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_rank: default_max_rank(),
        }
    }
}

fn default_max_rank() -> Rank {
    5
}

/// Storage location and collection key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Key holding the applicant collection.
    #[serde(default = "default_applicants_key")]
    pub applicants_key: String,

    /// Key holding the per-course review collection.
    #[serde(default = "default_reviews_key")]
    pub reviews_key: String,

    /// Key holding the flat shortlist.
    #[serde(default = "default_shortlist_key")]
    pub shortlist_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            applicants_key: default_applicants_key(),
            reviews_key: default_reviews_key(),
            shortlist_key: default_shortlist_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shortlist.db")
}

fn default_applicants_key() -> String {
    "applicants".to_string()
}

fn default_reviews_key() -> String {
    "reviews".to_string()
}

fn default_shortlist_key() -> String {
    "shortlist".to_string()
}

/// Change notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Events buffered per subscriber before the oldest are dropped.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

impl PortalConfig {
    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ranking.max_rank == 0 {
            return Err(ConfigError::InvalidMaxRank);
        }
        let s = &self.storage;
        for (a, b) in [
            (&s.applicants_key, &s.reviews_key),
            (&s.applicants_key, &s.shortlist_key),
            (&s.reviews_key, &s.shortlist_key),
        ] {
            if a == b {
                return Err(ConfigError::DuplicateKey(a.clone()));
            }
        }
        Ok(())
    }

    /// Default configuration rendered as TOML.
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }
}

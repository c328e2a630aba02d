//! Shared data model, keyword dictionary, and configuration for CupOfData.

pub mod app_config;
pub mod config;
pub mod dictionary;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use dictionary::{load_dictionary, KeywordDictionary};
pub use types::{
    truncate_chars, Document, DrinkStat, Mention, Recommendation, Segment, SNIPPET_MAX_CHARS,
    UNKNOWN_BRAND,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read dictionary file {path}: {source}")]
    DictionaryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dictionary file: {0}")]
    DictionaryFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

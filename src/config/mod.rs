pub mod resolve;
pub mod settings;

pub use settings::{
    AbbreviationEntry, GraphSettings, LabelSettings, NodeNaming, SearchSettings, Settings,
    SourceSettings, TreeSettings,
};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid label pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown cycle policy '{0}' (expected 'drop' or 'fail')")]
    InvalidCyclePolicy(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

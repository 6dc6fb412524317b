use thiserror::Error;

use crate::config::ConfigError;
use crate::core::source::SourceError;
use crate::graph::tree::TreeError;

#[derive(Debug, Error)]
pub enum BatchGraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BatchGraphError>;

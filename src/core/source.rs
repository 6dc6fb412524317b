use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {kind} source {path}: {source}")]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start loader runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Raw text of both CSV sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText {
    pub nodes: String,
    pub edges: String,
}

pub trait GraphSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<SourceText, SourceError>;
}

/// Reads the node and edge CSV files concurrently.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

impl FileSource {
    pub fn new(nodes: impl Into<PathBuf>, edges: impl Into<PathBuf>) -> Self {
        Self {
            nodes: nodes.into(),
            edges: edges.into(),
        }
    }
}

impl GraphSource for FileSource {
    fn describe(&self) -> String {
        format!("{} + {}", self.nodes.display(), self.edges.display())
    }

    fn load(&self) -> Result<SourceText, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)?;
        let (nodes, edges) = runtime.block_on(async {
            tokio::try_join!(
                read_source("nodes", &self.nodes),
                read_source("edges", &self.edges)
            )
        })?;
        Ok(SourceText { nodes, edges })
    }
}

async fn read_source(kind: &'static str, path: &Path) -> Result<String, SourceError> {
    debug!(kind, path = %path.display(), "reading source");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        })
}

/// Source text held in memory.
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    text: SourceText,
}

impl InlineSource {
    pub fn new(nodes: impl Into<String>, edges: impl Into<String>) -> Self {
        Self {
            text: SourceText {
                nodes: nodes.into(),
                edges: edges.into(),
            },
        }
    }
}

impl GraphSource for InlineSource {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    fn load(&self) -> Result<SourceText, SourceError> {
        Ok(self.text.clone())
    }
}

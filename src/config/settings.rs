use std::path::PathBuf;

use serde::Deserialize;

use crate::core::model::DEFAULT_LINK_TYPE;
use crate::graph::nodeps::DEFAULT_SENTINEL_ID;
use crate::graph::tree::CyclePolicy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sources: SourceSettings,
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub labels: LabelSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_nodes_path")]
    pub nodes: PathBuf,
    #[serde(default = "default_edges_path")]
    pub edges: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            nodes: default_nodes_path(),
            edges: default_edges_path(),
        }
    }
}

/// Which column a node's `name` is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeNaming {
    /// The id column, as the chart always did.
    #[default]
    Id,
    /// The raw `name` column.
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    #[serde(default = "default_link_type")]
    pub link_type: String,
    #[serde(default)]
    pub node_name: NodeNaming,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            link_type: default_link_type(),
            node_name: NodeNaming::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_term_len: default_min_term_len(),
            case_insensitive: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeSettings {
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelSettings {
    #[serde(default)]
    pub abbreviations: Vec<AbbreviationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbbreviationEntry {
    pub pattern: String,
    pub replacement: String,
}

fn default_nodes_path() -> PathBuf {
    PathBuf::from("assets").join("batch.csv")
}

fn default_edges_path() -> PathBuf {
    PathBuf::from("assets").join("batchgraph.csv")
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL_ID.to_string()
}

fn default_link_type() -> String {
    DEFAULT_LINK_TYPE.to_string()
}

fn default_min_term_len() -> usize {
    3
}

fn default_true() -> bool {
    true
}

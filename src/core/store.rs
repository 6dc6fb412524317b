use tracing::info;

use crate::config::{ConfigError, Settings};
use crate::core::model::Graph;
use crate::core::source::{FileSource, GraphSource, SourceError};
use crate::graph::builder::{build_graph_from_text, BuildOptions, BuildReport};
use crate::graph::labels::Abbreviations;

/// Owns the batch graph. The sources are read and the graph is built on the
/// first request; later requests get the cached graph.
pub struct GraphStore {
    source: Box<dyn GraphSource>,
    options: BuildOptions,
    built: Option<(Graph, BuildReport)>,
}

impl GraphStore {
    pub fn new(source: impl GraphSource + 'static, options: BuildOptions) -> Self {
        Self {
            source: Box::new(source),
            options,
            built: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let source = FileSource::new(&settings.sources.nodes, &settings.sources.edges);
        let options = BuildOptions {
            naming: settings.graph.node_name,
            link_type: settings.graph.link_type.clone(),
            abbreviations: Abbreviations::from_entries(&settings.labels.abbreviations)?,
        };
        Ok(Self::new(source, options))
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn graph(&mut self) -> Result<&Graph, SourceError> {
        Ok(&self.ensure_built()?.0)
    }

    pub fn report(&mut self) -> Result<&BuildReport, SourceError> {
        Ok(&self.ensure_built()?.1)
    }

    fn ensure_built(&mut self) -> Result<&(Graph, BuildReport), SourceError> {
        let built = match self.built.take() {
            Some(built) => built,
            None => self.build()?,
        };
        Ok(self.built.insert(built))
    }

    fn build(&self) -> Result<(Graph, BuildReport), SourceError> {
        info!(source = %self.source.describe(), "building graph");
        let text = self.source.load()?;
        let (graph, report) = build_graph_from_text(&text.nodes, &text.edges, &self.options);
        info!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            dropped_node_rows = report.dropped_node_rows,
            dropped_edge_rows = report.dropped_edge_rows,
            "graph built"
        );
        Ok((graph, report))
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("source", &self.source.describe())
            .field("built", &self.is_built())
            .finish()
    }
}

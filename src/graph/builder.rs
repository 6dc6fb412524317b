use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::NodeNaming;
use crate::core::model::{Graph, Link, Node, DEFAULT_LINK_TYPE};
use crate::graph::labels::Abbreviations;

/// One data row of the node source: `id,name,shortName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub short_name: String,
}

/// One data row of the edge source: `predecessorId,successorId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRow {
    pub predecessor: String,
    pub successor: String,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub naming: NodeNaming,
    pub link_type: String,
    pub abbreviations: Abbreviations,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            naming: NodeNaming::default(),
            link_type: DEFAULT_LINK_TYPE.to_string(),
            abbreviations: Abbreviations::default(),
        }
    }
}

/// What the row parsers threw away or collapsed while building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub dropped_node_rows: usize,
    pub dropped_edge_rows: usize,
    pub duplicate_ids: Vec<String>,
}

pub fn parse_node_rows(text: &str) -> (Vec<NodeRow>, usize) {
    let mut rows = Vec::new();
    let mut dropped = 0;
    for (line_no, fields) in data_lines(text) {
        if fields.len() < 3 || fields[0].is_empty() {
            debug!(line = line_no, "dropping malformed node row");
            dropped += 1;
            continue;
        }
        rows.push(NodeRow {
            id: fields[0].to_string(),
            name: fields[1].to_string(),
            short_name: fields[2].to_string(),
        });
    }
    (rows, dropped)
}

pub fn parse_edge_rows(text: &str) -> (Vec<EdgeRow>, usize) {
    let mut rows = Vec::new();
    let mut dropped = 0;
    for (line_no, fields) in data_lines(text) {
        if fields.len() < 2 || fields[0].is_empty() || fields[1].is_empty() {
            debug!(line = line_no, "dropping malformed edge row");
            dropped += 1;
            continue;
        }
        rows.push(EdgeRow {
            predecessor: fields[0].to_string(),
            successor: fields[1].to_string(),
        });
    }
    (rows, dropped)
}

/// Builds the graph from parsed rows. A repeated node id keeps the position
/// of its first row and the values of its last one.
pub fn build_graph(nodes: &[NodeRow], edges: &[EdgeRow], options: &BuildOptions) -> Graph {
    let (graph, _) = build_graph_with_report(nodes, edges, options);
    graph
}

pub fn build_graph_with_report(
    nodes: &[NodeRow],
    edges: &[EdgeRow],
    options: &BuildOptions,
) -> (Graph, BuildReport) {
    let mut report = BuildReport::default();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut built: Vec<Node> = Vec::with_capacity(nodes.len());

    for row in nodes {
        let node = node_from_row(row, options);
        match positions.get(row.id.as_str()) {
            Some(&idx) => {
                debug!(id = %row.id, "node id repeated, later row wins");
                if !report.duplicate_ids.contains(&row.id) {
                    report.duplicate_ids.push(row.id.clone());
                }
                built[idx] = node;
            }
            None => {
                positions.insert(row.id.as_str(), built.len());
                built.push(node);
            }
        }
    }

    let links = edges
        .iter()
        .map(|edge| {
            Link::new(
                edge.predecessor.clone(),
                edge.successor.clone(),
                options.link_type.clone(),
            )
        })
        .collect();

    let graph = Graph {
        inited: true,
        nodes: built,
        links,
    };
    (graph, report)
}

/// Parses both sources and builds the graph in one step.
pub fn build_graph_from_text(
    nodes_text: &str,
    edges_text: &str,
    options: &BuildOptions,
) -> (Graph, BuildReport) {
    let (nodes, dropped_node_rows) = parse_node_rows(nodes_text);
    let (edges, dropped_edge_rows) = parse_edge_rows(edges_text);
    let (graph, mut report) = build_graph_with_report(&nodes, &edges, options);
    report.dropped_node_rows = dropped_node_rows;
    report.dropped_edge_rows = dropped_edge_rows;
    (graph, report)
}

fn node_from_row(row: &NodeRow, options: &BuildOptions) -> Node {
    let name = match options.naming {
        NodeNaming::Id => row.id.clone(),
        NodeNaming::Raw => row.name.clone(),
    };
    let label = if options.abbreviations.is_empty() {
        row.short_name.clone()
    } else {
        options.abbreviations.apply(&row.short_name)
    };
    Node {
        id: row.id.clone(),
        name,
        label,
    }
}

/// Splits the text into data rows, skipping the header and blank lines.
/// Yields 1-based line numbers with the trimmed fields.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.split('\n')
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.split(',').map(str::trim).collect()))
}

use std::collections::{BTreeSet, HashSet};

use crate::core::model::Graph;

/// Id of the synthetic "Parallelisierung" join node that dependency-free
/// batches feed into.
pub const DEFAULT_SENTINEL_ID: &str = "Parallelisierung";

/// Ids of nodes that link straight into `sentinel` and have no predecessors
/// of their own. Link sources that do not name a node never qualify.
pub fn compute_nodeps_ids(graph: &Graph, sentinel: &str) -> BTreeSet<String> {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let mut has_predecessor: HashSet<&str> = HashSet::new();
    let mut feeds_sentinel: Vec<&str> = Vec::new();
    for link in &graph.links {
        let (source, target) = (link.source.id(), link.target.id());
        has_predecessor.insert(target);
        if target == sentinel {
            feeds_sentinel.push(source);
        }
    }

    feeds_sentinel
        .into_iter()
        .filter(|id| node_ids.contains(id) && !has_predecessor.contains(id))
        .map(str::to_string)
        .collect()
}

/// Copy of `graph` without the given nodes and without any link touching
/// one of them.
pub fn filter_graph(graph: &Graph, nodeps: &BTreeSet<String>) -> Graph {
    let nodes = graph
        .nodes
        .iter()
        .filter(|node| !nodeps.contains(&node.id))
        .cloned()
        .collect();
    let links = graph
        .links
        .iter()
        .filter(|link| {
            !nodeps.contains(link.source.id()) && !nodeps.contains(link.target.id())
        })
        .cloned()
        .collect();
    Graph {
        inited: true,
        nodes,
        links,
    }
}

pub fn nodeps_graph(graph: &Graph, sentinel: &str) -> Graph {
    filter_graph(graph, &compute_nodeps_ids(graph, sentinel))
}

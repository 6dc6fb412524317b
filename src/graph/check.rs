//! Structural diagnostics over a built graph.
//!
//! Nothing here rejects a graph. The report lists what the tree reducer and
//! the renderers will quietly skip: cycles, and links pointing at ids that
//! never appeared in the node source.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::model::Graph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    pub source: String,
    pub target: String,
    /// Endpoint ids that do not name a node.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    pub cycles: Vec<Vec<String>>,
    pub dangling: Vec<DanglingLink>,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty()
    }
}

pub fn check_graph(graph: &Graph) -> GraphReport {
    GraphReport {
        cycles: find_cycles(graph),
        dangling: dangling_links(graph),
    }
}

/// Strongly connected components with more than one member, plus self-loops.
/// Ids inside a cycle are sorted and cycles are sorted among themselves.
pub fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let (digraph, _) = to_digraph(graph);
    let mut cycles: Vec<Vec<String>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|idx| digraph.find_edge(*idx, *idx).is_some())
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| digraph[idx].clone())
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();
    cycles.sort_unstable();
    cycles
}

pub fn dangling_links(graph: &Graph) -> Vec<DanglingLink> {
    graph
        .links
        .iter()
        .filter_map(|link| {
            let missing: Vec<String> = [link.source.id(), link.target.id()]
                .into_iter()
                .filter(|id| !graph.contains_node(id))
                .map(str::to_string)
                .collect();
            if missing.is_empty() {
                return None;
            }
            Some(DanglingLink {
                source: link.source.id().to_string(),
                target: link.target.id().to_string(),
                missing,
            })
        })
        .collect()
}

/// Petgraph view of the model keyed by node id. Links with a dangling
/// endpoint are left out.
pub fn to_digraph(graph: &Graph) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
    let mut digraph = DiGraph::new();
    let mut index = HashMap::new();
    for node in &graph.nodes {
        index
            .entry(node.id.clone())
            .or_insert_with(|| digraph.add_node(node.id.clone()));
    }
    for link in &graph.links {
        let (Some(&from), Some(&to)) = (index.get(link.source.id()), index.get(link.target.id()))
        else {
            continue;
        };
        digraph.add_edge(from, to, ());
    }
    (digraph, index)
}

#[cfg(test)]
mod tests {
    use crate::core::model::{Graph, Link, Node, DEFAULT_LINK_TYPE};
    use crate::graph::check::{check_graph, find_cycles, to_digraph};

    fn graph(node_ids: &[&str], links: &[(&str, &str)]) -> Graph {
        Graph {
            inited: true,
            nodes: node_ids.iter().map(|id| Node::new(*id, *id, *id)).collect(),
            links: links
                .iter()
                .map(|(from, to)| Link::new(*from, *to, DEFAULT_LINK_TYPE))
                .collect(),
        }
    }

    #[test]
    fn acyclic_graph_is_clean() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        let report = check_graph(&g);
        assert!(report.is_clean());
    }

    #[test]
    fn reports_cycles_and_self_loops() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("d", "d")],
        );
        assert_eq!(
            find_cycles(&g),
            vec![
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ]
        );
    }

    #[test]
    fn reports_dangling_endpoints() {
        let g = graph(&["a"], &[("a", "999"), ("0", "a"), ("x", "y")]);
        let report = check_graph(&g);
        let missing: Vec<Vec<String>> = report
            .dangling
            .iter()
            .map(|link| link.missing.clone())
            .collect();
        assert_eq!(
            missing,
            vec![
                vec!["999".to_string()],
                vec!["0".to_string()],
                vec!["x".to_string(), "y".to_string()],
            ]
        );
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn digraph_skips_dangling_links() {
        let g = graph(&["a", "b"], &[("a", "b"), ("a", "999")]);
        let (digraph, index) = to_digraph(&g);
        assert_eq!(digraph.node_count(), 2);
        assert_eq!(digraph.edge_count(), 1);
        assert!(index.contains_key("b"));
    }
}

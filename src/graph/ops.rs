use crate::core::model::{Graph, Node, NodeRef};

pub fn find_node_by_id<'g>(graph: &'g Graph, id: &str) -> Option<&'g Node> {
    graph.nodes.iter().find(|node| node.id == id)
}

pub fn find_node_by_label<'g>(
    graph: &'g Graph,
    label: &str,
    case_insensitive: bool,
) -> Option<&'g Node> {
    if case_insensitive {
        let wanted = label.to_lowercase();
        graph
            .nodes
            .iter()
            .find(|node| node.label.to_lowercase() == wanted)
    } else {
        graph.nodes.iter().find(|node| node.label == label)
    }
}

/// Targets of every link leaving `id`, in link order. Dangling targets are
/// returned as-is.
pub fn successors_of<'g>(graph: &'g Graph, id: &str) -> Vec<&'g NodeRef> {
    graph
        .links
        .iter()
        .filter(|link| link.source.id() == id)
        .map(|link| &link.target)
        .collect()
}

/// Sources of every link entering `id`, in link order.
pub fn predecessors_of<'g>(graph: &'g Graph, id: &str) -> Vec<&'g NodeRef> {
    graph
        .links
        .iter()
        .filter(|link| link.target.id() == id)
        .map(|link| &link.source)
        .collect()
}

pub fn successor_ids<'g>(graph: &'g Graph, id: &str) -> Vec<&'g str> {
    successors_of(graph, id)
        .into_iter()
        .map(NodeRef::id)
        .collect()
}

pub fn predecessor_ids<'g>(graph: &'g Graph, id: &str) -> Vec<&'g str> {
    predecessors_of(graph, id)
        .into_iter()
        .map(NodeRef::id)
        .collect()
}

use crate::core::model::{Graph, TreeNode};
use crate::graph::ops::find_node_by_id;

pub fn render_tree(root: &TreeNode) -> String {
    let mut out = String::new();
    out.push_str(&tree_line(root));
    out.push('\n');
    render_tree_children(root, "", &mut out);
    out
}

pub fn render_flat(graph: &Graph) -> String {
    let mut out = String::new();
    for node in &graph.nodes {
        out.push_str(&format!("{} [{}]\n", node.label, node.id));
        for link in graph.links.iter().filter(|link| link.source.id() == node.id) {
            let target = link.target.id();
            let label = find_node_by_id(graph, target)
                .map(|n| n.label.as_str())
                .unwrap_or("?");
            out.push_str(&format!("  -> {} [{}]\n", label, target));
        }
    }
    out
}

pub fn render_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph batchgraph {\n");
    for node in &graph.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            escape_dot(&node.id),
            escape_dot(&node.label)
        ));
    }
    for link in &graph.links {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot(link.source.id()),
            escape_dot(link.target.id())
        ));
    }
    out.push_str("}\n");
    out
}

fn render_tree_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let children = node.children();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(&tree_line(child));
        out.push('\n');
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(child, &next_prefix, out);
    }
}

fn tree_line(node: &TreeNode) -> String {
    format!("{} [{}]", node.label, node.id)
}

fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

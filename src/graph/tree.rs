use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::config::ConfigError;
use crate::core::model::{Graph, Node, TreeNode};
use crate::graph::ops::{find_node_by_id, successors_of};

/// What to do when expansion reaches a node already on the current path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CyclePolicy {
    /// Omit the edge that closes the cycle and keep expanding siblings.
    #[default]
    DropBackEdges,
    /// Abort the whole expansion with [`TreeError::Cycle`].
    Fail,
}

impl FromStr for CyclePolicy {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "drop" => Ok(CyclePolicy::DropBackEdges),
            "fail" => Ok(CyclePolicy::Fail),
            _ => Err(ConfigError::InvalidCyclePolicy(input.to_string())),
        }
    }
}

impl TryFrom<String> for CyclePolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePolicy::DropBackEdges => f.write_str("drop"),
            CyclePolicy::Fail => f.write_str("fail"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// Expands `root` into a tree by following successors.
///
/// Successors that do not resolve to a node are left out of `children`.
/// Cycles are handled according to `policy`; the guard only covers the
/// current root-to-node path, so a node reachable along several paths is
/// expanded under each of them.
pub fn build_tree(
    graph: &Graph,
    root: Option<&Node>,
    policy: CyclePolicy,
) -> Result<Option<TreeNode>, TreeError> {
    let Some(root) = root else {
        return Ok(None);
    };
    let mut path = Vec::new();
    expand(graph, root, policy, &mut path).map(Some)
}

fn expand<'g>(
    graph: &'g Graph,
    node: &'g Node,
    policy: CyclePolicy,
    path: &mut Vec<&'g str>,
) -> Result<TreeNode, TreeError> {
    let mut tree = TreeNode::leaf(node.label.clone(), node.id.clone());
    let successors = successors_of(graph, &node.id);
    if successors.is_empty() {
        return Ok(tree);
    }

    path.push(node.id.as_str());
    let mut children = Vec::with_capacity(successors.len());
    for successor in successors {
        let Some(next) = find_node_by_id(graph, successor.id()) else {
            continue;
        };
        if let Some(pos) = path.iter().position(|id| *id == next.id) {
            match policy {
                CyclePolicy::DropBackEdges => {
                    warn!(
                        from = %node.id,
                        to = %next.id,
                        "dropping back-edge while expanding tree"
                    );
                    continue;
                }
                CyclePolicy::Fail => {
                    let mut cycle: Vec<String> =
                        path[pos..].iter().map(|id| id.to_string()).collect();
                    cycle.push(next.id.clone());
                    return Err(TreeError::Cycle { path: cycle });
                }
            }
        }
        children.push(expand(graph, next, policy, path)?);
    }
    path.pop();

    tree.children = Some(children);
    Ok(tree)
}

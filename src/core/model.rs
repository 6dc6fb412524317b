use serde::{Deserialize, Serialize};

pub const DEFAULT_LINK_TYPE: &str = "Next -->>";

/// A batch parsed from the node source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Link endpoint. Links are built with raw ids and may later be resolved to
/// the full node for consumers that want the node inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    ById(String),
    Resolved(Node),
}

impl NodeRef {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::ById(id) => id,
            NodeRef::Resolved(node) => &node.id,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, NodeRef::Resolved(_))
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        NodeRef::ById(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeRef,
    pub target: NodeRef,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Link {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            source: NodeRef::ById(source.into()),
            target: NodeRef::ById(target.into()),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub inited: bool,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Rewrites every link endpoint whose id names an existing node into a
    /// resolved reference. Dangling endpoints stay as raw ids.
    pub fn materialize(&mut self) {
        let nodes = &self.nodes;
        let resolve = |endpoint: &mut NodeRef| {
            if endpoint.is_resolved() {
                return;
            }
            if let Some(node) = nodes.iter().find(|node| node.id == endpoint.id()) {
                *endpoint = NodeRef::Resolved(node.clone());
            }
        };
        for link in &mut self.links {
            resolve(&mut link.source);
            resolve(&mut link.target);
        }
    }
}

/// One node of the tree expanded from a searched root.
///
/// `children` is `None` when the node has no successors at all and
/// `Some` (possibly empty) when it has successors, even if none of them
/// could be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            children: None,
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(TreeNode::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

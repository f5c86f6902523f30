use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::directive::Port;

/// Identifier of a node in an [`ArenaTree`]. Assigned in pre-order, root = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Edge from a node up to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentEdge {
    pub node: NodeId,
    /// Port at `node` that leads back down to the child.
    pub port: Port,
}

/// Read-only view of a rooted tree with numbered child ports.
pub trait Tree: Send + Sync {
    fn root(&self) -> NodeId;

    fn is_root(&self, node: NodeId) -> bool {
        node == self.root()
    }

    fn parent(&self, node: NodeId) -> Option<ParentEdge>;

    fn child(&self, node: NodeId, port: Port) -> Option<NodeId>;

    /// Child ports of `node` in ascending order.
    fn child_ports(&self, node: NodeId) -> Vec<Port>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Nested, serializable tree description (the tree file format).
///
/// Port `i` of a node leads to `children[i]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn leaf() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<NodeSpec>) -> Self {
        Self { children }
    }

    /// Total number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::count).sum::<usize>()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ArenaNode {
    pub(crate) parent: Option<ParentEdge>,
    pub(crate) children: Vec<NodeId>,
}

/// Flat tree storage indexed by [`NodeId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaTree {
    pub(crate) nodes: Vec<ArenaNode>,
}

impl ArenaTree {
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut nodes = Vec::with_capacity(spec.count());
        push_spec(spec, None, &mut nodes);
        Self { nodes }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

fn push_spec(spec: &NodeSpec, parent: Option<ParentEdge>, nodes: &mut Vec<ArenaNode>) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(ArenaNode {
        parent,
        children: Vec::with_capacity(spec.children.len()),
    });
    for (port, child) in spec.children.iter().enumerate() {
        let child_id = push_spec(child, Some(ParentEdge { node: id, port }), nodes);
        nodes[id.0].children.push(child_id);
    }
    id
}

impl Tree for ArenaTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn parent(&self, node: NodeId) -> Option<ParentEdge> {
        self.nodes.get(node.0).and_then(|entry| entry.parent)
    }

    fn child(&self, node: NodeId, port: Port) -> Option<NodeId> {
        self.nodes
            .get(node.0)
            .and_then(|entry| entry.children.get(port).copied())
    }

    fn child_ports(&self, node: NodeId) -> Vec<Port> {
        self.nodes
            .get(node.0)
            .map(|entry| (0..entry.children.len()).collect())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

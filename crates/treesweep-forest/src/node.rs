/// Index into a tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A node in a decision tree arena.
///
/// Children are referenced by [`NodeId`] into the owning tree's `Vec<Node>`.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// Interior node: samples with `value <= threshold` go left.
    Split {
        variable: usize,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
    /// Terminal node voting for a dense class index.
    Leaf { class: usize },
}

impl Node {
    /// Placeholder written while a node is still queued for growth.
    pub(crate) fn pending() -> Self {
        Node::Leaf { class: 0 }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

//! Node proxy.

use crate::id::NodeId;
use crate::tree::traverse::{Children, DepthFirstTraverse};
use crate::tree::{DebugPrint, Tree};

/// Immutable reference to a node.
///
/// This type guarantees that the node ID is present in the tree's pool and
/// has not been removed yet.
#[derive(Debug)]
pub struct Node<'a, T> {
    /// Owning tree.
    tree: &'a Tree<T>,
    /// Node ID.
    id: NodeId,
}

impl<T> Clone for Node<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

impl<'a, T> Node<'a, T> {
    /// Creates a new `Node` object.
    #[must_use]
    pub(crate) fn new(tree: &'a Tree<T>, id: NodeId) -> Option<Self> {
        if !tree.contains(id) {
            return None;
        }
        Some(Self { tree, id })
    }

    /// Returns the node ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the owning tree.
    #[inline]
    #[must_use]
    pub(crate) fn tree(&self) -> &'a Tree<T> {
        self.tree
    }

    /// Returns a reference to the payload.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'a T {
        self.tree
            .data(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns the node ID of the parent.
    #[must_use]
    pub fn parent_id(&self) -> Option<NodeId> {
        self.tree
            .raw(self.id)
            .expect("[validity] the node has been checked to be alive")
            .parent
    }

    /// Returns the node ID of the first child.
    #[must_use]
    pub fn first_child_id(&self) -> Option<NodeId> {
        self.tree
            .raw(self.id)
            .expect("[validity] the node has been checked to be alive")
            .first_child
    }

    /// Returns the node ID of the next sibling.
    #[must_use]
    pub fn next_sibling_id(&self) -> Option<NodeId> {
        self.tree
            .raw(self.id)
            .expect("[validity] the node has been checked to be alive")
            .next_sibling
    }

    /// Returns the parent node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.parent_id()
            .map(|id| Self::new(self.tree, id).expect("[consistency] the parent must be alive"))
    }

    /// Returns the first child node.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.first_child_id().map(|id| {
            Self::new(self.tree, id).expect("[consistency] the first child must be alive")
        })
    }

    /// Returns the next sibling node.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.next_sibling_id().map(|id| {
            Self::new(self.tree, id).expect("[consistency] the next sibling must be alive")
        })
    }

    /// Returns an iterator over the children, in sibling-chain order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> Children<'a, T> {
        Children::with_parent(self)
    }

    /// Returns a depth-first iterator over the subtree rooted at this node.
    #[inline]
    #[must_use]
    pub fn depth_first_traverse(&self) -> DepthFirstTraverse<'a, T> {
        DepthFirstTraverse::with_toplevel(self)
    }

    /// Returns an object that pretty-prints the subtree with its `Display`
    /// implementation.
    #[inline]
    #[must_use]
    pub fn debug_print(&self) -> DebugPrint<'a, T> {
        DebugPrint::new(*self)
    }
}

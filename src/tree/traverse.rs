//! Tree traversal.

use core::iter;

use crate::id::NodeId;
use crate::tree::{Node, Tree};

/// Depth-first traversal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DftEvent<T> {
    /// Node open.
    Open(T),
    /// Node close.
    Close(T),
}

impl<T> DftEvent<T> {
    /// Converts the internal value.
    pub fn map<F, U>(self, f: F) -> DftEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Open(v) => DftEvent::Open(f(v)),
            Self::Close(v) => DftEvent::Close(f(v)),
        }
    }
}

/// Iterator over the children of a node, in sibling-chain order.
#[derive(Debug, Clone)]
pub struct Children<'a, T> {
    /// Tree being iterated.
    tree: &'a Tree<T>,
    /// Next child to yield.
    next: Option<NodeId>,
}

impl<'a, T> Children<'a, T> {
    /// Creates an iterator over the children of `parent`.
    #[inline]
    #[must_use]
    pub(crate) fn with_parent(parent: &Node<'a, T>) -> Self {
        Self {
            tree: parent.tree(),
            next: parent.first_child_id(),
        }
    }
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = Node::new(self.tree, self.next?)
            .expect("[consistency] children of a live node must be alive");
        self.next = node.next_sibling_id();
        Some(node)
    }
}

impl<T> iter::FusedIterator for Children<'_, T> {}

/// Depth-first traverser emitting an open and a close event per node.
///
/// The traversal is forward-only: node records carry no previous-sibling
/// link, so walking backwards is not possible.
#[derive(Debug, Clone)]
pub struct DepthFirstTraverse<'a, T> {
    /// Tree being traversed.
    tree: &'a Tree<T>,
    /// Top of the traversed subtree; the traversal ends at its close event.
    top: NodeId,
    /// Next event to emit.
    next: Option<DftEvent<NodeId>>,
}

impl<'a, T> DepthFirstTraverse<'a, T> {
    /// Creates a traverser over the subtree rooted at the given node.
    ///
    /// The toplevel does not need to be the root of the tree.
    #[inline]
    #[must_use]
    pub(crate) fn with_toplevel(node: &Node<'a, T>) -> Self {
        Self {
            tree: node.tree(),
            top: node.id(),
            next: Some(DftEvent::Open(node.id())),
        }
    }

    /// Returns the next event without advancing the iterator.
    #[must_use]
    pub fn peek(&self) -> Option<DftEvent<Node<'a, T>>> {
        let ev = self.next?;
        Some(ev.map(|id| {
            Node::new(self.tree, id).expect("[consistency] the node must be part of the tree")
        }))
    }

    /// Computes the event following `ev`, or `None` past the top's close.
    fn next_of(&self, ev: DftEvent<NodeId>) -> Option<DftEvent<NodeId>> {
        match ev {
            DftEvent::Open(id) => {
                // Dive into the first child if available, or leave the node.
                let node = Node::new(self.tree, id)
                    .expect("[consistency] the node being traversed must be alive");
                Some(match node.first_child_id() {
                    Some(first_child) => DftEvent::Open(first_child),
                    None => DftEvent::Close(id),
                })
            }
            DftEvent::Close(id) => {
                if id == self.top {
                    return None;
                }
                // Dive into the next sibling if available, or leave the parent.
                let node = Node::new(self.tree, id)
                    .expect("[consistency] the node being traversed must be alive");
                Some(match node.next_sibling_id() {
                    Some(next_sibling) => DftEvent::Open(next_sibling),
                    None => {
                        let parent = node.parent_id().expect(
                            "[consistency] the parent must exist since the node is not the top",
                        );
                        DftEvent::Close(parent)
                    }
                })
            }
        }
    }
}

impl<'a, T> Iterator for DepthFirstTraverse<'a, T> {
    type Item = DftEvent<Node<'a, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let ev = self.next?;
        self.next = self.next_of(ev);
        Some(ev.map(|id| {
            Node::new(self.tree, id).expect("[consistency] the node must be part of the tree")
        }))
    }
}

impl<T> iter::FusedIterator for DepthFirstTraverse<'_, T> {}

//! Tree builder.

use crate::id::NodeId;
use crate::tree::Tree;

/// Cursor-style tree builder.
///
/// `TreeBuilder` remembers "the current node", starting at the tree's root.
///
/// * [`child()`][`TreeBuilder::child`] appends a new last child to the
///   current node.
/// * [`sibling()`][`TreeBuilder::sibling`] appends a new node at the end of
///   the current node's sibling chain.
/// * [`parent()`][`TreeBuilder::parent`] makes the parent the new current
///   node.
///
/// After every `child`/`sibling` call the current node is the newly created
/// one.
///
/// # Examples
///
/// ```
/// use poplar::{Tree, TreeBuilder};
///
/// let mut tree = Tree::new("root");
/// TreeBuilder::new(&mut tree)
///     .child("0")
///     .child("0-0")
///     .sibling("0-1")
///     .parent()
///     .sibling("1")
///     .child("1-0");
///
/// // Tree:
/// //  root
/// //  |-- 0
/// //  |   |-- 0-0
/// //  |   `-- 0-1
/// //  `-- 1
/// //      `-- 1-0 (<-- current)
///
/// let root = tree.root();
/// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
/// assert_eq!(children, ["0", "1"]);
/// ```
#[derive(Debug)]
pub struct TreeBuilder<'a, T> {
    /// Target tree.
    tree: &'a mut Tree<T>,
    /// Current node.
    current: NodeId,
}

impl<'a, T> TreeBuilder<'a, T> {
    /// Creates a builder whose current node is the tree's root.
    #[must_use]
    pub fn new(tree: &'a mut Tree<T>) -> Self {
        let current = tree.root();
        Self { tree, current }
    }

    /// Returns the node ID of the current node.
    #[inline]
    #[must_use]
    pub fn current_id(&self) -> NodeId {
        self.current
    }

    /// Appends a child node to the current node, and changes the current
    /// node to it.
    ///
    /// # Panics
    ///
    /// Panics if the pool is exhausted.
    pub fn child(&mut self, data: T) -> &mut Self {
        let new = self
            .tree
            .add_child(self.current, data)
            .expect("[precondition] the pool must have room for the new node");
        self.current = new;
        self
    }

    /// Appends a node at the end of the current node's sibling chain, and
    /// changes the current node to it.
    ///
    /// The builder's current node is always the tail of its chain, so this
    /// is simply "add a next sibling".
    ///
    /// # Panics
    ///
    /// Panics if the pool is exhausted.
    pub fn sibling(&mut self, data: T) -> &mut Self {
        let new = self
            .tree
            .add_sibling(self.current, data)
            .expect("[precondition] the pool must have room for the new node");
        self.current = new;
        self
    }

    /// Tries to change the current node to the parent of the current node.
    pub fn try_parent(&mut self) -> Option<&mut Self> {
        let parent = self
            .tree
            .node(self.current)
            .expect("[consistency] nodes in the tree must be alive")
            .parent_id()?;
        self.current = parent;
        Some(self)
    }

    /// Changes the current node to the parent of the current node.
    ///
    /// # Panics
    ///
    /// Panics if the current node is the root of the tree.
    pub fn parent(&mut self) -> &mut Self {
        let parent = self
            .tree
            .node(self.current)
            .expect("[consistency] nodes in the tree must be alive")
            .parent_id()
            .expect("[precondition] the current node should not be the root");
        self.current = parent;
        self
    }
}

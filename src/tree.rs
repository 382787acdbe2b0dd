//! Pooled tree and its structural operations.

mod builder;
mod debug_print;
mod node;
pub mod traverse;

use tracing::debug;

use crate::error::{Result, TreeError};
use crate::id::NodeId;
use crate::pool::Pool;

pub use self::builder::TreeBuilder;
pub use self::debug_print::DebugPrint;
pub use self::node::Node;
pub use self::traverse::{Children, DepthFirstTraverse, DftEvent};

/// A node record as stored in the pool.
#[derive(Debug, Clone)]
pub(crate) struct RawNode<T> {
    /// User payload.
    pub(crate) data: T,
    /// Parent, or `None` for the root of a (sub)tree.
    pub(crate) parent: Option<NodeId>,
    /// First child.
    pub(crate) first_child: Option<NodeId>,
    /// Next child of the same parent.
    pub(crate) next_sibling: Option<NodeId>,
}

impl<T> RawNode<T> {
    /// Creates a record with no neighbors.
    #[inline]
    fn detached(data: T) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            next_sibling: None,
        }
    }
}

/// An n-ary tree whose nodes live in a [`Pool`] and are addressed by
/// [`NodeId`] handles.
///
/// The tree always has a root node; it is created together with the tree and
/// can only disappear when the tree is dropped (or through the low-level
/// [`free_subtree`][`Self::free_subtree`]). Children of a node form a singly
/// linked sibling chain ordered by insertion; appends go to the end of the
/// chain, in O(existing children).
///
/// # Examples
///
/// ```
/// use poplar::Tree;
///
/// let mut tree = Tree::new("root");
/// let root = tree.root();
/// let a = tree.add_child(root, "a").expect("pool has room");
/// tree.add_child(root, "b").expect("pool has room");
/// tree.add_child(a, "a-0").expect("pool has room");
///
/// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
/// assert_eq!(children, ["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree<T> {
    /// Node storage. Owned exclusively by this tree.
    pool: Pool<RawNode<T>>,
    /// ID of the root node.
    root: NodeId,
}

impl<T> Tree<T> {
    /// Creates a tree holding a single root node with the given payload.
    ///
    /// The pool behind the tree has no practical capacity limit; use
    /// [`with_capacity`][`Self::with_capacity`] to bound it.
    #[must_use]
    pub fn new(root_data: T) -> Self {
        let mut pool = Pool::new();
        let root = pool
            .alloc(RawNode::detached(root_data))
            .expect("[consistency] an empty unbounded pool must accept the root allocation");
        Self { pool, root }
    }

    /// Creates a tree whose pool will never hold more than `capacity` nodes
    /// (the root included).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadCapacity`] if `capacity` is zero.
    pub fn with_capacity(root_data: T, capacity: usize) -> Result<Self> {
        let mut pool = Pool::with_capacity(capacity)?;
        let root = pool.alloc(RawNode::detached(root_data))?;
        Ok(Self { pool, root })
    }

    /// Returns the ID of the root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns true if the ID addresses a live node of this tree.
    ///
    /// This only checks slot liveness: an ID whose slot was freed and then
    /// recycled for another node is reported as contained. See the
    /// crate-level documentation on stale IDs.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.pool.contains(id)
    }

    /// Returns the number of live nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Returns the maximum number of nodes the tree may hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Returns a reference to the payload of the node.
    ///
    /// Returns `None` if the ID is invalid or the node has been removed.
    #[inline]
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.pool.get(id).map(|raw| &raw.data).ok()
    }

    /// Returns a mutable reference to the payload of the node.
    ///
    /// Returns `None` if the ID is invalid or the node has been removed.
    #[inline]
    #[must_use]
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.pool.get_mut(id).map(|raw| &mut raw.data).ok()
    }

    /// Returns a [proxy object][`Node`] to the node.
    ///
    /// Returns `None` if the ID is invalid or the node has been removed.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_, T>> {
        Node::new(self, id)
    }

    /// Returns an iterator over the children of the node, in sibling-chain
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_, T> {
        self.node(id)
            .expect("[precondition] the node must be alive")
            .children()
    }

    /// Returns a depth-first iterator over the subtree rooted at `id`,
    /// yielding an open and a close event for every node.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    #[must_use]
    pub fn depth_first_traverse(&self, id: NodeId) -> DepthFirstTraverse<'_, T> {
        self.node(id)
            .expect("[precondition] the node must be alive")
            .depth_first_traverse()
    }

    /// Returns an object that pretty-prints the subtree rooted at `id` with
    /// its `Display` implementation.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    #[must_use]
    pub fn debug_print(&self, id: NodeId) -> DebugPrint<'_, T> {
        DebugPrint::new(
            self.node(id)
                .expect("[precondition] the node must be alive"),
        )
    }

    /// Returns a reference to the raw record for the node.
    #[inline]
    pub(crate) fn raw(&self, id: NodeId) -> Result<&RawNode<T>> {
        self.pool.get(id)
    }

    /// Returns a mutable reference to the raw record for the node.
    #[inline]
    fn raw_mut(&mut self, id: NodeId) -> Result<&mut RawNode<T>> {
        self.pool.get_mut(id)
    }

    /// Walks a sibling chain to its last element.
    fn chain_tail(&self, from: NodeId) -> Result<NodeId> {
        let mut current = from;
        while let Some(next) = self.raw(current)?.next_sibling {
            current = next;
        }
        Ok(current)
    }

    /// Finds the left sibling of `node` within `parent`'s child chain.
    ///
    /// Fails with [`TreeError::BadId`] if `node` is not in the chain or is
    /// the first child.
    fn prev_sibling_of(&self, parent: NodeId, node: NodeId) -> Result<NodeId> {
        let mut current = self.raw(parent)?.first_child.ok_or(TreeError::BadId)?;
        loop {
            match self.raw(current)?.next_sibling {
                Some(next) if next == node => return Ok(current),
                Some(next) => current = next,
                None => return Err(TreeError::BadId),
            }
        }
    }

    /// Splices a detached node onto the end of `parent`'s child chain and
    /// fixes the node's own links.
    fn link_last_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        match self.raw(parent)?.first_child {
            None => self.raw_mut(parent)?.first_child = Some(node),
            Some(first) => {
                let tail = self.chain_tail(first)?;
                self.raw_mut(tail)?.next_sibling = Some(node);
            }
        }
        let raw = self.raw_mut(node)?;
        raw.parent = Some(parent);
        raw.next_sibling = None;
        Ok(())
    }

    /// Redirects whichever link in `parent`'s chain points at `node` to
    /// `target` (which may be `None` to close the gap).
    fn relink_in_chain(
        &mut self,
        parent: NodeId,
        node: NodeId,
        target: Option<NodeId>,
    ) -> Result<()> {
        if self.raw(parent)?.first_child == Some(node) {
            self.raw_mut(parent)?.first_child = target;
        } else {
            let prev = self.prev_sibling_of(parent, node)?;
            self.raw_mut(prev)?.next_sibling = target;
        }
        Ok(())
    }

    /// Allocates a node and appends it at the end of `parent`'s child chain.
    ///
    /// Runs in O(number of existing children).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `parent` is not a live node, and
    /// [`TreeError::PoolExhausted`] if the pool is at capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// tree.add_child(root, "a").expect("pool has room");
    /// tree.add_child(root, "b").expect("pool has room");
    ///
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["a", "b"]);
    /// ```
    pub fn add_child(&mut self, parent: NodeId, data: T) -> Result<NodeId> {
        if !self.pool.contains(parent) {
            return Err(TreeError::BadId);
        }
        let new_id = self.pool.alloc(RawNode::detached(data))?;
        self.link_last_child(parent, new_id)?;
        Ok(new_id)
    }

    /// Allocates a node and appends it at the end of the sibling chain
    /// **reachable from `after`**.
    ///
    /// The chain is walked from `after` itself, not from its parent's first
    /// child, and the new node inherits the parent of the chain's last
    /// element. Since every element of a chain shares one parent, the result
    /// is a new last child of `after`'s parent; the quirk only matters in
    /// that the walk starts mid-chain. This mirrors longstanding caller
    /// expectations; prefer [`add_child`][`Self::add_child`] on the parent
    /// for new code.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `after` is not a live node, and
    /// [`TreeError::PoolExhausted`] if the pool is at capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// let a = tree.add_child(root, "a").expect("pool has room");
    /// tree.add_child(root, "b").expect("pool has room");
    ///
    /// // Appends at the end of the chain, even though `a` is first.
    /// tree.add_sibling(a, "c").expect("pool has room");
    ///
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["a", "b", "c"]);
    /// ```
    pub fn add_sibling(&mut self, after: NodeId, data: T) -> Result<NodeId> {
        if !self.pool.contains(after) {
            return Err(TreeError::BadId);
        }
        let tail = self.chain_tail(after)?;
        let parent = self.raw(tail)?.parent;
        let new_id = self.pool.alloc(RawNode::detached(data))?;
        self.raw_mut(tail)?.next_sibling = Some(new_id);
        self.raw_mut(new_id)?.parent = parent;
        Ok(new_id)
    }

    /// Attaches an already-allocated, parentless node as the new last child
    /// of `parent`.
    ///
    /// This is how detached subtrees (from [`clone_subtree`][`Self::clone_subtree`]
    /// or [`replace_node`][`Self::replace_node`]) are joined back into the
    /// tree.
    ///
    /// `child` must be parentless and must not be an ancestor of `parent`;
    /// violating this is a caller bug (checked with `debug_assert!`, not at
    /// runtime in release builds).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if either node is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// let a = tree.add_child(root, "a").expect("pool has room");
    /// let copy = tree.clone_subtree(a).expect("pool has room");
    ///
    /// tree.adopt_child(root, copy).expect("the clone is parentless");
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["a", "a"]);
    /// ```
    pub fn adopt_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.pool.contains(parent) || !self.pool.contains(child) {
            return Err(TreeError::BadId);
        }
        debug_assert!(
            self.raw(child).map_or(false, |raw| raw.parent.is_none()),
            "[precondition] the adopted node must be parentless"
        );
        debug_assert_ne!(
            child, self.root,
            "[precondition] the tree root cannot be adopted"
        );
        self.link_last_child(parent, child)
    }

    /// Takes `current` out of its position and puts `replacement` there
    /// instead.
    ///
    /// `current` keeps its children and leaves as a parentless subtree root;
    /// `replacement` (which must be parentless) takes over `current`'s
    /// parent and next sibling.
    ///
    /// Replacing a parentless node (the root, or a detached subtree root) is
    /// a **no-op**: there is no position to take over.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if either node is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// let a = tree.add_child(root, "a").expect("pool has room");
    /// let b = tree.add_child(root, "b").expect("pool has room");
    ///
    /// let copy = tree.clone_subtree(a).expect("pool has room");
    /// tree.replace_node(b, copy).expect("both nodes are alive");
    ///
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["a", "a"]);
    ///
    /// // `b` is detached now, not destroyed; free it when done with it.
    /// tree.free_subtree(b).expect("b is alive and detached");
    /// ```
    pub fn replace_node(&mut self, current: NodeId, replacement: NodeId) -> Result<()> {
        if !self.pool.contains(current) || !self.pool.contains(replacement) {
            return Err(TreeError::BadId);
        }
        debug_assert!(
            self.raw(replacement).map_or(false, |raw| raw.parent.is_none()),
            "[precondition] the replacement node must be parentless"
        );
        debug_assert_ne!(
            current, replacement,
            "[precondition] a node cannot replace itself"
        );

        let (parent, next) = {
            let raw = self.raw(current)?;
            (raw.parent, raw.next_sibling)
        };
        let parent = match parent {
            Some(parent) => parent,
            // A parentless node occupies no position; nothing to replace.
            None => return Ok(()),
        };

        self.relink_in_chain(parent, current, Some(replacement))?;

        let raw = self.raw_mut(replacement)?;
        raw.parent = Some(parent);
        raw.next_sibling = next;

        let raw = self.raw_mut(current)?;
        raw.parent = None;
        raw.next_sibling = None;
        Ok(())
    }

    /// Removes the child of `parent` at zero-based position `pos` and
    /// returns its payload.
    ///
    /// If the removed node has children, they are **promoted**: reparented
    /// to `parent` and spliced into the exact position the removed node
    /// occupied, with the removed node's former successor following the last
    /// of them. A childless node is simply unlinked.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `parent` is not a live node, and
    /// [`TreeError::BadPos`] if `parent` has no child at `pos`.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// let a = tree.add_child(root, "a").expect("pool has room");
    /// tree.add_child(a, "x").expect("pool has room");
    /// tree.add_child(a, "y").expect("pool has room");
    /// tree.add_child(root, "b").expect("pool has room");
    ///
    /// // Removing `a` promotes its children into its place.
    /// let removed = tree.remove_child(root, 0).expect("position 0 exists");
    /// assert_eq!(removed, "a");
    ///
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["x", "y", "b"]);
    /// ```
    pub fn remove_child(&mut self, parent: NodeId, pos: usize) -> Result<T> {
        if !self.pool.contains(parent) {
            return Err(TreeError::BadId);
        }

        // Locate the victim; remember the node whose link points at it.
        let mut prev: Option<NodeId> = None;
        let mut victim = self.raw(parent)?.first_child.ok_or(TreeError::BadPos(pos))?;
        for _ in 0..pos {
            prev = Some(victim);
            victim = self
                .raw(victim)?
                .next_sibling
                .ok_or(TreeError::BadPos(pos))?;
        }

        let (first_grandchild, successor) = {
            let raw = self.raw(victim)?;
            (raw.first_child, raw.next_sibling)
        };

        // Promotion: the grandchildren chain takes over the victim's
        // position, and the victim's successor follows its tail.
        let filler = match first_grandchild {
            Some(first) => {
                let mut grandchild = Some(first);
                while let Some(id) = grandchild {
                    let raw = self.raw_mut(id)?;
                    raw.parent = Some(parent);
                    grandchild = raw.next_sibling;
                }
                let tail = self.chain_tail(first)?;
                self.raw_mut(tail)?.next_sibling = successor;
                Some(first)
            }
            None => successor,
        };

        match prev {
            None => self.raw_mut(parent)?.first_child = filler,
            Some(prev) => self.raw_mut(prev)?.next_sibling = filler,
        }

        let raw = self.pool.free(victim)?;
        Ok(raw.data)
    }

    /// Frees `id` and every descendant, recursing into each child before
    /// moving to its next sibling.
    ///
    /// This is a low-level primitive: the parent/sibling links **pointing
    /// at** `id` are left untouched, so the caller must have detached `id`
    /// first (or must be destroying the structure wholesale). For the
    /// link-correct variant, use [`remove_subtree`][`Self::remove_subtree`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node. Propagates
    /// the first failure from a descendant immediately, abandoning the
    /// remaining siblings.
    pub fn free_subtree(&mut self, id: NodeId) -> Result<()> {
        if !self.pool.contains(id) {
            return Err(TreeError::BadId);
        }
        let mut child = self.raw(id)?.first_child;
        while let Some(current) = child {
            // Read the successor before the node is freed.
            child = self.raw(current)?.next_sibling;
            self.free_subtree(current)?;
        }
        self.pool.free(id)?;
        Ok(())
    }

    /// Destroys the subtree rooted at `id`: frees every descendant, and, if
    /// `id` has a parent, unlinks `id` from the parent's chain and frees it
    /// too.
    ///
    /// On a parentless node (the tree root or a detached subtree root) only
    /// the descendants are destroyed; the node itself stays, childless.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node. Propagates
    /// the first failure from a descendant immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new("root");
    /// let root = tree.root();
    /// let a = tree.add_child(root, "a").expect("pool has room");
    /// tree.add_child(a, "a-0").expect("pool has room");
    /// tree.add_child(root, "b").expect("pool has room");
    ///
    /// tree.remove_subtree(a).expect("a is alive");
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, ["b"]);
    /// assert_eq!(tree.node_count(), 2);
    /// ```
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if !self.pool.contains(id) {
            return Err(TreeError::BadId);
        }
        debug!(node = ?id, "removing subtree");

        let mut child = self.raw(id)?.first_child;
        while let Some(current) = child {
            child = self.raw(current)?.next_sibling;
            self.free_subtree(current)?;
        }
        self.raw_mut(id)?.first_child = None;

        // The descendants are gone already, so unlinking `id` is the same
        // splice as removing a childless node.
        let (parent, next) = {
            let raw = self.raw(id)?;
            (raw.parent, raw.next_sibling)
        };
        if let Some(parent) = parent {
            self.relink_in_chain(parent, id, next)?;
            self.pool.free(id)?;
        }
        Ok(())
    }
}

impl<T: Clone> Tree<T> {
    /// Deep-copies the subtree rooted at `id` into a brand-new, parentless
    /// subtree with fresh IDs, and returns the ID of its root.
    ///
    /// Payloads are cloned, children are copied in sibling order, and the
    /// source subtree is left unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node, and
    /// [`TreeError::PoolExhausted`] if the pool fills up partway; in that
    /// case the partially built copy stays allocated but detached.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::Tree;
    ///
    /// let mut tree = Tree::new(0);
    /// let root = tree.root();
    /// let a = tree.add_child(root, 1).expect("pool has room");
    /// tree.add_child(a, 2).expect("pool has room");
    ///
    /// let copy = tree.clone_subtree(a).expect("pool has room");
    /// assert_ne!(copy, a);
    ///
    /// // The copy is independent: mutating it leaves the source alone.
    /// *tree.data_mut(copy).expect("the copy is alive") = 100;
    /// assert_eq!(tree.data(a), Some(&1));
    /// ```
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        if !self.pool.contains(id) {
            return Err(TreeError::BadId);
        }
        let data = self.raw(id)?.data.clone();
        let copy = self.pool.alloc(RawNode::detached(data))?;

        let mut child = self.raw(id)?.first_child;
        while let Some(current) = child {
            child = self.raw(current)?.next_sibling;
            let child_copy = self.clone_subtree(current)?;
            self.adopt_child(copy, child_copy)?;
        }
        Ok(copy)
    }
}

//! Graphviz export.

use std::io::Write;

use crate::codec::Codec;
use crate::error::{Result, TreeError};
use crate::id::NodeId;
use crate::tree::{DftEvent, Tree};

impl<T> Tree<T> {
    /// Writes the subtree rooted at `id` to `out` as a Graphviz `digraph`.
    ///
    /// Every node becomes a record labeled with its slot index and its
    /// payload (via [`Codec::print_data`]); every parent→child link becomes
    /// an edge. The output is a debugging aid; its exact shape is not
    /// stable, and payloads containing Graphviz metacharacters are not
    /// escaped.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node, and
    /// propagates the first codec or I/O failure immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::{FromStrCodec, Tree};
    ///
    /// let mut tree = Tree::new(10);
    /// let root = tree.root();
    /// tree.add_child(root, 11).expect("pool has room");
    ///
    /// let mut buf = Vec::new();
    /// tree.dump_graphviz(root, &mut buf, &FromStrCodec)
    ///     .expect("writing to a Vec cannot fail");
    ///
    /// let dot = String::from_utf8(buf).expect("the dump is plain text");
    /// assert!(dot.starts_with("digraph tree {"));
    /// assert!(dot.contains("node0 -> node1"));
    /// ```
    pub fn dump_graphviz<W: Write>(
        &self,
        id: NodeId,
        out: &mut W,
        codec: &impl Codec<T>,
    ) -> Result<()> {
        if !self.contains(id) {
            return Err(TreeError::BadId);
        }

        writeln!(out, "digraph tree {{")?;
        writeln!(out, "\tnode [shape=record]")?;

        // Records first, then edges, so the cluster reads as a block.
        for ev in self.depth_first_traverse(id) {
            if let DftEvent::Open(node) = ev {
                let index = node.id().index();
                write!(out, "\tnode{index} [label=\"Node {index} | ")?;
                codec.print_data(node.data(), out)?;
                writeln!(out, "\"]")?;
            }
        }
        for ev in self.depth_first_traverse(id) {
            if let DftEvent::Open(node) = ev {
                if node.id() == id {
                    continue;
                }
                let parent = node
                    .parent_id()
                    .expect("[consistency] non-top nodes of the traversal have parents");
                writeln!(out, "\tnode{} -> node{}", parent.index(), node.id().index())?;
            }
        }

        writeln!(out, "}}")?;
        Ok(())
    }
}

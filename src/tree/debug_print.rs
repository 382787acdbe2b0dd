//! Debug printer.

use core::fmt;

use crate::tree::traverse::DftEvent;
use crate::tree::Node;

/// Tree printer for debugging.
///
/// Renders a subtree as an ASCII diagram, one node per line. This is
/// provided mainly for debugging purpose; the output format is not
/// guaranteed to be stable, and format changes won't be considered as
/// breaking changes. Payloads are expected to render on a single line.
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
///     .parent()
///     .sibling("1");
///
/// let expected = "\
/// root
/// |-- 0
/// |   `-- 0-0
/// `-- 1";
/// assert_eq!(tree.debug_print(tree.root()).to_string(), expected);
/// ```
pub struct DebugPrint<'a, T> {
    /// Root node of the (sub)tree to print.
    node: Node<'a, T>,
}

impl<'a, T> DebugPrint<'a, T> {
    /// Creates a new `DebugPrint` object for the node.
    pub(crate) fn new(node: Node<'a, T>) -> Self {
        Self { node }
    }
}

impl<'a, T: fmt::Display> fmt::Display for DebugPrint<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events = self.node.depth_first_traverse();

        // Print the first (root) node without any indent.
        events.next();
        write!(f, "{}", self.node.data())?;

        // Prefixes accumulated for the ancestors of the current node.
        let mut prefixes: Vec<&str> = Vec::new();
        for ev in events {
            match ev {
                DftEvent::Open(node) => {
                    let is_last_item = node.next_sibling_id().is_none();
                    writeln!(f)?;
                    for prefix in &prefixes {
                        f.write_str(prefix)?;
                    }
                    f.write_str(if is_last_item { "`-- " } else { "|-- " })?;
                    write!(f, "{}", node.data())?;
                    prefixes.push(if is_last_item { "    " } else { "|   " });
                }
                DftEvent::Close(_) => {
                    prefixes.pop();
                }
            }
        }
        Ok(())
    }
}

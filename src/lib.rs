//! Pooled n-ary tree addressed by stable node IDs, with a plain-text
//! store/restore format.
//!
//! # Overview
//!
//! A [`Tree`] keeps all of its nodes in a [`Pool`], a slot allocator that
//! hands out integer-backed [`NodeId`] handles. Structural links (parent,
//! first child, next sibling) are stored as optional IDs rather than
//! references, so arbitrary restructuring is possible without lifetime
//! gymnastics:
//!
//! * [`Tree::add_child`] / [`Tree::add_sibling`] append nodes to a sibling
//!   chain, preserving insertion order.
//! * [`Tree::remove_child`] removes a child by position and **promotes** its
//!   children into the vacated position instead of discarding them.
//! * [`Tree::remove_subtree`] and [`Tree::free_subtree`] destroy whole
//!   subtrees.
//! * [`Tree::clone_subtree`] deep-copies a subtree into a fresh, detached one.
//! * [`Tree::replace_node`] swaps a node out of its position in place.
//!
//! The [`persist`] module round-trips trees through a line-oriented bracket
//! grammar (see [`Tree::store_subtree`] and [`Tree::restore`]), with payload
//! encoding delegated to a user-supplied [`Codec`].
//!
//! # Examples
//!
//! ```
//! use poplar::{FromStrCodec, Tree};
//!
//! let mut tree = Tree::new(1000_i32);
//! let root = tree.root();
//! let lhs = tree.add_child(root, 1100).expect("pool has room");
//! tree.add_child(lhs, 1110).expect("pool has room");
//! tree.add_child(root, 1200).expect("pool has room");
//!
//! let mut buf = Vec::new();
//! tree.store_subtree(root, &mut buf, &FromStrCodec)
//!     .expect("writing to a Vec cannot fail");
//!
//! let restored: Tree<i32> =
//!     Tree::restore(&mut buf.as_slice(), &FromStrCodec).expect("well-formed input");
//! assert_eq!(restored.data(restored.root()), Some(&1000));
//! ```
//!
//! # Stale IDs
//!
//! A [`NodeId`] is only meaningful for the [`Tree`] that issued it, and only
//! for the interval between the allocation of its slot and the next free of
//! that slot. Freed slots are recycled: an ID held across a free may later
//! address an unrelated node, and **no detection mechanism exists** for this.
//! Callers must drop every ID reachable from a subtree they destroy.
//! [`Tree::contains`] only reports whether the slot is currently live, not
//! whether it still holds the node the ID was issued for.
//!
//! # Concurrency
//!
//! Fully synchronous and single-threaded. A `Tree` is an exclusively owned
//! value; share it across threads behind your own synchronization or not at
//! all. There is no transactional rollback: a multi-step operation that fails
//! partway (e.g. pool exhaustion during a clone or a restore) leaves the tree
//! in the partially mutated state it reached.

#![warn(missing_docs)]

pub mod codec;
mod dot;
pub mod error;
mod id;
pub mod persist;
pub mod pool;
pub mod tree;

pub use self::codec::{Codec, FromStrCodec};
pub use self::error::{Result, TreeError};
pub use self::id::NodeId;
pub use self::persist::{is_bare_token, LineReader};
pub use self::pool::Pool;
pub use self::tree::{DebugPrint, DftEvent, Node, Tree, TreeBuilder};

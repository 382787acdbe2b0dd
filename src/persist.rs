//! Plain-text tree persistence.
//!
//! # Format
//!
//! One token or payload line per line of text:
//!
//! ```text
//! node    := "{" payload child* "}"
//! payload := "[" <codec-serialized data lines> "]"
//! child   := node
//! ```
//!
//! A line counts as a bare token only if it holds the token and nothing but
//! whitespace around it (see [`is_bare_token`]). Indentation is cosmetic;
//! the restore side ignores it. Blank lines and unrecognized lines between
//! tokens are skipped.
//!
//! # Limitations
//!
//! The restore side performs **no schema validation** beyond bracket
//! matching: input that is bracket-balanced but otherwise malformed (e.g. a
//! node with two payload blocks) produces a structurally surprising (though
//! memory-safe) tree rather than a clean error in every case. Unterminated
//! blocks fail with [`TreeError::BadRestoration`]; payloads the codec
//! rejects fail with [`TreeError::BadData`].

use std::io::{BufRead, Write};

use tracing::trace;

use crate::codec::Codec;
use crate::error::{Result, TreeError};
use crate::id::NodeId;
use crate::tree::Tree;

/// Opening token of a node block.
const NODE_OPEN: &str = "{";
/// Closing token of a node block.
const NODE_CLOSE: &str = "}";
/// Opening token of a payload block.
const DATA_OPEN: &str = "[";
/// Closing token of a payload block.
const DATA_CLOSE: &str = "]";

/// Returns true if `line` holds exactly `token` surrounded by nothing but
/// whitespace.
///
/// This trim-match-trim predicate is the format's only lexical rule; codecs
/// reuse it to recognize their closing `]` line.
///
/// # Examples
///
/// ```
/// use poplar::is_bare_token;
///
/// assert!(is_bare_token("{", "{"));
/// assert!(is_bare_token("\t\t{  ", "{"));
/// assert!(!is_bare_token("{ x", "{"));
/// assert!(!is_bare_token("{{", "{"));
/// ```
#[inline]
#[must_use]
pub fn is_bare_token(line: &str, token: &str) -> bool {
    line.trim() == token
}

/// Line-oriented reader shared between the restore walk and the codec.
///
/// Wraps any [`BufRead`] and hands out one line at a time with the trailing
/// line break stripped.
pub struct LineReader<'a> {
    /// Underlying reader.
    inner: &'a mut dyn BufRead,
}

impl<'a> LineReader<'a> {
    /// Creates a reader over `inner`.
    #[inline]
    pub fn new(inner: &'a mut dyn BufRead) -> Self {
        Self { inner }
    }

    /// Reads the next line, without its trailing line break.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }
}

/// Writes `level` tabs of cosmetic indentation.
fn indent(out: &mut dyn Write, level: usize) -> Result<()> {
    for _ in 0..level {
        out.write_all(b"\t")?;
    }
    Ok(())
}

impl<T> Tree<T> {
    /// Writes the subtree rooted at `id` to `out` in the
    /// [module-level format][`crate::persist`].
    ///
    /// Emission is depth-first and pre-order: the node block opens, the
    /// payload block is written through the codec, each child follows in
    /// sibling-chain order, and the node block closes.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node, and
    /// propagates the first codec or I/O failure immediately.
    pub fn store_subtree<W: Write>(
        &self,
        id: NodeId,
        out: &mut W,
        codec: &impl Codec<T>,
    ) -> Result<()> {
        if !self.contains(id) {
            return Err(TreeError::BadId);
        }
        self.store_block(id, 0, out, codec)
    }

    /// Recursively emits one node block at the given nesting depth.
    fn store_block(
        &self,
        id: NodeId,
        level: usize,
        out: &mut dyn Write,
        codec: &impl Codec<T>,
    ) -> Result<()> {
        trace!(node = ?id, depth = level, "storing node block");
        let raw = self.raw(id)?;

        indent(out, level)?;
        writeln!(out, "{NODE_OPEN}")?;

        indent(out, level + 1)?;
        writeln!(out, "{DATA_OPEN}")?;
        codec.store_data(&raw.data, level + 2, out)?;
        indent(out, level + 1)?;
        writeln!(out, "{DATA_CLOSE}")?;

        let mut child = raw.first_child;
        while let Some(current) = child {
            child = self.raw(current)?.next_sibling;
            self.store_block(current, level + 1, out, codec)?;
        }

        indent(out, level)?;
        writeln!(out, "{NODE_CLOSE}")?;
        Ok(())
    }
}

impl<T: Default> Tree<T> {
    /// Reads children and payload for `id` from `reader`, assuming `id`'s
    /// own `{` has already been consumed.
    ///
    /// New children are appended at the end of `id`'s existing child chain,
    /// so restoring into a node that already has children preserves their
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if `id` is not a live node,
    /// [`TreeError::BadRestoration`] if the input ends before the block is
    /// closed, and propagates codec ([`TreeError::BadData`]) and I/O
    /// failures immediately. On failure the children restored so far stay in
    /// the tree.
    pub fn restore_subtree<R: BufRead>(
        &mut self,
        id: NodeId,
        reader: &mut R,
        codec: &impl Codec<T>,
    ) -> Result<()> {
        if !self.contains(id) {
            return Err(TreeError::BadId);
        }
        let mut lines = LineReader::new(reader);
        self.restore_block(id, &mut lines, codec)
    }

    /// Recursively consumes one node block's contents through its `}`.
    fn restore_block(
        &mut self,
        id: NodeId,
        lines: &mut LineReader<'_>,
        codec: &impl Codec<T>,
    ) -> Result<()> {
        // The block for `id` is already open.
        let mut depth = 1_usize;
        while depth > 0 {
            let line = lines.next_line()?.ok_or(TreeError::BadRestoration)?;
            if is_bare_token(&line, NODE_OPEN) {
                let child = self.add_child(id, T::default())?;
                trace!(node = ?child, "restoring child block");
                // The recursion consumes the child's matching `}`.
                self.restore_block(child, lines, codec)?;
            } else if is_bare_token(&line, NODE_CLOSE) {
                depth -= 1;
            } else if is_bare_token(&line, DATA_OPEN) {
                let data = self.data_mut(id).ok_or(TreeError::BadId)?;
                codec.restore_data(data, lines)?;
            }
            // Anything else is skipped; the format carries no validation.
        }
        Ok(())
    }

    /// Reads a whole tree from `reader`.
    ///
    /// A fresh tree is created with a default root payload. If the first
    /// line is a bare `{`, the rest of the input is restored into the root;
    /// otherwise the input denotes the root-only tree.
    ///
    /// See the [module-level documentation][`crate::persist`] for what this
    /// parser does **not** validate.
    ///
    /// # Errors
    ///
    /// Same failures as [`restore_subtree`][`Self::restore_subtree`]; a
    /// partially restored tree is dropped on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use poplar::{FromStrCodec, Tree};
    ///
    /// let text = "{\n[\n10\n]\n{\n[\n11\n]\n}\n}\n";
    /// let tree: Tree<i32> =
    ///     Tree::restore(&mut text.as_bytes(), &FromStrCodec).expect("well-formed input");
    ///
    /// let root = tree.root();
    /// assert_eq!(tree.data(root), Some(&10));
    /// let children: Vec<_> = tree.children(root).map(|node| *node.data()).collect();
    /// assert_eq!(children, [11]);
    /// ```
    pub fn restore<R: BufRead>(reader: &mut R, codec: &impl Codec<T>) -> Result<Self> {
        let mut tree = Tree::new(T::default());
        let mut lines = LineReader::new(reader);
        match lines.next_line()? {
            Some(line) if is_bare_token(&line, NODE_OPEN) => {
                let root = tree.root();
                tree.restore_block(root, &mut lines, codec)?;
            }
            // No opening token: the input denotes the root-only tree.
            _ => {}
        }
        Ok(tree)
    }
}

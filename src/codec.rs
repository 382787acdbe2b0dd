//! Per-payload persistence callbacks.

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Result, TreeError};
use crate::persist::{is_bare_token, LineReader};

/// Serialization contract for one node payload.
///
/// The tree's store/restore walk (see the [`persist`][`crate::persist`]
/// module) owns the `{`/`}`/`[`/`]` structure of the format; a `Codec` only
/// reads and writes the lines **between** `[` and `]`, plus the closing `]`
/// itself on the read side.
pub trait Codec<T> {
    /// Writes one payload's textual representation to `out`.
    ///
    /// `level` is the nesting depth of the owning node, for cosmetic
    /// indentation only; the restore side ignores leading whitespace.
    /// The output must end with a newline.
    ///
    /// # Errors
    ///
    /// Any error aborts the store walk and propagates to the caller.
    fn store_data(&self, data: &T, level: usize, out: &mut dyn Write) -> Result<()>;

    /// Reads one payload back from `lines`, consuming input up to **and
    /// including** the line holding the matching `]` token.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadData`] for malformed input. Any error aborts
    /// the restore walk and propagates to the caller.
    fn restore_data(&self, data: &mut T, lines: &mut LineReader<'_>) -> Result<()>;

    /// Writes a short single-line form of the payload, with no trailing
    /// newline. Used by the Graphviz export.
    ///
    /// # Errors
    ///
    /// Any error aborts the export and propagates to the caller.
    fn print_data(&self, data: &T, out: &mut dyn Write) -> Result<()>;
}

/// Codec for payloads that round-trip through `Display`/`FromStr` on a
/// single line.
///
/// # Examples
///
/// ```
/// use poplar::{FromStrCodec, Tree};
///
/// let tree = Tree::new(42_u32);
/// let mut buf = Vec::new();
/// tree.store_subtree(tree.root(), &mut buf, &FromStrCodec)
///     .expect("writing to a Vec cannot fail");
///
/// let text = String::from_utf8(buf).expect("the format is plain text");
/// assert!(text.lines().any(|line| line.trim() == "42"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FromStrCodec;

impl<T: Display + FromStr> Codec<T> for FromStrCodec {
    fn store_data(&self, data: &T, level: usize, out: &mut dyn Write) -> Result<()> {
        for _ in 0..level {
            out.write_all(b"\t")?;
        }
        writeln!(out, "{data}")?;
        Ok(())
    }

    fn restore_data(&self, data: &mut T, lines: &mut LineReader<'_>) -> Result<()> {
        let line = lines.next_line()?.ok_or(TreeError::BadData)?;
        *data = line.trim().parse().map_err(|_| TreeError::BadData)?;

        // The payload block must close right after the single value line.
        let close = lines.next_line()?.ok_or(TreeError::BadData)?;
        if !is_bare_token(&close, "]") {
            return Err(TreeError::BadData);
        }
        Ok(())
    }

    fn print_data(&self, data: &T, out: &mut dyn Write) -> Result<()> {
        write!(out, "{data}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_indents_and_terminates_line() {
        let mut buf = Vec::new();
        FromStrCodec
            .store_data(&7_i32, 2, &mut buf)
            .expect("writing to a Vec cannot fail");
        assert_eq!(buf, b"\t\t7\n");
    }

    #[test]
    fn restore_consumes_closing_bracket() {
        let mut input: &[u8] = b"  37\n]\nrest\n";
        let mut lines = LineReader::new(&mut input);
        let mut value = 0_i32;
        FromStrCodec
            .restore_data(&mut value, &mut lines)
            .expect("well-formed payload");
        assert_eq!(value, 37);
        // The next line after the payload block is untouched.
        assert_eq!(lines.next_line().expect("no i/o error"), Some("rest".to_owned()));
    }

    #[test]
    fn restore_rejects_garbage_value() {
        let mut input: &[u8] = b"not-a-number\n]\n";
        let mut lines = LineReader::new(&mut input);
        let mut value = 0_i32;
        assert!(matches!(
            FromStrCodec.restore_data(&mut value, &mut lines),
            Err(TreeError::BadData)
        ));
    }

    #[test]
    fn restore_rejects_missing_close() {
        let mut input: &[u8] = b"37\n37\n";
        let mut lines = LineReader::new(&mut input);
        let mut value = 0_i32;
        assert!(matches!(
            FromStrCodec.restore_data(&mut value, &mut lines),
            Err(TreeError::BadData)
        ));
    }
}

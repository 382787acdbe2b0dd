//! Node ID.

use core::fmt;
use core::num::NonZeroUsize;

/// `usize` that is known not to equal `usize::MAX`.
///
/// Stored as the bitwise complement of the value inside a `NonZeroUsize`, so
/// `Option<NonMaxUsize>` is guaranteed to be the same size as `NonMaxUsize`
/// itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
struct NonMaxUsize(NonZeroUsize);

impl NonMaxUsize {
    /// Creates a non-max usize value.
    #[inline]
    #[must_use]
    const fn new(n: usize) -> Option<Self> {
        // Cannot use `Option<_>::map` here since it is not a `const` function.
        match NonZeroUsize::new(!n) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the value as a `usize` type.
    #[inline]
    #[must_use]
    const fn get(self) -> usize {
        !self.0.get()
    }
}

impl fmt::Debug for NonMaxUsize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

/// Node ID: a stable handle to a slot in a [`Pool`][`crate::Pool`].
///
/// The "no node" sentinel of the link fields is `Option::<NodeId>::None`;
/// thanks to niche optimization `Option<NodeId>` is no larger than `NodeId`.
///
/// An ID stays valid from the allocation of its slot until that slot is
/// freed. Holding an ID past a free of its slot is a caller error with no
/// detection mechanism; see the crate-level documentation.
///
/// The value printed by the `Debug` impl is for dumping only; it carries no
/// guarantee about allocation order and must not be parsed back.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(NonMaxUsize);

impl NodeId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0.get()
    }

    /// Creates a node ID from a raw slot index.
    ///
    /// Returns `None` if the given value is too large.
    #[inline]
    #[must_use]
    pub(crate) fn from_index(v: usize) -> Option<Self> {
        NonMaxUsize::new(v).map(Self)
    }
}

// Prevent `{:#?}` from printing the value in redundant 3 lines.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:?})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::mem;

    #[test]
    fn niche_optimized() {
        assert_eq!(
            mem::size_of::<NodeId>(),
            mem::size_of::<Option<NodeId>>(),
            "`Option<NodeId>` type must have the same size as \
             `NodeId` type due to niche optimization"
        );
    }

    #[test]
    fn round_trips_index() {
        let id = NodeId::from_index(42).expect("42 is representable");
        assert_eq!(id.index(), 42);
        assert!(NodeId::from_index(usize::MAX).is_none());
    }
}

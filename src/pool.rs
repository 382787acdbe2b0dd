//! Slot pool.

use crate::error::{Result, TreeError};
use crate::id::NodeId;

/// A single pool slot.
// This could be `MaybeUninit<T>` plus an occupancy bitmap, but manually
// managing possibly uninitialized elements would be error prone and `unsafe`.
// An enum keeps the vacancy state and the value in one place.
#[derive(Debug, Clone)]
enum Slot<T> {
    /// Live value.
    Occupied(T),
    /// Freed slot, available for reuse.
    Vacant,
}

/// Capacity-bounded slot allocator handing out stable [`NodeId`] handles.
///
/// Freed slots go onto an explicit free list and are recycled LIFO by later
/// allocations. The pool never shrinks and slot indices never move, so an ID
/// stays valid until its slot is freed.
///
/// Recycling is also the source of the stale-ID hazard: an ID held across a
/// free of its slot may later address an unrelated value, and
/// [`contains`][`Self::contains`] cannot tell the two apart. See the
/// crate-level documentation.
///
/// # Examples
///
/// ```
/// use poplar::Pool;
///
/// let mut pool = Pool::new();
/// let id = pool.alloc("alpha").expect("unbounded pool accepts allocations");
/// assert_eq!(pool.get(id).ok(), Some(&"alpha"));
///
/// let evicted = pool.free(id).expect("the slot is live");
/// assert_eq!(evicted, "alpha");
/// assert!(!pool.contains(id));
/// ```
#[derive(Debug, Clone)]
pub struct Pool<T> {
    /// Slot storage. Never shrinks.
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots available for reuse.
    free: Vec<usize>,
    /// Hard limit on the number of slots.
    capacity: usize,
}

impl<T> Pool<T> {
    /// Creates a pool with no practical capacity limit.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity: usize::MAX,
        }
    }

    /// Creates a pool that will never hold more than `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TreeError::BadCapacity(capacity));
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
        })
    }

    /// Allocates a slot for `value` and returns its ID.
    ///
    /// A vacant slot is reused if one exists; otherwise a new slot is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PoolExhausted`] if the pool is at capacity.
    pub fn alloc(&mut self, value: T) -> Result<NodeId> {
        let index = match self.free.pop() {
            Some(index) => {
                debug_assert!(
                    matches!(self.slots[index], Slot::Vacant),
                    "[consistency] free list entries must address vacant slots"
                );
                self.slots[index] = Slot::Occupied(value);
                index
            }
            None => {
                if self.slots.len() >= self.capacity {
                    return Err(TreeError::PoolExhausted);
                }
                self.slots.push(Slot::Occupied(value));
                self.slots.len() - 1
            }
        };
        NodeId::from_index(index).ok_or(TreeError::PoolExhausted)
    }

    /// Returns a reference to the value in the slot.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if the slot is out of range or vacant.
    #[inline]
    pub fn get(&self, id: NodeId) -> Result<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(value)) => Ok(value),
            _ => Err(TreeError::BadId),
        }
    }

    /// Returns a mutable reference to the value in the slot.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if the slot is out of range or vacant.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(value)) => Ok(value),
            _ => Err(TreeError::BadId),
        }
    }

    /// Frees the slot and returns the value it held.
    ///
    /// The slot becomes available for future allocations immediately; any ID
    /// for it that the caller retains goes stale.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::BadId`] if the slot is out of range or already
    /// vacant.
    pub fn free(&mut self, id: NodeId) -> Result<T> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(TreeError::BadId)?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free.push(id.index());
                Ok(value)
            }
            Slot::Vacant => Err(TreeError::BadId),
        }
    }

    /// Returns true if the ID addresses a live slot.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.index()), Some(Slot::Occupied(_)))
    }

    /// Returns the maximum number of slots the pool may hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns true if no slot is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Pool<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_get_free_round_trip() {
        let mut pool = Pool::new();
        let a = pool.alloc(1).expect("should succeed");
        let b = pool.alloc(2).expect("should succeed");
        assert_eq!(pool.get(a).ok(), Some(&1));
        assert_eq!(pool.get(b).ok(), Some(&2));
        assert_eq!(pool.len(), 2);

        assert_eq!(pool.free(a).ok(), Some(1));
        assert!(!pool.contains(a));
        assert!(pool.contains(b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn freed_slot_is_recycled() {
        let mut pool = Pool::new();
        let a = pool.alloc("a").expect("should succeed");
        pool.free(a).expect("the slot is live");

        // The stale-ID hazard in one assertion: the recycled slot revives
        // the old ID, now addressing an unrelated value.
        let b = pool.alloc("b").expect("should succeed");
        assert_eq!(a, b);
        assert_eq!(pool.get(a).ok(), Some(&"b"));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut pool = Pool::new();
        let a = pool.alloc(7).expect("should succeed");
        pool.free(a).expect("the slot is live");
        assert!(matches!(pool.free(a), Err(TreeError::BadId)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            Pool::<i32>::with_capacity(0),
            Err(TreeError::BadCapacity(0))
        ));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut pool = Pool::with_capacity(2).expect("nonzero capacity");
        let a = pool.alloc(1).expect("should succeed");
        pool.alloc(2).expect("should succeed");
        assert!(matches!(pool.alloc(3), Err(TreeError::PoolExhausted)));

        // Freeing makes room again.
        pool.free(a).expect("the slot is live");
        pool.alloc(3).expect("should succeed");
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Live count tracks allocs minus frees, whatever the order.
            #[test]
            fn len_matches_live_slots(ops in proptest::collection::vec(any::<bool>(), 1..64)) {
                let mut pool = Pool::new();
                let mut live = Vec::new();
                for alloc in ops {
                    if alloc || live.is_empty() {
                        live.push(pool.alloc(0u8).expect("unbounded pool"));
                    } else {
                        let id = live.pop().expect("nonempty");
                        pool.free(id).expect("the slot is live");
                    }
                    prop_assert_eq!(pool.len(), live.len());
                    prop_assert!(live.iter().all(|&id| pool.contains(id)));
                }
            }

            /// The pool never exceeds its capacity, and `alloc` fails exactly
            /// when it would.
            #[test]
            fn capacity_never_exceeded(cap in 1usize..16, extra in 0usize..16) {
                let mut pool = Pool::with_capacity(cap).expect("nonzero capacity");
                for i in 0..(cap + extra) {
                    let res = pool.alloc(i);
                    if i < cap {
                        prop_assert!(res.is_ok());
                    } else {
                        prop_assert!(matches!(res, Err(TreeError::PoolExhausted)));
                    }
                }
                prop_assert_eq!(pool.len(), cap);
            }
        }
    }
}

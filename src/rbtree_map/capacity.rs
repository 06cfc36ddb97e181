//! Capacity management for [`RBTreeMap`].

use crate::raw::RawRBTreeMap;
use crate::rbtree_map::RBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Creates a new, empty `RBTreeMap` with at least the specified
    /// capacity.
    ///
    /// The map will be able to hold at least `capacity` entries without
    /// reallocating its arenas.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_capacity(10);
    /// let capacity = map.capacity();
    /// assert!(capacity >= 10);
    ///
    /// for key in 0..10 {
    ///     map.insert(key, ());
    /// }
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawRBTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

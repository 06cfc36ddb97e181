//! Cursors: bidirectional positions over the entries of a map.
//!
//! A cursor points either at an entry or at the map's end sentinel, the
//! past-the-end position. The end position is not an error state: a cursor
//! parked there can still step backwards onto the largest entry. Reading
//! through the cursor or stepping past a boundary reports [`CursorError`]
//! instead of panicking.

use core::borrow::Borrow;
use core::fmt;

use crate::error::CursorError;
use crate::raw::Handle;
use crate::rbtree_map::RBTreeMap;

impl<K, V> RBTreeMap<K, V> {
    /// Returns a cursor at the first (smallest) entry of the map, or at the
    /// end position if the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let cursor = map.cursor_front();
    /// assert_eq!(cursor.key_value(), Ok((&1, &"a")));
    /// ```
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        Cursor {
            map: self,
            node: self.raw.first().unwrap_or_else(|| self.raw.end()),
        }
    }

    /// Returns a cursor at the end position of the map.
    ///
    /// The end position holds no entry, but stepping backwards from it lands
    /// on the last (largest) entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut cursor = map.cursor_end();
    /// assert!(cursor.is_end());
    /// cursor.move_prev().unwrap();
    /// assert_eq!(cursor.key_value(), Ok((&2, &"b")));
    /// ```
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V> {
        Cursor {
            map: self,
            node: self.raw.end(),
        }
    }

    /// Returns a mutable cursor at the first entry of the map, or at the end
    /// position if the map is empty.
    #[must_use]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.raw.first().unwrap_or_else(|| self.raw.end());
        CursorMut { map: self, node }
    }

    /// Returns a mutable cursor at the end position of the map.
    #[must_use]
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.raw.end();
        CursorMut { map: self, node }
    }
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns a cursor at the entry with the specified key, or at the end
    /// position if the key is not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.find(&2).key(), Ok(&2));
    /// assert!(map.find(&3).is_end());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor {
            map: self,
            node: self.raw.search(key).unwrap_or_else(|| self.raw.end()),
        }
    }

    /// Returns a mutable cursor at the entry with the specified key, or at
    /// the end position if the key is not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.find_mut(&1);
    /// *cursor.value_mut().unwrap() = "z";
    /// assert_eq!(map.get(&1), Some(&"z"));
    /// ```
    #[must_use]
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.search(key).unwrap_or_else(|| self.raw.end());
        CursorMut { map: self, node }
    }
}

/// A cursor over the entries of an [`RBTreeMap`] with read-only access.
///
/// Created by [`cursor_front`], [`cursor_end`], or [`find`].
///
/// [`cursor_front`]: RBTreeMap::cursor_front
/// [`cursor_end`]: RBTreeMap::cursor_end
/// [`find`]: RBTreeMap::find
pub struct Cursor<'a, K, V> {
    map: &'a RBTreeMap<K, V>,
    /// Current node; possibly the map's end sentinel.
    node: Handle,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            node: self.node,
        }
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    /// Cursors are equal only when they come from the same map and sit at
    /// the same position; cursors into different maps never compare equal,
    /// even at matching keys.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.map, other.map) && self.node == other.node
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key_value() {
            Ok(entry) => f.debug_tuple("Cursor").field(&entry).finish(),
            Err(_) => f.debug_tuple("Cursor").field(&"end").finish(),
        }
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Returns `true` if the cursor is at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node == self.map.raw.end()
    }

    /// Returns a reference to the key of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn key(&self) -> Result<&'a K, CursorError> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns a reference to the value of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn value(&self) -> Result<&'a V, CursorError> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns references to the key and value of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn key_value(&self) -> Result<(&'a K, &'a V), CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        Ok(self.map.raw.key_value(self.node))
    }

    /// Moves the cursor to the next entry in key order, or to the end
    /// position when it leaves the last entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is already at the end position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::{CursorError, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// let mut cursor = map.cursor_front();
    /// assert_eq!(cursor.move_next(), Ok(()));
    /// assert!(cursor.is_end());
    /// assert_eq!(cursor.move_next(), Err(CursorError::AtEnd));
    /// ```
    pub fn move_next(&mut self) -> Result<(), CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        self.node = self.map.raw.successor(self.node);
        Ok(())
    }

    /// Moves the cursor to the previous entry in key order. From the end
    /// position this lands on the last (largest) entry.
    ///
    /// # Errors
    /// - [`CursorError::AtFront`] - The cursor is at the first entry, or the
    ///   map is empty.
    pub fn move_prev(&mut self) -> Result<(), CursorError> {
        match self.map.raw.predecessor(self.node) {
            Some(node) => {
                self.node = node;
                Ok(())
            }
            None => Err(CursorError::AtFront),
        }
    }
}

/// A cursor over the entries of an [`RBTreeMap`] with mutable access.
///
/// Created by [`cursor_front_mut`], [`cursor_end_mut`], or [`find_mut`].
/// Holding one borrows the map exclusively, so a mutable cursor can never be
/// applied to a map other than the one it was created from.
///
/// [`cursor_front_mut`]: RBTreeMap::cursor_front_mut
/// [`cursor_end_mut`]: RBTreeMap::cursor_end_mut
/// [`find_mut`]: RBTreeMap::find_mut
pub struct CursorMut<'a, K, V> {
    map: &'a mut RBTreeMap<K, V>,
    /// Current node; possibly the map's end sentinel.
    node: Handle,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key_value() {
            Ok(entry) => f.debug_tuple("CursorMut").field(&entry).finish(),
            Err(_) => f.debug_tuple("CursorMut").field(&"end").finish(),
        }
    }
}

impl<K, V> CursorMut<'_, K, V> {
    /// Returns `true` if the cursor is at the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node == self.map.raw.end()
    }

    /// Returns a reference to the key of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn key(&self) -> Result<&K, CursorError> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns a reference to the value of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn value(&self) -> Result<&V, CursorError> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value of the current entry. The
    /// key stays read-only; rewriting it could break the search order.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn value_mut(&mut self) -> Result<&mut V, CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        let value_handle = self.map.raw.item(self.node).value();
        Ok(self.map.raw.value_mut(value_handle))
    }

    /// Returns references to the key and value of the current entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position.
    pub fn key_value(&self) -> Result<(&K, &V), CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        Ok(self.map.raw.key_value(self.node))
    }

    /// Moves the cursor to the next entry in key order, or to the end
    /// position when it leaves the last entry.
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is already at the end position.
    pub fn move_next(&mut self) -> Result<(), CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        self.node = self.map.raw.successor(self.node);
        Ok(())
    }

    /// Moves the cursor to the previous entry in key order. From the end
    /// position this lands on the last (largest) entry.
    ///
    /// # Errors
    /// - [`CursorError::AtFront`] - The cursor is at the first entry, or the
    ///   map is empty.
    pub fn move_prev(&mut self) -> Result<(), CursorError> {
        match self.map.raw.predecessor(self.node) {
            Some(node) => {
                self.node = node;
                Ok(())
            }
            None => Err(CursorError::AtFront),
        }
    }

    /// Removes the current entry from the map and returns it, advancing the
    /// cursor to the next entry in key order (or the end position).
    ///
    /// # Errors
    /// - [`CursorError::AtEnd`] - The cursor is at the end position; there
    ///   is no entry to remove.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut cursor = map.find_mut(&2);
    /// assert_eq!(cursor.remove_current(), Ok((2, "b")));
    /// assert_eq!(cursor.key(), Ok(&3));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove_current(&mut self) -> Result<(K, V), CursorError> {
        if self.is_end() {
            return Err(CursorError::AtEnd);
        }
        // The successor survives the removal even when the removed node has
        // two children, because removal relinks the successor node instead
        // of moving entries between nodes.
        let next = self.map.raw.successor(self.node);
        let removed = self.map.raw.remove_node(self.node);
        self.node = next;
        Ok(removed)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    use crate::error::CursorError;
    use crate::rbtree_map::RBTreeMap;

    #[test]
    fn cursor_walks_forward_to_end() {
        let map = RBTreeMap::from([(2, "b"), (1, "a"), (3, "c")]);
        let mut cursor = map.cursor_front();
        let mut seen = Vec::new();
        while let Ok((key, value)) = cursor.key_value() {
            seen.push((*key, *value));
            cursor.move_next().unwrap();
        }
        assert_eq!(seen, [(1, "a"), (2, "b"), (3, "c")]);
        assert!(cursor.is_end());
        assert_eq!(cursor.move_next(), Err(CursorError::AtEnd));
        assert_eq!(cursor.key(), Err(CursorError::AtEnd));
    }

    #[test]
    fn cursor_walks_backward_from_end() {
        let map = RBTreeMap::from([(2, "b"), (1, "a"), (3, "c")]);
        let mut cursor = map.cursor_end();
        let mut seen = Vec::new();
        while cursor.move_prev().is_ok() {
            seen.push(*cursor.key().unwrap());
        }
        assert_eq!(seen, [3, 2, 1]);
        assert_eq!(cursor.move_prev(), Err(CursorError::AtFront));
    }

    #[test]
    fn empty_map_cursor_is_stuck_at_both_boundaries() {
        let map: RBTreeMap<i32, i32> = RBTreeMap::new();
        let mut cursor = map.cursor_front();
        assert!(cursor.is_end());
        assert_eq!(cursor.move_next(), Err(CursorError::AtEnd));
        assert_eq!(cursor.move_prev(), Err(CursorError::AtFront));
    }

    #[test]
    fn remove_current_advances_past_a_two_child_node() {
        let mut map = RBTreeMap::from([(5, ()), (3, ()), (8, ()), (1, ()), (4, ()), (7, ()), (9, ())]);
        let mut cursor = map.find_mut(&5);
        assert_eq!(cursor.remove_current(), Ok((5, ())));
        // The cursor lands on 5's in-order successor.
        assert_eq!(cursor.key(), Ok(&7));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn remove_current_drains_the_whole_map() {
        let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
        let mut cursor = map.cursor_front_mut();
        let mut drained = Vec::new();
        while let Ok(entry) = cursor.remove_current() {
            drained.push(entry);
        }
        assert!(cursor.is_end());
        drop(cursor);
        assert_eq!(drained, [(1, "a"), (2, "b"), (3, "c")]);
        assert!(map.is_empty());
    }
}

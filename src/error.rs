use core::fmt;

use crate::rbtree_map::entry::OccupiedEntry;

/// The error returned by indexed access ([`at`]/[`at_mut`]) when the key is
/// not present in the map.
///
/// [`at`]: crate::RBTreeMap::at
/// [`at_mut`]: crate::RBTreeMap::at_mut
///
/// # Examples
///
/// ```rust
/// use sable_tree::{OutOfBounds, RBTreeMap};
///
/// let map: RBTreeMap<i32, &str> = RBTreeMap::new();
/// assert_eq!(map.at(&1), Err(OutOfBounds));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutOfBounds;

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key not found in map")
    }
}

impl core::error::Error for OutOfBounds {}

/// The error returned when a cursor is asked to step or read past the
/// boundary it is parked at.
///
/// # Examples
///
/// ```rust
/// use sable_tree::{CursorError, RBTreeMap};
///
/// let map = RBTreeMap::from([(1, "a")]);
/// let mut cursor = map.cursor_front();
/// assert_eq!(cursor.move_next(), Ok(()));
/// assert_eq!(cursor.move_next(), Err(CursorError::AtEnd));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorError {
    /// The cursor is at the end position; there is no entry to read and no
    /// next entry to step to.
    AtEnd,
    /// The cursor is at the first entry (or the map is empty); there is no
    /// previous entry to step to.
    AtFront,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtEnd => write!(f, "cursor is at the end of the map"),
            Self::AtFront => write!(f, "cursor is at the front of the map"),
        }
    }
}

impl core::error::Error for CursorError {}

/// The error returned by [`try_insert`] when the key already exists.
///
/// Contains the occupied entry and the value that was not inserted.
///
/// [`try_insert`]: crate::RBTreeMap::try_insert
pub struct OccupiedError<'a, K, V> {
    /// The entry in the map that was already occupied.
    pub entry: OccupiedEntry<'a, K, V>,
    /// The value which was not inserted, because the entry was already
    /// occupied.
    pub value: V,
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for OccupiedError<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedError")
            .field("key", self.entry.key())
            .field("old_value", self.entry.get())
            .field("new_value", &self.value)
            .finish()
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Display for OccupiedError<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to insert {:?}, key {:?} already holds {:?}",
            self.value,
            self.entry.key(),
            self.entry.get(),
        )
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> core::error::Error for OccupiedError<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_messages() {
        assert_eq!(format!("{OutOfBounds}"), "key not found in map");
        assert_eq!(format!("{}", CursorError::AtEnd), "cursor is at the end of the map");
        assert_eq!(format!("{}", CursorError::AtFront), "cursor is at the front of the map");
    }
}

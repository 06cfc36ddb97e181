//! An ordered map backed by an arena-allocated red-black tree.

mod capacity;
pub mod cursor;
pub mod entry;

use alloc::vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Index;

pub use cursor::{Cursor, CursorMut};
pub use entry::{Entry, OccupiedEntry, VacantEntry};

use crate::error::{OccupiedError, OutOfBounds};
use crate::raw::{Handle, RawRBTreeMap};

/// An ordered map based on a red-black tree.
///
/// Entries are kept sorted by key, with lookup, insertion, and removal all
/// running in O(log n). The tree stores its nodes in an arena rather than as
/// individually boxed allocations, and keeps a permanent end sentinel so that
/// the past-the-end position is an addressable node; a cursor parked there
/// can step backwards onto the largest entry.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key changes while it is in the map.
///
/// # Examples
///
/// ```rust
/// use sable_tree::RBTreeMap;
///
/// let mut movie_reviews = RBTreeMap::new();
///
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
///
/// assert_eq!(movie_reviews.get("Pulp Fiction"), Some(&"Masterpiece."));
/// assert!(!movie_reviews.contains_key("Up!"));
///
/// // Entries come back in key order.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: {review}");
/// }
///
/// // A cursor at the end position can step back onto the largest key.
/// let mut cursor = movie_reviews.cursor_end();
/// cursor.move_prev().unwrap();
/// assert_eq!(cursor.key(), Ok(&"The Godfather"));
/// ```
#[derive(Clone)]
pub struct RBTreeMap<K, V> {
    raw: RawRBTreeMap<K, V>,
}

impl<K, V> RBTreeMap<K, V> {
    /// Creates a new, empty `RBTreeMap`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: RawRBTreeMap::new(),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert!(map.is_empty());
    /// map.insert(1, "a");
    /// assert!(!map.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Removes and returns the first (smallest) entry in the map, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_first(), Some((1, "a")));
    /// assert_eq!(map.pop_first(), Some((2, "b")));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last (largest) entry in the map, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_last(), Some((2, "b")));
    /// assert_eq!(map.pop_last(), Some((1, "a")));
    /// assert_eq!(map.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Returns the first (smallest) key-value pair in the map, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.first_key_value(), Some((&1, &"a")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.first()?;
        Some(self.raw.key_value(handle))
    }

    /// Returns the last (largest) key-value pair in the map, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.last_key_value(), Some((&2, &"b")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.last()?;
        Some(self.raw.key_value(handle))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let first = map.iter().next();
    /// assert_eq!(first, Some((&1, &"a")));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("a", 1), ("b", 2)]);
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.get("b"), Some(&20));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let front = self.raw.first();
        let back = self.raw.last();
        let remaining = self.raw.len();
        IterMut {
            raw: &mut self.raw,
            front,
            back,
            remaining,
            marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let values: Vec<&str> = map.values().copied().collect();
    /// assert_eq!(values, ["a", "b"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("a", 1), ("b", 2)]);
    /// for value in map.values_mut() {
    ///     *value += 10;
    /// }
    /// assert_eq!(map.get("a"), Some(&11));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Creates a consuming iterator over the keys of the map, in sorted
    /// order. The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator over the values of the map, in key
    /// order. The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let values: Vec<&str> = map.into_values().collect();
    /// assert_eq!(values, ["a", "b"]);
    /// ```
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns the key-value pair corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains the specified key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Returns the number of entries with the specified key, which for a map
    /// of unique keys is either 0 or 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.count(&1), 1);
    /// assert_eq!(map.count(&2), 0);
    /// ```
    #[must_use]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        usize::from(self.raw.contains_key(key))
    }

    /// Returns a reference to the value corresponding to the key, or
    /// [`OutOfBounds`] if the key is not present.
    ///
    /// Unlike indexing this never panics on a missing key.
    ///
    /// # Errors
    /// - [`OutOfBounds`] - The key is not present in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::{OutOfBounds, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(OutOfBounds));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, OutOfBounds>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(OutOfBounds)
    }

    /// Returns a mutable reference to the value corresponding to the key, or
    /// [`OutOfBounds`] if the key is not present.
    ///
    /// This never inserts; see [`entry`] for insert-if-absent access.
    ///
    /// # Errors
    /// - [`OutOfBounds`] - The key is not present in the map.
    ///
    /// [`entry`]: RBTreeMap::entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::{OutOfBounds, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// *map.at_mut(&1).unwrap() = "b";
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// assert_eq!(map.at_mut(&2), Err(OutOfBounds));
    /// ```
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, OutOfBounds>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key).ok_or(OutOfBounds)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key present, the value is updated and the
    /// old value is returned; the key is not updated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Tries to insert a key-value pair into the map, and returns a mutable
    /// reference to the value in the entry.
    ///
    /// If the map already had this key present, nothing is updated, and an
    /// error containing the occupied entry and the value is returned.
    ///
    /// # Errors
    /// - [`OccupiedError`] - The key is already present; the map is left
    ///   untouched and the rejected value is handed back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.try_insert(37, "a").unwrap(), &"a");
    ///
    /// let err = map.try_insert(37, "b").unwrap_err();
    /// assert_eq!(err.entry.key(), &37);
    /// assert_eq!(err.value, "b");
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, OccupiedError<'_, K, V>> {
        match self.entry(key) {
            Entry::Occupied(entry) => Err(OccupiedError { entry, value }),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    /// Removes a key from the map, returning the value if the key was
    /// present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Removes a key from the map, returning the stored key-value pair if
    /// the key was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }
}

impl<K, V> Default for RBTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RBTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RBTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RBTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash> Hash for RBTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for entry in self.iter() {
            entry.hash(state);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RBTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RBTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RBTreeMap<K, V>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let map1 = RBTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RBTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(array: [(K, V); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<K, Q, V> Index<&Q> for RBTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    /// - If the key is not present in the map. For a non-panicking variant
    ///   use [`at`].
    ///
    /// [`at`]: RBTreeMap::at
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V> IntoIterator for &'a RBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RBTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RBTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter {
            inner: self.raw.drain_in_order().into_iter(),
        }
    }
}

/// An iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`].
///
/// [`iter`]: RBTreeMap::iter
pub struct Iter<'a, K, V> {
    raw: &'a RawRBTreeMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.expect("non-exhausted iterator has a front");
        self.remaining -= 1;
        self.front = if self.remaining == 0 {
            None
        } else {
            // More entries remain, so the successor is a real node.
            Some(self.raw.successor(handle))
        };
        Some(self.raw.key_value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.expect("non-exhausted iterator has a back");
        self.remaining -= 1;
        self.back = if self.remaining == 0 {
            None
        } else {
            self.raw.predecessor(handle)
        };
        Some(self.raw.key_value(handle))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`iter_mut`] method on [`RBTreeMap`].
///
/// [`iter_mut`]: RBTreeMap::iter_mut
pub struct IterMut<'a, K, V> {
    raw: *mut RawRBTreeMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    marker: PhantomData<&'a mut RawRBTreeMap<K, V>>,
}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.expect("non-exhausted iterator has a front");
        self.remaining -= 1;
        self.front = if self.remaining == 0 {
            None
        } else {
            // SAFETY: The map outlives `'a` and the walk reads only the
            // nodes arena, never the values arena that holds the handed-out
            // mutable borrows.
            unsafe { RawRBTreeMap::successor_ptr(self.raw.cast_const(), handle) }
        };
        // SAFETY: Every handle is yielded exactly once, so the mutable value
        // borrow below is unique; keys live in the nodes arena, disjoint
        // from the values arena.
        unsafe {
            let item = RawRBTreeMap::node_ptr(self.raw.cast_const(), handle).as_item();
            let value = RawRBTreeMap::value_mut_ptr(self.raw, item.value());
            Some((item.key(), value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.expect("non-exhausted iterator has a back");
        self.remaining -= 1;
        self.back = if self.remaining == 0 {
            None
        } else {
            // SAFETY: Nodes arena reads only; see `next`.
            unsafe { RawRBTreeMap::predecessor_ptr(self.raw.cast_const(), handle) }
        };
        // SAFETY: Same uniqueness argument as in `next`.
        unsafe {
            let item = RawRBTreeMap::node_ptr(self.raw.cast_const(), handle).as_item();
            let value = RawRBTreeMap::value_mut_ptr(self.raw, item.value());
            Some((item.key(), value))
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

// SAFETY: IterMut is a unique borrow of the map; the raw pointer is only a
// borrow-splitting device, so the usual &mut send/sync rules apply.
unsafe impl<K: Send, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

/// An iterator over the keys of an `RBTreeMap`, in sorted order.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of an `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of an `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`values_mut`] method on [`RBTreeMap`].
///
/// [`values_mut`]: RBTreeMap::values_mut
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut")
            .field("remaining", &self.inner.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// An owning iterator over the entries of an `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the `into_iter` method on [`RBTreeMap`].
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An owning iterator over the keys of an `RBTreeMap`, in sorted order.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
///
/// [`into_keys`]: RBTreeMap::into_keys
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.inner.as_slice().iter().map(|(key, _)| key))
            .finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

/// An owning iterator over the values of an `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
///
/// [`into_values`]: RBTreeMap::into_values
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.inner.as_slice().iter().map(|(_, value)| value))
            .finish()
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn iter_is_double_ended_and_exact_size() {
        let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
        let mut iter = map.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some((&1, &"a")));
        assert_eq!(iter.next_back(), Some((&4, &"d")));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some((&2, &"b")));
        assert_eq!(iter.next_back(), Some((&3, &"c")));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
        // Fused after exhaustion.
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut map = RBTreeMap::from([(1, 10), (2, 20), (3, 30)]);
        let mut iter = map.iter_mut();
        *iter.next().unwrap().1 += 1;
        *iter.next_back().unwrap().1 += 3;
        *iter.next().unwrap().1 += 2;
        assert_eq!(iter.next(), None);
        drop(iter);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            [(&1, &11), (&2, &22), (&3, &33)]
        );
    }

    #[test]
    fn into_iter_yields_sorted_owned_entries() {
        let map = RBTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
        let entries: Vec<(i32, &str)> = map.into_iter().collect();
        assert_eq!(entries, [(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn equality_and_ordering_follow_entries() {
        let a = RBTreeMap::from([(1, "a"), (2, "b")]);
        let b = RBTreeMap::from([(2, "b"), (1, "a")]);
        let c = RBTreeMap::from([(1, "a"), (3, "c")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn debug_formats_as_map() {
        let map = RBTreeMap::from([(2, "b"), (1, "a")]);
        assert_eq!(alloc::format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_panics_on_missing_key() {
        let map: RBTreeMap<i32, &str> = RBTreeMap::new();
        let _ = map[&1];
    }
}

//! The entry API: in-place manipulation of a single slot in the map.

use core::fmt;
use core::mem;

use crate::raw::{Handle, Locate, Side};
use crate::rbtree_map::RBTreeMap;

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// The returned entry remembers where the descent for the key ended, so
    /// a vacant insertion attaches without searching again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut letters = RBTreeMap::new();
    ///
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(letters.get(&'s'), Some(&2));
    /// assert_eq!(letters.get(&'t'), Some(&3));
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.raw.locate(&key) {
            Locate::Found(node) => Entry::Occupied(OccupiedEntry { node, map: self }),
            Locate::Vacant(spot) => Entry::Vacant(VacantEntry { key, spot, map: self }),
        }
    }
}

/// A view into a single entry in an [`RBTreeMap`], which is either vacant or
/// occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`RBTreeMap`].
///
/// [`entry`]: RBTreeMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

/// A view into a vacant entry in an [`RBTreeMap`]. It is part of the
/// [`Entry`] enum.
pub struct VacantEntry<'a, K, V> {
    /// The key that was searched for and not found.
    key: K,
    /// Where the descent for the key ended; a new node attaches here.
    spot: Option<(Handle, Side)>,
    map: &'a mut RBTreeMap<K, V>,
}

/// A view into an occupied entry in an [`RBTreeMap`]. It is part of the
/// [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V> {
    /// Handle of the node holding the entry.
    node: Handle,
    map: &'a mut RBTreeMap<K, V>,
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty,
    /// and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.entry("poneyland").or_insert(12);
    /// assert_eq!(map.get("poneyland"), Some(&12));
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the
    /// default function if empty, and returns a mutable reference to the
    /// value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.entry("poneyland").or_insert_with(|| "hoho".to_string());
    /// assert_eq!(map.get("poneyland"), Some(&"hoho".to_string()));
    /// ```
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting, if empty, the result of
    /// the default function. This method allows for generating key-derived
    /// values for insertion by providing the default function a reference to
    /// the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    /// assert_eq!(map.get("poneyland"), Some(&9));
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Returns a reference to this entry's key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// assert_eq!(map.entry("poneyland").key(), &"poneyland");
    /// ```
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Self::Occupied(entry) => entry.key(),
            Self::Vacant(entry) => entry.key(),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map.get("poneyland"), Some(&42));
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map.get("poneyland"), Some(&43));
    /// ```
    #[must_use]
    pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Self {
        match self {
            Self::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Self::Vacant(entry) => Self::Vacant(entry),
        }
    }

    /// Sets the value of the entry (replacing it if occupied), and returns
    /// an `OccupiedEntry` at the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, u32> = RBTreeMap::new();
    /// let entry = map.entry("poneyland").insert_entry(37);
    /// assert_eq!(entry.get(), &37);
    /// ```
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V> {
        match self {
            Self::Occupied(mut entry) => {
                entry.insert(value);
                entry
            }
            Self::Vacant(entry) => entry.insert_entry(value),
        }
    }
}

impl<'a, K: Ord, V: Default> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default value if
    /// empty, and returns a mutable reference to the value in the entry.
    ///
    /// This is the insert-if-absent counterpart of indexing: looking up a
    /// missing key through `entry(key).or_default()` materializes it with
    /// the default value instead of failing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// map.entry("poneyland").or_default();
    /// assert_eq!(map.get("poneyland"), Some(&0));
    /// ```
    pub fn or_default(self) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(V::default()),
        }
    }
}

impl<'a, K: Ord, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::rbtree_map::Entry;
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, usize> = RBTreeMap::new();
    /// if let Entry::Vacant(entry) = map.entry("poneyland") {
    ///     assert_eq!(entry.into_key(), "poneyland");
    /// }
    /// ```
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns
    /// a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::rbtree_map::Entry;
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<&str, u32> = RBTreeMap::new();
    /// if let Entry::Vacant(entry) = map.entry("poneyland") {
    ///     entry.insert(37);
    /// }
    /// assert_eq!(map.get("poneyland"), Some(&37));
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_entry(value).into_mut()
    }

    /// Sets the value of the entry with the `VacantEntry`'s key, and returns
    /// an `OccupiedEntry` at it.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V> {
        // The exclusive borrow held since `entry()` means the remembered
        // attachment spot is still where this key belongs.
        let map = self.map;
        let node = map.raw.attach(self.spot, self.key, value);
        OccupiedEntry { node, map }
    }
}

impl<'a, K: Ord, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    #[must_use]
    pub fn key(&self) -> &K {
        self.map.raw.item(self.node).key()
    }

    /// Gets a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::rbtree_map::Entry;
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("poneyland", 12)]);
    /// if let Entry::Occupied(entry) = map.entry("poneyland") {
    ///     assert_eq!(entry.get(), &12);
    /// }
    /// ```
    #[must_use]
    pub fn get(&self) -> &V {
        let value_handle = self.map.raw.item(self.node).value();
        self.map.raw.value(value_handle)
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the value that may outlive the destruction
    /// of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    pub fn get_mut(&mut self) -> &mut V {
        let value_handle = self.map.raw.item(self.node).value();
        self.map.raw.value_mut(value_handle)
    }

    /// Converts the entry into a mutable reference to its value, bound to
    /// the lifetime of the map itself.
    #[must_use]
    pub fn into_mut(self) -> &'a mut V {
        let value_handle = self.map.raw.item(self.node).value();
        self.map.raw.value_mut(value_handle)
    }

    /// Sets the value of the entry, and returns the entry's old value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::rbtree_map::Entry;
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("poneyland", 12)]);
    /// if let Entry::Occupied(mut entry) = map.entry("poneyland") {
    ///     assert_eq!(entry.insert(15), 12);
    /// }
    /// assert_eq!(map.get("poneyland"), Some(&15));
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value of the entry out of the map, and returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sable_tree::rbtree_map::Entry;
    /// use sable_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([("poneyland", 12)]);
    /// if let Entry::Occupied(entry) = map.entry("poneyland") {
    ///     assert_eq!(entry.remove(), 12);
    /// }
    /// assert!(!map.contains_key("poneyland"));
    /// ```
    #[must_use = "if you don't need the value, remove the entry through the map"]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Takes the key-value pair out of the map, and returns it.
    #[must_use = "if you don't need the pair, remove the entry through the map"]
    pub fn remove_entry(self) -> (K, V) {
        self.map.raw.remove_node(self.node)
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacant(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Self::Occupied(entry) => f.debug_tuple("Entry").field(entry).finish(),
        }
    }
}

impl<K: fmt::Debug + Ord, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vacant_insert_reuses_the_descent() {
        let mut map: RBTreeMap<i32, i32> = RBTreeMap::new();
        for key in [5, 3, 8] {
            map.insert(key, key);
        }
        match map.entry(4) {
            Entry::Occupied(_) => panic!("4 must be vacant"),
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &4);
                *entry.insert(40) += 2;
            }
        }
        assert_eq!(map.get(&4), Some(&42));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn occupied_entry_round_trip() {
        let mut map = RBTreeMap::from([("a", 1)]);
        match map.entry("a") {
            Entry::Vacant(_) => panic!("\"a\" must be occupied"),
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &"a");
                assert_eq!(entry.get(), &1);
                assert_eq!(entry.insert(2), 1);
                assert_eq!(entry.remove_entry(), ("a", 2));
            }
        }
        assert!(map.is_empty());
    }

    #[test]
    fn and_modify_only_touches_occupied() {
        let mut map: RBTreeMap<&str, i32> = RBTreeMap::new();
        map.entry("k").and_modify(|v| *v += 1).or_insert(10);
        map.entry("k").and_modify(|v| *v += 1).or_insert(10);
        assert_eq!(map.get("k"), Some(&11));
    }

    #[test]
    fn or_default_materializes_missing_keys() {
        let mut map: RBTreeMap<&str, i32> = RBTreeMap::new();
        *map.entry("hits").or_default() += 1;
        *map.entry("hits").or_default() += 1;
        assert_eq!(map.get("hits"), Some(&2));
    }
}

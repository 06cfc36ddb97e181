//! Integration tests for map cursors.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sable_tree::{CursorError, RBTreeMap};

#[test]
fn forward_walk_visits_every_entry_in_order() {
    let map = RBTreeMap::from([(5, "e"), (1, "a"), (3, "c"), (2, "b"), (4, "d")]);
    let mut cursor = map.cursor_front();
    let mut seen = Vec::new();
    while !cursor.is_end() {
        seen.push(*cursor.key().unwrap());
        cursor.move_next().unwrap();
    }
    assert_eq!(seen, [1, 2, 3, 4, 5]);
}

#[test]
fn backward_walk_starts_at_the_maximum() {
    let map = RBTreeMap::from([(5, "e"), (1, "a"), (3, "c")]);
    let mut cursor = map.cursor_end();
    assert_eq!(cursor.key(), Err(CursorError::AtEnd));

    cursor.move_prev().unwrap();
    assert_eq!(cursor.key_value(), Ok((&5, &"e")));
    cursor.move_prev().unwrap();
    assert_eq!(cursor.key_value(), Ok((&3, &"c")));
    cursor.move_prev().unwrap();
    assert_eq!(cursor.key_value(), Ok((&1, &"a")));
    assert_eq!(cursor.move_prev(), Err(CursorError::AtFront));
    // A failed step leaves the cursor where it was.
    assert_eq!(cursor.key(), Ok(&1));
}

#[test]
fn find_lands_on_the_key_or_the_end() {
    let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    assert_eq!(map.find(&2).key_value(), Ok((&2, &"b")));
    assert!(map.find(&9).is_end());

    // Stepping from a found position continues in key order.
    let mut cursor = map.find(&2);
    cursor.move_next().unwrap();
    assert_eq!(cursor.key(), Ok(&3));
    cursor.move_prev().unwrap();
    cursor.move_prev().unwrap();
    assert_eq!(cursor.key(), Ok(&1));
}

#[test]
fn mutable_cursor_edits_values_in_place() {
    let mut map = RBTreeMap::from([(1, 10), (2, 20)]);
    let mut cursor = map.cursor_front_mut();
    *cursor.value_mut().unwrap() += 1;
    cursor.move_next().unwrap();
    *cursor.value_mut().unwrap() += 2;
    assert_eq!(cursor.move_next(), Ok(()));
    assert_eq!(cursor.value_mut(), Err(CursorError::AtEnd));
    drop(cursor);
    assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 11), (2, 22)]);
}

#[test]
fn remove_current_at_end_is_an_error() {
    let mut map: RBTreeMap<i32, i32> = RBTreeMap::new();
    let mut cursor = map.cursor_end_mut();
    assert_eq!(cursor.remove_current(), Err(CursorError::AtEnd));
}

#[test]
fn cursors_compare_by_map_and_position() {
    let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    let copy = map.clone();

    assert_eq!(map.find(&1), map.cursor_front());
    assert_ne!(map.find(&1), map.find(&2));
    // Same key, different map: never equal.
    assert_ne!(map.find(&1), copy.find(&1));
    assert_ne!(map.cursor_end(), copy.cursor_end());
}

#[test]
fn empty_map_has_only_the_end_position() {
    let map: RBTreeMap<i32, i32> = RBTreeMap::new();
    let mut cursor = map.cursor_front();
    assert!(cursor.is_end());
    assert_eq!(cursor.value(), Err(CursorError::AtEnd));
    assert_eq!(cursor.move_next(), Err(CursorError::AtEnd));
    assert_eq!(cursor.move_prev(), Err(CursorError::AtFront));
}

proptest! {
    /// A cursor walk must agree with reference iteration in both directions,
    /// for arbitrary contents.
    #[test]
    fn walks_agree_with_model_iteration(entries in prop::collection::btree_map(-500i32..500, any::<i32>(), 0..128)) {
        let map: RBTreeMap<i32, i32> = entries.iter().map(|(&k, &v)| (k, v)).collect();

        let mut forward = Vec::new();
        let mut cursor = map.cursor_front();
        while let Ok((key, value)) = cursor.key_value() {
            forward.push((*key, *value));
            cursor.move_next().unwrap();
        }
        let expected: Vec<(i32, i32)> = entries.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&forward, &expected);

        let mut backward = Vec::new();
        let mut cursor = map.cursor_end();
        while cursor.move_prev().is_ok() {
            let (key, value) = cursor.key_value().unwrap();
            backward.push((*key, *value));
        }
        backward.reverse();
        prop_assert_eq!(&backward, &expected);
    }

    /// Removing through a cursor at random positions must match removing the
    /// same keys from the model, and the cursor must land on the successor.
    #[test]
    fn remove_current_matches_model(
        entries in prop::collection::btree_map(-100i32..100, any::<i32>(), 1..64),
        victim_index in any::<prop::sample::Index>(),
    ) {
        let mut map: RBTreeMap<i32, i32> = entries.iter().map(|(&k, &v)| (k, v)).collect();
        let mut model: BTreeMap<i32, i32> = entries;

        let victim = *model.keys().collect::<Vec<_>>()[victim_index.index(model.len())];
        let successor = model.range(victim + 1..).next().map(|(&k, _)| k);

        let mut cursor = map.find_mut(&victim);
        let expected = model.remove_entry(&victim);
        prop_assert_eq!(cursor.remove_current().ok(), expected);

        match successor {
            Some(key) => prop_assert_eq!(cursor.key(), Ok(&key)),
            None => prop_assert!(cursor.is_end()),
        }
        drop(cursor);

        let entries: Vec<(i32, i32)> = map.into_iter().collect();
        let expected: Vec<(i32, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }
}

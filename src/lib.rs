//! A red-black tree ordered map for Rust.
//!
//! This crate provides [`RBTreeMap`], an ordered map with the familiar
//! `BTreeMap`-style API, implemented as a classic red-black binary search
//! tree with a per-map end sentinel:
//!
//! - O(log n) insertion, lookup, and removal
//! - In-order, bidirectional iteration via [`iter`](RBTreeMap::iter) and friends
//! - [`Cursor`](rbtree_map::Cursor) / [`CursorMut`](rbtree_map::CursorMut) positions
//!   that can be stepped both ways, including backwards from the end position
//! - Checked access ([`at`](RBTreeMap::at)) and checked cursor stepping that report
//!   misuse as errors instead of corrupting the tree
//!
//! # Example
//!
//! ```
//! use sable_tree::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard ordered-map operations.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Iteration is in key order.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // Cursors walk the map both ways; stepping back from the end
//! // position lands on the last element.
//! let mut cursor = scores.cursor_end();
//! cursor.move_prev().unwrap();
//! assert_eq!(cursor.key(), Ok(&"Carol"));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Drop-in feel** - API mirrors `std::collections::BTreeMap` where they overlap
//! - **Arena-backed** - Nodes live in a slot arena addressed by compact handles,
//!   so parent links are plain indices and rotations never touch an allocator
//!
//! # Implementation
//!
//! The tree maintains the usual red-black invariants (red nodes never have red
//! children, uniform black height, black root), bounding its height at O(log n).
//! Each map owns a single sentinel node that represents the position past the
//! last element; cursors address it like any other node, which is what allows
//! decrementing from the end position back onto the maximum.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: We have to allow unsafe code in order to hand out disjoint key/value
// references from the mutable iterators.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod rbtree_map;

pub use error::{CursorError, OccupiedError, OutOfBounds};
pub use rbtree_map::RBTreeMap;

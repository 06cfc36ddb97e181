use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::{Arena, Handle};
use super::node::{Color, ItemNode, Node, Side};

/// The red-black tree engine backing `RBTreeMap`.
///
/// Nodes and values live in separate arenas: keys are read through node
/// handles, values through value handles, so mutable iterators can hand out
/// a `&K` and a `&mut V` without the borrows aliasing.
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena storing all tree nodes, including the end sentinel.
    nodes: Arena<Node<K>>,
    /// Arena storing all values.
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Handle to this map's end sentinel. The sentinel is black, carries no
    /// entry, and is never reachable from the root; it only exists so that
    /// the past-the-end position is an addressable node.
    end: Handle,
    /// Total number of key-value entries in the tree.
    len: usize,
}

/// Result of descending from the root looking for a key.
pub(crate) enum Locate {
    /// The key is present at this node.
    Found(Handle),
    /// The key is absent; a new node would attach under the given parent on
    /// the given side. `None` when the tree is empty.
    Vacant(Option<(Handle, Side)>),
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree with a fresh sentinel.
    pub(crate) fn new() -> Self {
        let mut nodes = Arena::new();
        let end = nodes.alloc(Node::End);
        Self {
            nodes,
            values: Arena::new(),
            root: None,
            end,
            len: 0,
        }
    }

    /// Creates a new tree with the specified capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        // One extra node slot for the sentinel.
        let mut nodes = Arena::with_capacity(capacity + 1);
        let end = nodes.alloc(Node::End);
        Self {
            nodes,
            values: Arena::with_capacity(capacity),
            root: None,
            end,
            len: 0,
        }
    }

    /// Returns the number of key-value entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no entries.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Handle of this map's end sentinel.
    pub(crate) const fn end(&self) -> Handle {
        self.end
    }

    /// Removes every entry, keeping a fresh sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        // The arena reset dropped the old sentinel with everything else.
        self.end = self.nodes.alloc(Node::End);
        self.root = None;
        self.len = 0;
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns the item node behind `handle`, panicking on the sentinel.
    pub(crate) fn item(&self, handle: Handle) -> &ItemNode<K> {
        self.nodes.get(handle).as_item()
    }

    fn item_mut(&mut self, handle: Handle) -> &mut ItemNode<K> {
        self.nodes.get_mut(handle).as_item_mut()
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: We only access the `nodes` field through addr_of, avoiding
        // aliasing with the `values` field.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    /// Returns a reference to a value by handle.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns a mutable reference to a value by handle.
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.values.get_mut(handle)
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at `handle`
    ///   and must not hold another reference into the values arena.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: We only access the `values` field, avoiding aliasing with
        // the `nodes` field.
        unsafe { (*core::ptr::addr_of_mut!((*ptr).values)).get_mut(handle) }
    }

    /// Color of an optional node; absent children count as black.
    fn color_of(&self, handle: Option<Handle>) -> Color {
        match handle {
            Some(h) => self.item(h).color(),
            None => Color::Black,
        }
    }

    /// Descends to the smallest node in the subtree rooted at `handle`.
    pub(crate) fn minimum(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(left) = self.item(current).left() {
            current = left;
        }
        current
    }

    /// Descends to the largest node in the subtree rooted at `handle`.
    pub(crate) fn maximum(&self, handle: Handle) -> Handle {
        let mut current = handle;
        while let Some(right) = self.item(current).right() {
            current = right;
        }
        current
    }

    /// Handle of the first (smallest) entry, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.minimum(root))
    }

    /// Handle of the last (largest) entry, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.maximum(root))
    }

    /// In-order successor of an item node; the sentinel when `handle` holds
    /// the maximum. Must not be called on the sentinel itself.
    pub(crate) fn successor(&self, handle: Handle) -> Handle {
        debug_assert!(handle != self.end, "successor of the end sentinel");
        if let Some(right) = self.item(handle).right() {
            return self.minimum(right);
        }
        let mut node = handle;
        while let Some(parent) = self.item(node).parent() {
            if self.item(parent).right() == Some(node) {
                node = parent;
            } else {
                return parent;
            }
        }
        self.end
    }

    /// In-order predecessor. Called on the sentinel this returns the maximum
    /// of the whole tree, which is what lets a cursor step back from the end
    /// position. `None` when there is no predecessor.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if handle == self.end {
            return self.last();
        }
        if let Some(left) = self.item(handle).left() {
            return Some(self.maximum(left));
        }
        let mut node = handle;
        while let Some(parent) = self.item(node).parent() {
            if self.item(parent).left() == Some(node) {
                node = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    /// In-order successor read through a raw pointer, touching only the
    /// nodes arena so outstanding value borrows stay undisturbed. `None`
    /// when `handle` holds the maximum.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawRBTreeMap<K, V>`.
    /// - `handle` must address an item node.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: All node reads below go through `node_ptr`, which projects
        // the `nodes` field without forming a reference to the whole map.
        unsafe {
            let item = Self::node_ptr(ptr, handle).as_item();
            if let Some(right) = item.right() {
                let mut current = right;
                while let Some(left) = Self::node_ptr(ptr, current).as_item().left() {
                    current = left;
                }
                return Some(current);
            }
            let mut node = handle;
            let mut parent = item.parent();
            while let Some(p) = parent {
                let p_item = Self::node_ptr(ptr, p).as_item();
                if p_item.right() == Some(node) {
                    node = p;
                    parent = p_item.parent();
                } else {
                    return Some(p);
                }
            }
            None
        }
    }

    /// In-order predecessor read through a raw pointer; mirror of
    /// [`successor_ptr`]. `None` when `handle` holds the minimum.
    ///
    /// # Safety
    /// Same contract as [`successor_ptr`].
    ///
    /// [`successor_ptr`]: RawRBTreeMap::successor_ptr
    pub(crate) unsafe fn predecessor_ptr(ptr: *const Self, handle: Handle) -> Option<Handle> {
        // SAFETY: Node reads only, through `node_ptr`.
        unsafe {
            let item = Self::node_ptr(ptr, handle).as_item();
            if let Some(left) = item.left() {
                let mut current = left;
                while let Some(right) = Self::node_ptr(ptr, current).as_item().right() {
                    current = right;
                }
                return Some(current);
            }
            let mut node = handle;
            let mut parent = item.parent();
            while let Some(p) = parent {
                let p_item = Self::node_ptr(ptr, p).as_item();
                if p_item.left() == Some(node) {
                    node = p;
                    parent = p_item.parent();
                } else {
                    return Some(p);
                }
            }
            None
        }
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Standard BST descent for `key`, remembering where an absent key would
    /// attach.
    pub(crate) fn locate<Q>(&self, key: &Q) -> Locate
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut spot = None;
        let mut current = self.root;

        while let Some(handle) = current {
            let item = self.item(handle);
            match key.cmp(item.key().borrow()) {
                Ordering::Equal => return Locate::Found(handle),
                Ordering::Less => {
                    spot = Some((handle, Side::Left));
                    current = item.left();
                }
                Ordering::Greater => {
                    spot = Some((handle, Side::Right));
                    current = item.right();
                }
            }
        }

        Locate::Vacant(spot)
    }

    /// Searches for a key, returning its node handle if present.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.locate(key) {
            Locate::Found(handle) => Some(handle),
            Locate::Vacant(_) => None,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.values.get(self.item(handle).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        let value_handle = self.item(handle).value();
        Some(self.values.get_mut(value_handle))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        let item = self.item(handle);
        Some((item.key(), self.values.get(item.value())))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

}

impl<K, V> RawRBTreeMap<K, V> {
    /// Key-value view of the node behind `handle`.
    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let item = self.item(handle);
        (item.key(), self.values.get(item.value()))
    }

    /// Attaches a new red node at a vacant spot reported by [`locate`] and
    /// repairs the red-black invariants.
    ///
    /// [`locate`]: RawRBTreeMap::locate
    pub(crate) fn attach(&mut self, spot: Option<(Handle, Side)>, key: K, value: V) -> Handle {
        let value_handle = self.values.alloc(value);
        let parent = spot.map(|(parent, _)| parent);
        let z = self.nodes.alloc(Node::new_item(key, value_handle, parent));

        match spot {
            None => self.root = Some(z),
            Some((parent, side)) => self.item_mut(parent).set_child(side, Some(z)),
        }

        self.len += 1;
        self.insert_fixup(z);
        z
    }

}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Inserts a key-value pair, replacing and returning the old value if the
    /// key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Locate::Found(handle) => {
                // Key exists, replace the value in place.
                let value_handle = self.item(handle).value();
                Some(core::mem::replace(self.values.get_mut(value_handle), value))
            }
            Locate::Vacant(spot) => {
                self.attach(spot, key, value);
                None
            }
        }
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }

}

impl<K, V> RawRBTreeMap<K, V> {
    /// Removes and returns the first key-value pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let handle = self.first()?;
        Some(self.remove_node(handle))
    }

    /// Removes and returns the last key-value pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let handle = self.last()?;
        Some(self.remove_node(handle))
    }

    /// Splices the node at `z` out of the tree and repairs the red-black
    /// invariants if a black node was removed.
    ///
    /// A node with two children is not moved by value: its in-order successor
    /// is relinked into its position, so handles to every surviving node
    /// (including that successor) stay valid.
    pub(crate) fn remove_node(&mut self, z: Handle) -> (K, V) {
        debug_assert!(z != self.end, "removal at the end sentinel");

        let z_left = self.item(z).left();
        let z_right = self.item(z).right();

        let removed_color;
        let x;
        let x_parent;

        if z_left.is_none() {
            removed_color = self.item(z).color();
            x = z_right;
            x_parent = self.item(z).parent();
            self.transplant(z, z_right);
        } else if z_right.is_none() {
            removed_color = self.item(z).color();
            x = z_left;
            x_parent = self.item(z).parent();
            self.transplant(z, z_left);
        } else {
            // Two children: splice out the in-order successor instead and
            // relink it into z's position, taking over z's color.
            let y = self.minimum(z_right.expect("two-child node has a right child"));
            removed_color = self.item(y).color();
            x = self.item(y).right();

            if self.item(y).parent() == Some(z) {
                x_parent = Some(y);
                if let Some(x) = x {
                    self.item_mut(x).set_parent(Some(y));
                }
            } else {
                x_parent = self.item(y).parent();
                self.transplant(y, x);
                self.item_mut(y).set_right(z_right);
                let right = z_right.expect("two-child node has a right child");
                self.item_mut(right).set_parent(Some(y));
            }

            self.transplant(z, Some(y));
            self.item_mut(y).set_left(z_left);
            let left = z_left.expect("two-child node has a left child");
            self.item_mut(left).set_parent(Some(y));

            let z_color = self.item(z).color();
            self.item_mut(y).set_color(z_color);
        }

        let item = self.nodes.take(z).into_item();
        let (key, value_handle) = item.into_key_value();
        let value = self.values.take(value_handle);
        self.len -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        (key, value)
    }

    /// Drains all entries in key order, leaving the tree empty.
    ///
    /// Walks with an explicit stack rather than recursion; red-black balance
    /// bounds the stack depth at O(log n).
    pub(crate) fn drain_in_order(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack: SmallVec<[Handle; 32]> = SmallVec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.item(handle).left();
            }
            let handle = stack.pop().expect("stack is non-empty here");
            current = self.item(handle).right();

            let item = self.nodes.take(handle).into_item();
            let (key, value_handle) = item.into_key_value();
            result.push((key, self.values.take(value_handle)));
        }

        self.clear();
        result
    }

    /// Left rotation around `x`: promotes x's right child, transferring that
    /// child's left subtree to x. Structure only; colors are untouched.
    fn rotate_left(&mut self, x: Handle) {
        let y = self.item(x).right().expect("rotate_left requires a right child");

        let y_left = self.item(y).left();
        self.item_mut(x).set_right(y_left);
        if let Some(y_left) = y_left {
            self.item_mut(y_left).set_parent(Some(x));
        }

        let x_parent = self.item(x).parent();
        self.item_mut(y).set_parent(x_parent);
        match x_parent {
            None => self.root = Some(y),
            Some(parent) => {
                if self.item(parent).left() == Some(x) {
                    self.item_mut(parent).set_left(Some(y));
                } else {
                    self.item_mut(parent).set_right(Some(y));
                }
            }
        }

        self.item_mut(y).set_left(Some(x));
        self.item_mut(x).set_parent(Some(y));
    }

    /// Right rotation around `y`; mirror of [`rotate_left`].
    ///
    /// [`rotate_left`]: RawRBTreeMap::rotate_left
    fn rotate_right(&mut self, y: Handle) {
        let x = self.item(y).left().expect("rotate_right requires a left child");

        let x_right = self.item(x).right();
        self.item_mut(y).set_left(x_right);
        if let Some(x_right) = x_right {
            self.item_mut(x_right).set_parent(Some(y));
        }

        let y_parent = self.item(y).parent();
        self.item_mut(x).set_parent(y_parent);
        match y_parent {
            None => self.root = Some(x),
            Some(parent) => {
                if self.item(parent).left() == Some(y) {
                    self.item_mut(parent).set_left(Some(x));
                } else {
                    self.item_mut(parent).set_right(Some(x));
                }
            }
        }

        self.item_mut(x).set_right(Some(y));
        self.item_mut(y).set_parent(Some(x));
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v` in
    /// u's parent (or at the root).
    fn transplant(&mut self, u: Handle, v: Option<Handle>) {
        let u_parent = self.item(u).parent();
        match u_parent {
            None => self.root = v,
            Some(parent) => {
                if self.item(parent).left() == Some(u) {
                    self.item_mut(parent).set_left(v);
                } else {
                    self.item_mut(parent).set_right(v);
                }
            }
        }
        if let Some(v) = v {
            self.item_mut(v).set_parent(u_parent);
        }
    }

    /// Restores the red-black invariants after inserting the red node `z`.
    fn insert_fixup(&mut self, mut z: Handle) {
        loop {
            let Some(parent) = self.item(z).parent() else { break };
            if self.item(parent).color() != Color::Red {
                break;
            }
            // A red node is never the root, so the grandparent exists.
            let grandparent = self.item(parent).parent().expect("red parent has a parent");

            if self.item(grandparent).left() == Some(parent) {
                let uncle = self.item(grandparent).right();
                if self.color_of(uncle) == Color::Red {
                    // Red uncle: recolor and push the violation upward.
                    let uncle = uncle.expect("red uncle exists");
                    self.item_mut(parent).set_color(Color::Black);
                    self.item_mut(uncle).set_color(Color::Black);
                    self.item_mut(grandparent).set_color(Color::Red);
                    z = grandparent;
                } else {
                    if self.item(parent).right() == Some(z) {
                        // Inner child: re-align first.
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.item(z).parent().expect("re-aligned node keeps a parent");
                    let grandparent = self.item(parent).parent().expect("red parent has a parent");
                    self.item_mut(parent).set_color(Color::Black);
                    self.item_mut(grandparent).set_color(Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.item(grandparent).left();
                if self.color_of(uncle) == Color::Red {
                    let uncle = uncle.expect("red uncle exists");
                    self.item_mut(parent).set_color(Color::Black);
                    self.item_mut(uncle).set_color(Color::Black);
                    self.item_mut(grandparent).set_color(Color::Red);
                    z = grandparent;
                } else {
                    if self.item(parent).left() == Some(z) {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.item(z).parent().expect("re-aligned node keeps a parent");
                    let grandparent = self.item(parent).parent().expect("red parent has a parent");
                    self.item_mut(parent).set_color(Color::Black);
                    self.item_mut(grandparent).set_color(Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root.expect("fixup runs on a non-empty tree");
        self.item_mut(root).set_color(Color::Black);
    }

    /// Restores the red-black invariants after splicing out a black node.
    ///
    /// `x` is the node that structurally replaced the removed one (possibly
    /// absent), and `x_parent` the parent the removal left behind; it has to
    /// be carried separately precisely because `x` may be absent.
    fn delete_fixup(&mut self, mut x: Option<Handle>, mut x_parent: Option<Handle>) {
        while x != self.root && self.color_of(x) == Color::Black {
            let Some(parent) = x_parent else { break };

            if self.item(parent).left() == x {
                let Some(mut w) = self.item(parent).right() else { break };
                if self.item(w).color() == Color::Red {
                    // Red sibling: rotate it above the parent, exposing a
                    // black sibling.
                    self.item_mut(w).set_color(Color::Black);
                    self.item_mut(parent).set_color(Color::Red);
                    self.rotate_left(parent);
                    w = match self.item(parent).right() {
                        Some(w) => w,
                        None => break,
                    };
                }

                let w_left = self.item(w).left();
                let w_right = self.item(w).right();
                if self.color_of(w_left) == Color::Black && self.color_of(w_right) == Color::Black {
                    // Both nephews black: recolor and move the deficit up.
                    self.item_mut(w).set_color(Color::Red);
                    x = Some(parent);
                    x_parent = self.item(parent).parent();
                } else {
                    let mut w = w;
                    if self.color_of(w_right) == Color::Black {
                        // Near nephew red, far nephew black: re-align.
                        if let Some(w_left) = w_left {
                            self.item_mut(w_left).set_color(Color::Black);
                        }
                        self.item_mut(w).set_color(Color::Red);
                        self.rotate_right(w);
                        w = match self.item(parent).right() {
                            Some(w) => w,
                            None => break,
                        };
                    }
                    let parent_color = self.item(parent).color();
                    self.item_mut(w).set_color(parent_color);
                    self.item_mut(parent).set_color(Color::Black);
                    if let Some(w_right) = self.item(w).right() {
                        self.item_mut(w_right).set_color(Color::Black);
                    }
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let Some(mut w) = self.item(parent).left() else { break };
                if self.item(w).color() == Color::Red {
                    self.item_mut(w).set_color(Color::Black);
                    self.item_mut(parent).set_color(Color::Red);
                    self.rotate_right(parent);
                    w = match self.item(parent).left() {
                        Some(w) => w,
                        None => break,
                    };
                }

                let w_left = self.item(w).left();
                let w_right = self.item(w).right();
                if self.color_of(w_left) == Color::Black && self.color_of(w_right) == Color::Black {
                    self.item_mut(w).set_color(Color::Red);
                    x = Some(parent);
                    x_parent = self.item(parent).parent();
                } else {
                    let mut w = w;
                    if self.color_of(w_left) == Color::Black {
                        if let Some(w_right) = w_right {
                            self.item_mut(w_right).set_color(Color::Black);
                        }
                        self.item_mut(w).set_color(Color::Red);
                        self.rotate_left(w);
                        w = match self.item(parent).left() {
                            Some(w) => w,
                            None => break,
                        };
                    }
                    let parent_color = self.item(parent).color();
                    self.item_mut(w).set_color(parent_color);
                    self.item_mut(parent).set_color(Color::Black);
                    if let Some(w_left) = self.item(w).left() {
                        self.item_mut(w_left).set_color(Color::Black);
                    }
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }

        if let Some(x) = x {
            self.item_mut(x).set_color(Color::Black);
        }
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTreeMap<K, V> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so an element-wise clone of both arenas
        // reproduces the exact shape, colors, and links, sentinel included.
        Self {
            nodes: self.nodes.clone(),
            values: self.values.clone(),
            root: self.root,
            end: self.end,
            len: self.len,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord, V> RawRBTreeMap<K, V> {
        /// Validates every red-black invariant plus parent-link and length
        /// consistency. Panics with a descriptive message on violation.
        /// Intended for tests to catch tree corruption.
        pub(crate) fn validate_invariants(&self) {
            match self.root {
                None => assert_eq!(self.len, 0, "empty tree must have len 0"),
                Some(root) => {
                    assert_eq!(self.item(root).color(), Color::Black, "root must be black");
                    assert_eq!(self.item(root).parent(), None, "root must have no parent");
                }
            }
            assert!(self.node(self.end).is_end(), "sentinel handle must address the sentinel");

            self.validate_subtree(self.root, None);

            // In-order walk: strictly increasing keys, exactly len entries,
            // and predecessor inverts successor at every step.
            let mut count = 0;
            let mut previous: Option<Handle> = None;
            let mut current = self.first();
            while let Some(handle) = current {
                if let Some(previous) = previous {
                    assert!(
                        self.item(previous).key() < self.item(handle).key(),
                        "in-order keys must be strictly increasing"
                    );
                    assert_eq!(self.predecessor(handle), Some(previous), "predecessor must invert successor");
                }
                count += 1;
                previous = Some(handle);
                let next = self.successor(handle);
                current = if next == self.end { None } else { Some(next) };
            }
            assert_eq!(count, self.len, "in-order walk must visit len entries");
            assert_eq!(self.predecessor(self.end), self.last(), "predecessor of end must be the maximum");
        }

        /// Returns the black-height of the subtree; asserts local invariants.
        fn validate_subtree(&self, handle: Option<Handle>, parent: Option<Handle>) -> usize {
            let Some(handle) = handle else {
                // Null leaves count as black.
                return 1;
            };
            let item = self.item(handle);
            assert_eq!(item.parent(), parent, "parent link mismatch");
            if item.color() == Color::Red {
                assert_eq!(self.color_of(item.left()), Color::Black, "red node with red left child");
                assert_eq!(self.color_of(item.right()), Color::Black, "red node with red right child");
            }
            let left_height = self.validate_subtree(item.left(), Some(handle));
            let right_height = self.validate_subtree(item.right(), Some(handle));
            assert_eq!(left_height, right_height, "black-height mismatch");
            left_height + usize::from(item.color() == Color::Black)
        }

        fn keys_in_order(&self) -> Vec<K>
        where
            K: Clone,
        {
            let mut keys = Vec::with_capacity(self.len);
            let mut current = self.first();
            while let Some(handle) = current {
                keys.push(self.item(handle).key().clone());
                let next = self.successor(handle);
                current = if next == self.end { None } else { Some(next) };
            }
            keys
        }
    }

    #[test]
    fn empty_tree() {
        let tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.predecessor(tree.end()), None);
        tree.validate_invariants();
    }

    #[test]
    fn insert_and_walk_in_order() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            assert_eq!(tree.insert(key, key * 10), None);
            tree.validate_invariants();
        }
        assert_eq!(tree.keys_in_order(), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(tree.get(&4), Some(&40));
        assert_eq!(tree.get(&6), None);
    }

    #[test]
    fn insert_replaces_value_in_place() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        assert_eq!(tree.insert(1, 10), None);
        assert_eq!(tree.insert(1, 20), Some(10));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&1), Some(&20));
        tree.validate_invariants();
    }

    #[test]
    fn remove_two_child_node_relinks_successor() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(key, key);
        }
        // 5 sits at an internal position with two children; its successor 7
        // must survive the removal under its original handle.
        let five = tree.search(&5).unwrap();
        let seven = tree.search(&7).unwrap();
        assert_eq!(tree.successor(five), seven);

        assert_eq!(tree.remove_node(five), (5, 5));
        tree.validate_invariants();
        assert_eq!(tree.keys_in_order(), [1, 3, 4, 7, 8, 9]);
        assert_eq!(tree.item(seven).key(), &7);
    }

    #[test]
    fn predecessor_of_end_is_maximum() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in [2, 1, 3] {
            tree.insert(key, key);
        }
        let max = tree.predecessor(tree.end()).unwrap();
        assert_eq!(tree.item(max).key(), &3);
    }

    #[test]
    fn pop_first_and_last() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in [2, 1, 3] {
            tree.insert(key, key);
        }
        assert_eq!(tree.pop_first(), Some((1, 1)));
        assert_eq!(tree.pop_last(), Some((3, 3)));
        assert_eq!(tree.pop_first(), Some((2, 2)));
        assert_eq!(tree.pop_first(), None);
        tree.validate_invariants();
    }

    #[test]
    fn drain_yields_sorted_entries_and_empties() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key, key);
        }
        let drained = tree.drain_in_order();
        assert_eq!(drained, [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7)]);
        assert!(tree.is_empty());
        tree.validate_invariants();
        // The tree stays usable after a drain.
        tree.insert(1, 1);
        tree.validate_invariants();
    }

    #[test]
    fn clone_preserves_shape_and_independence() {
        let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        for key in 0..64 {
            tree.insert(key, key);
        }
        let mut copy = tree.clone();
        copy.validate_invariants();
        assert_eq!(copy.keys_in_order(), tree.keys_in_order());

        copy.remove(&10);
        copy.insert(100, 100);
        assert_eq!(tree.get(&10), Some(&10));
        assert_eq!(tree.get(&100), None);
        tree.validate_invariants();
        copy.validate_invariants();
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(i16, i32),
        Remove(i16),
        PopFirst,
        PopLast,
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            10 => (-200i16..200, any::<i32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
            6 => (-200i16..200).prop_map(Operation::Remove),
            1 => Just(Operation::PopFirst),
            1 => Just(Operation::PopLast),
            1 => Just(Operation::Clear),
        ]
    }

    proptest! {
        /// Replays random operation sequences and revalidates every
        /// red-black invariant after each step, with a sorted-vec model for
        /// the expected contents.
        #[test]
        fn operations_preserve_invariants(operations in prop::collection::vec(strategy(), 0..512)) {
            let mut tree: RawRBTreeMap<i16, i32> = RawRBTreeMap::new();
            let mut model: Vec<(i16, i32)> = Vec::new();

            for operation in operations {
                match operation {
                    Operation::Insert(key, value) => {
                        let expected = match model.binary_search_by_key(&key, |&(k, _)| k) {
                            Ok(index) => Some(core::mem::replace(&mut model[index].1, value)),
                            Err(index) => {
                                model.insert(index, (key, value));
                                None
                            }
                        };
                        prop_assert_eq!(tree.insert(key, value), expected);
                    }
                    Operation::Remove(key) => {
                        let expected = match model.binary_search_by_key(&key, |&(k, _)| k) {
                            Ok(index) => Some(model.remove(index)),
                            Err(_) => None,
                        };
                        prop_assert_eq!(tree.remove_entry(&key), expected);
                    }
                    Operation::PopFirst => {
                        let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                        prop_assert_eq!(tree.pop_first(), expected);
                    }
                    Operation::PopLast => {
                        let expected = model.pop();
                        prop_assert_eq!(tree.pop_last(), expected);
                    }
                    Operation::Clear => {
                        tree.clear();
                        model.clear();
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
                let keys: Vec<i16> = model.iter().map(|&(k, _)| k).collect();
                prop_assert_eq!(tree.keys_in_order(), keys);
            }
        }
    }
}

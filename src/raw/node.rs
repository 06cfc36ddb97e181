use super::arena::Handle;

/// Node color for the red-black discipline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which side of a parent a child hangs on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// A tree node.
///
/// `End` is the sentinel: exactly one per map, allocated at construction,
/// treated as black, holding no entry, and never linked into the
/// root-reachable structure. Cursors address it to represent the position
/// past the last element, which is what makes that position decrementable.
#[derive(Clone)]
pub(crate) enum Node<K> {
    End,
    Item(ItemNode<K>),
}

/// A data-carrying node: one key, a handle to its value in the value arena,
/// a color, and non-owning links. The arena owns the node; `parent` is a
/// back-reference used only for traversal and rebalancing.
#[derive(Clone)]
pub(crate) struct ItemNode<K> {
    key: K,
    value: Handle,
    color: Color,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a new red item node with no children, ready for insert fixup.
    pub(crate) fn new_item(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Node::Item(ItemNode {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        })
    }

    /// Returns true if this is the end sentinel.
    pub(crate) fn is_end(&self) -> bool {
        matches!(self, Node::End)
    }

    /// Returns the item node, panicking if this is the sentinel.
    pub(crate) fn as_item(&self) -> &ItemNode<K> {
        match self {
            Node::Item(item) => item,
            Node::End => panic!("expected item node, found end sentinel"),
        }
    }

    /// Returns the item node mutably, panicking if this is the sentinel.
    pub(crate) fn as_item_mut(&mut self) -> &mut ItemNode<K> {
        match self {
            Node::Item(item) => item,
            Node::End => panic!("expected item node, found end sentinel"),
        }
    }

    /// Consumes the node, returning its item, panicking if this is the sentinel.
    pub(crate) fn into_item(self) -> ItemNode<K> {
        match self {
            Node::Item(item) => item,
            Node::End => panic!("expected item node, found end sentinel"),
        }
    }
}

impl<K> ItemNode<K> {
    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    /// Handle of this node's value in the value arena.
    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    pub(crate) fn into_key_value(self) -> (K, Handle) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Returns the child on the given side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Sets the child on the given side.
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

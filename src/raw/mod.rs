mod arena;
mod node;
mod raw_rbtree_map;

pub(crate) use arena::Handle;
pub(crate) use node::Side;
pub(crate) use raw_rbtree_map::{Locate, RawRBTreeMap};

use std::fmt;

/// Index of a node in the tree's arena.
pub(crate) type NodeId = usize;

/// The shared sentinel. It stands in for every absent child and for the root's parent; it is
/// always black and is never stored in the arena.
pub(crate) const NIL: NodeId = usize::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

#[derive(Clone)]
pub(crate) struct RbNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<K, V> RbNode<K, V> {
    /// A fresh red leaf hanging below `parent`.
    pub(crate) fn leaf(key: K, value: V, parent: NodeId) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: NIL,
            right: NIL,
        }
    }
}

pub(crate) type Link<K, V> = Option<Box<AvlNode<K, V>>>;

/// A node of an [`AvlTree`](super::AvlTree). Children are owned; there are no parent links.
#[derive(Clone)]
pub struct AvlNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // 1 for a leaf; an absent child has height 0.
    pub(crate) height: i32,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> AvlNode<K, V> {
    #[inline]
    pub(crate) fn boxed(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(right) - height(left)`.
    #[inline]
    pub(crate) fn balance(&self) -> i32 {
        height(&self.right) - height(&self.left)
    }
}

#[inline]
pub(crate) fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

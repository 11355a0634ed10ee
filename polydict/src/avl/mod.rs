//! Height-balanced binary search tree.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use crate::dynamic::DictionaryType;
use crate::error::DictError;
use crate::iter::{InOrderIter, TreeCursor, draw_sideways};
use crate::stats::{Counter, DictStats, DictStatsTrait};
use crate::Dictionary;

pub use node::AvlNode;
use node::{Link, height};

mod node;

/// An AVL tree: a binary search tree in which the heights of the two subtrees of any node
/// differ by at most one.
///
/// Every mutation walks back up from the point of change, recomputing cached heights and
/// rotating where a node's balance factor reaches ±2:
///
/// - after an insertion, single vs. double rotation is chosen by comparing the heights of
///   the heavy child's two subtrees
/// - after a removal, it is chosen by the sign of the heavy child's own balance factor
///
/// The tree counts key comparisons and rotations; see [`AvlTree::comparisons`] and
/// [`AvlTree::rotations`].
///
/// ```rust
/// use polydict::{AvlTree, Dictionary};
///
/// let mut tree = AvlTree::new();
/// for k in [30, 20, 10] {
///     tree.insert(k, k * 100).unwrap();
/// }
/// assert_eq!(tree.rotations(), 1);
/// assert_eq!(tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![10, 20, 30]);
/// ```
#[derive(Clone)]
pub struct AvlTree<K, V> {
    root: Link<K, V>,
    len: usize,
    comparisons: Counter,
    rotations: Counter,
}

pub type Iter<'a, K, V> = InOrderIter<'a, AvlCursor<'a, K, V>>;

/// [`TreeCursor`] over borrowed AVL nodes.
pub struct AvlCursor<'a, K, V>(PhantomData<&'a (K, V)>);

impl<K, V> Clone for AvlCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for AvlCursor<'_, K, V> {}

impl<'a, K, V> TreeCursor<'a> for AvlCursor<'a, K, V> {
    type Handle = &'a AvlNode<K, V>;
    type Key = K;
    type Value = V;

    fn left(&self, node: Self::Handle) -> Option<Self::Handle> {
        node.left.as_deref()
    }

    fn right(&self, node: Self::Handle) -> Option<Self::Handle> {
        node.right.as_deref()
    }

    fn entry(&self, node: Self::Handle) -> (&'a K, &'a V) {
        (&node.key, &node.value)
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            comparisons: Counter::new(),
            rotations: Counter::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&AvlNode<K, V>> {
        self.root.as_deref()
    }

    /// Key comparisons performed since construction (or the last [`reset_counters`]).
    ///
    /// [`reset_counters`]: AvlTree::reset_counters
    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    /// Single rotations performed; a double rotation counts as two.
    pub fn rotations(&self) -> u64 {
        self.rotations.get()
    }

    pub fn reset_counters(&self) {
        self.comparisons.reset();
        self.rotations.reset();
    }

    /// Exchanges contents and counters with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// In-order iteration, ascending by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        InOrderIter::new(AvlCursor(PhantomData), self.root.as_deref(), self.len)
    }

    /// Renders the tree sideways, right subtree on top, for diagnostics.
    pub fn pretty_print(&self) -> String
    where
        K: Debug,
        V: Debug,
    {
        draw_sideways(AvlCursor(PhantomData), self.root.as_deref(), |n| {
            format!("[{:?}, {:?}]", n.key, n.value)
        })
    }

    fn rotate_right(&self, mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        let Some(mut pivot) = node.left.take() else {
            return node;
        };
        self.rotations.incr();
        node.left = pivot.right.take();
        node.update_height();
        pivot.right = Some(node);
        pivot.update_height();
        pivot
    }

    fn rotate_left(&self, mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        let Some(mut pivot) = node.right.take() else {
            return node;
        };
        self.rotations.incr();
        node.right = pivot.left.take();
        node.update_height();
        pivot.left = Some(node);
        pivot.update_height();
        pivot
    }

    /// Rebalances a node on the way back up from an insertion.
    fn fixup_insertion(&self, mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        node.update_height();
        match node.balance() {
            -2 => {
                let (outer, inner) = node
                    .left
                    .as_ref()
                    .map_or((0, 0), |l| (height(&l.left), height(&l.right)));
                match outer.cmp(&inner) {
                    Ordering::Greater => self.rotate_right(node),
                    Ordering::Less => {
                        node.left = node.left.take().map(|l| self.rotate_left(l));
                        self.rotate_right(node)
                    }
                    Ordering::Equal => node,
                }
            }
            2 => {
                let (outer, inner) = node
                    .right
                    .as_ref()
                    .map_or((0, 0), |r| (height(&r.right), height(&r.left)));
                match outer.cmp(&inner) {
                    Ordering::Greater => self.rotate_left(node),
                    Ordering::Less => {
                        node.right = node.right.take().map(|r| self.rotate_right(r));
                        self.rotate_left(node)
                    }
                    Ordering::Equal => node,
                }
            }
            _ => node,
        }
    }

    /// Rebalances a node on the way back up from a removal. The heavy child's own balance
    /// decides between single and double rotation; a balanced child takes the single one.
    fn fixup_deletion(&self, mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
        match node.balance() {
            2 => {
                if node.right.as_ref().map_or(0, |r| r.balance()) < 0 {
                    node.right = node.right.take().map(|r| self.rotate_right(r));
                }
                self.rotate_left(node)
            }
            -2 => {
                if node.left.as_ref().map_or(0, |l| l.balance()) > 0 {
                    node.left = node.left.take().map(|l| self.rotate_left(l));
                }
                self.rotate_right(node)
            }
            _ => {
                node.update_height();
                node
            }
        }
    }

    /// Detaches the leftmost node of `node`'s subtree, rebalancing the path to it.
    fn take_min(&self, mut node: Box<AvlNode<K, V>>) -> (Link<K, V>, Box<AvlNode<K, V>>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (rest, node)
            }
            Some(left) => {
                let (rest, min) = self.take_min(left);
                node.left = rest;
                (Some(self.fixup_deletion(node)), min)
            }
        }
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Self::new();
        tree.extend(entries);
        tree
    }

    fn insert_entry(&mut self, key: K, value: V) -> bool {
        let mut inserted = false;
        let root = self.root.take();
        self.root = Some(self.insert_recurse(root, key, value, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn insert_recurse(
        &self,
        link: Link<K, V>,
        key: K,
        value: V,
        inserted: &mut bool,
    ) -> Box<AvlNode<K, V>> {
        let Some(mut node) = link else {
            *inserted = true;
            return AvlNode::boxed(key, value);
        };

        match self.comparisons.compare(&key, &node.key) {
            Ordering::Equal => return node,
            Ordering::Less => {
                node.left = Some(self.insert_recurse(node.left.take(), key, value, inserted))
            }
            Ordering::Greater => {
                node.right = Some(self.insert_recurse(node.right.take(), key, value, inserted))
            }
        }

        self.fixup_insertion(node)
    }

    fn remove_entry(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        let root = self.root.take();
        self.root = self.remove_recurse(root, key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn remove_recurse(&self, link: Link<K, V>, key: &K, removed: &mut Option<V>) -> Link<K, V> {
        let mut node = link?;

        match self.comparisons.compare(key, &node.key) {
            Ordering::Less => node.left = self.remove_recurse(node.left.take(), key, removed),
            Ordering::Greater => node.right = self.remove_recurse(node.right.take(), key, removed),
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, child) | (child, None) => {
                    let AvlNode { value, .. } = *node;
                    *removed = Some(value);
                    return child;
                }
                (Some(left), Some(right)) => {
                    let (rest, successor) = self.take_min(right);
                    let AvlNode {
                        key: successor_key,
                        value: successor_value,
                        ..
                    } = *successor;
                    node.left = Some(left);
                    node.right = rest;
                    node.key = successor_key;
                    *removed = Some(std::mem::replace(&mut node.value, successor_value));
                }
            },
        }

        Some(self.fixup_deletion(node))
    }

    fn find(&self, key: &K) -> Option<&AvlNode<K, V>> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match self.comparisons.compare(key, &node.key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    fn find_value_mut(&mut self, key: &K, counted: bool) -> Option<&mut V> {
        let comparisons = &self.comparisons;
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            let ord = if counted {
                comparisons.compare(key, &node.key)
            } else {
                key.cmp(&node.key)
            };
            cur = match ord {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }
}

impl<K: Ord, V> Dictionary<K, V> for AvlTree<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError> {
        Ok(self.insert_entry(key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V, DictError> {
        self.find(key).map(|n| &n.value).ok_or(DictError::KeyNotFound)
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        self.find_value_mut(key, true).ok_or(DictError::KeyNotFound)
    }

    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default,
    {
        // Search once; on a miss the insertion descends again. Fetching the new value back
        // out is bookkeeping and is not counted.
        if self.find(&key).is_none() {
            self.insert_entry(key.clone(), V::default());
        }
        self.find_value_mut(&key, false).ok_or(DictError::KeyNotFound)
    }

    fn clear(&mut self) {
        log::trace!("clearing AVL tree of {} entries", self.len);
        self.root = None;
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a,
    {
        AvlTree::iter(self)
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (k, v) in entries {
            self.insert_entry(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        Self::from_entries(entries)
    }
}

impl<K: Debug, V: Debug> Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> DictStatsTrait for AvlTree<K, V> {
    fn get_dict_stats(&self) -> DictStats {
        DictStats::for_tree(
            DictionaryType::Avl,
            self.len,
            &self.comparisons,
            &self.rotations,
            self.height(),
        )
    }
}

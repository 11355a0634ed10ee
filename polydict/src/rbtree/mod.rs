//! Red-black tree over a node arena.
//!
//! Nodes live in a `Vec` and refer to each other by `NodeId`. The sentinel leaf is the
//! reserved id `NIL`: every absent child points at it, it reads as black, and it never
//! occupies a slot. The sentinel's parent link is only meaningful in the middle of a removal
//! (where the deletion fixup starts from a possibly-nil node and walks to its parent), so it is
//! kept in a field of the tree rather than on a node.
//!
//! Removing an entry frees its node with `swap_remove` and patches the links of the node that
//! moved into the vacated slot, so the arena stays dense and `nodes.len()` is the entry count.

use std::cmp::Ordering;
use std::fmt::{self, Debug};

use crate::dynamic::DictionaryType;
use crate::error::DictError;
use crate::iter::{InOrderIter, TreeCursor, draw_sideways};
use crate::stats::{Counter, DictStats, DictStatsTrait};
use crate::Dictionary;

use node::{Color, NIL, NodeId, RbNode};

mod node;

/// A red-black tree.
///
/// - the root is black
/// - a red node has no red child
/// - every path from a node down to the sentinel passes the same number of black nodes
///
/// Insertion colors the new node red and repairs red-red violations by recoloring (red
/// uncle) or by one or two rotations (black uncle). Removal of a black node repairs the black
/// height with the four classic sibling cases.
///
/// ```rust
/// use polydict::{Dictionary, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// for k in [10, 20, 30] {
///     tree.insert(k, ()).unwrap();
/// }
/// assert_eq!(tree.rotations(), 1);
/// assert_eq!(tree.remove(&20), Some(()));
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Clone)]
pub struct RedBlackTree<K, V> {
    nodes: Vec<RbNode<K, V>>,
    root: NodeId,
    nil_parent: NodeId,
    comparisons: Counter,
    rotations: Counter,
}

pub type Iter<'a, K, V> = InOrderIter<'a, RbCursor<'a, K, V>>;

/// [`TreeCursor`] over the arena of a red-black tree.
pub struct RbCursor<'a, K, V> {
    nodes: &'a [RbNode<K, V>],
}

impl<K, V> Clone for RbCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for RbCursor<'_, K, V> {}

impl<'a, K, V> TreeCursor<'a> for RbCursor<'a, K, V> {
    type Handle = NodeId;
    type Key = K;
    type Value = V;

    fn left(&self, node: NodeId) -> Option<NodeId> {
        Some(self.nodes[node].left).filter(|&id| id != NIL)
    }

    fn right(&self, node: NodeId) -> Option<NodeId> {
        Some(self.nodes[node].right).filter(|&id| id != NIL)
    }

    fn entry(&self, node: NodeId) -> (&'a K, &'a V) {
        let n = &self.nodes[node];
        (&n.key, &n.value)
    }
}

impl<K, V> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RedBlackTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
            nil_parent: NIL,
            comparisons: Counter::new(),
            rotations: Counter::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

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

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        InOrderIter::new(self.cursor(), self.root_id(), self.len())
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root_id().map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            for child in [self.left(id), self.right(id)] {
                if child != NIL {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    /// Renders the tree sideways, right subtree on top, with each node's color.
    pub fn pretty_print(&self) -> String
    where
        K: Debug,
        V: Debug,
    {
        draw_sideways(self.cursor(), self.root_id(), |id| {
            let n = &self.nodes[id];
            format!("[{:?}, {:?}] {}", n.key, n.value, n.color)
        })
    }

    fn cursor(&self) -> RbCursor<'_, K, V> {
        RbCursor { nodes: &self.nodes }
    }

    fn root_id(&self) -> Option<NodeId> {
        Some(self.root).filter(|&id| id != NIL)
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        if id == NIL { Color::Black } else { self.nodes[id].color }
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        if id != NIL {
            self.nodes[id].color = color;
        }
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        if id == NIL { self.nil_parent } else { self.nodes[id].parent }
    }

    #[inline]
    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if id == NIL {
            self.nil_parent = parent;
        } else {
            self.nodes[id].parent = parent;
        }
    }

    #[inline]
    fn left(&self, id: NodeId) -> NodeId {
        if id == NIL { NIL } else { self.nodes[id].left }
    }

    #[inline]
    fn right(&self, id: NodeId) -> NodeId {
        if id == NIL { NIL } else { self.nodes[id].right }
    }

    /// Points `parent`'s link that referred to `old` at `new`; a nil `parent` means `old` was
    /// the root.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent == NIL {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            self.nodes[parent].right = new;
        }
    }

    fn rotate_left(&mut self, p: NodeId) {
        self.rotations.incr();
        let pivot = self.nodes[p].right;
        let inner = self.nodes[pivot].left;
        self.nodes[p].right = inner;
        if inner != NIL {
            self.nodes[inner].parent = p;
        }
        let grandparent = self.nodes[p].parent;
        self.nodes[pivot].parent = grandparent;
        self.replace_child(grandparent, p, pivot);
        self.nodes[pivot].left = p;
        self.nodes[p].parent = pivot;
    }

    fn rotate_right(&mut self, p: NodeId) {
        self.rotations.incr();
        let pivot = self.nodes[p].left;
        let inner = self.nodes[pivot].right;
        self.nodes[p].left = inner;
        if inner != NIL {
            self.nodes[inner].parent = p;
        }
        let grandparent = self.nodes[p].parent;
        self.nodes[pivot].parent = grandparent;
        self.replace_child(grandparent, p, pivot);
        self.nodes[pivot].right = p;
        self.nodes[p].parent = pivot;
    }

    fn fixup_insertion(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            let g = self.parent(p);
            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    fn fixup_deletion(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            if x == self.left(self.parent(x)) {
                let mut w = self.right(self.parent(x));
                // Case 1: red sibling.
                if self.color(w) == Color::Red {
                    let xp = self.parent(x);
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_left(xp);
                    w = self.right(self.parent(x));
                }
                if self.color(self.left(w)) == Color::Black
                    && self.color(self.right(w)) == Color::Black
                {
                    // Case 2: both nephews black.
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    // Case 3: far nephew black.
                    if self.color(self.right(w)) == Color::Black {
                        self.set_color(self.left(w), Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(self.parent(x));
                    }
                    // Case 4.
                    let xp = self.parent(x);
                    self.set_color(w, self.color(xp));
                    self.set_color(xp, Color::Black);
                    self.set_color(self.right(w), Color::Black);
                    self.rotate_left(xp);
                    x = self.root;
                }
            } else {
                let mut w = self.left(self.parent(x));
                if self.color(w) == Color::Red {
                    let xp = self.parent(x);
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_right(xp);
                    w = self.left(self.parent(x));
                }
                if self.color(self.right(w)) == Color::Black
                    && self.color(self.left(w)) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        self.set_color(self.right(w), Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(self.parent(x));
                    }
                    let xp = self.parent(x);
                    self.set_color(w, self.color(xp));
                    self.set_color(xp, Color::Black);
                    self.set_color(self.left(w), Color::Black);
                    self.rotate_right(xp);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.left(id) != NIL {
            id = self.left(id);
        }
        id
    }

    /// Unlinks node `z` and returns its value.
    fn remove_node(&mut self, z: NodeId) -> V {
        // `y` is the node that physically leaves the tree, `x` the one moving into its place.
        let y = if self.left(z) == NIL || self.right(z) == NIL {
            z
        } else {
            self.minimum(self.right(z))
        };
        let x = if self.left(y) != NIL {
            self.left(y)
        } else {
            self.right(y)
        };

        let yp = self.parent(y);
        self.set_parent(x, yp);
        self.replace_child(yp, y, x);

        if y != z {
            // The successor's entry survives in `z`; the removed one leaves with `y`.
            self.swap_entries(y, z);
        }

        if self.color(y) == Color::Black {
            self.fixup_deletion(x);
        }
        self.nil_parent = NIL;

        self.free(y).value
    }

    fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi);
        let (first, second) = (&mut head[lo], &mut tail[0]);
        std::mem::swap(&mut first.key, &mut second.key);
        std::mem::swap(&mut first.value, &mut second.value);
    }

    /// Drops a detached node from the arena. The last node moves into the freed slot, so its
    /// neighbours are repointed at the new id.
    fn free(&mut self, id: NodeId) -> RbNode<K, V> {
        let last = self.nodes.len() - 1;
        let node = self.nodes.swap_remove(id);
        if id != last {
            let (parent, left, right) = {
                let moved = &self.nodes[id];
                (moved.parent, moved.left, moved.right)
            };
            self.replace_child(parent, last, id);
            for child in [left, right] {
                if child != NIL {
                    self.nodes[child].parent = id;
                }
            }
        }
        node
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Self::new();
        tree.extend(entries);
        tree
    }

    /// Returns the node holding `key` and whether it was created by this call.
    fn insert_entry(&mut self, key: K, value: V) -> (NodeId, bool) {
        let mut parent = NIL;
        let mut cur = self.root;
        let mut ord = Ordering::Equal;
        while cur != NIL {
            parent = cur;
            ord = self.comparisons.compare(&key, &self.nodes[cur].key);
            cur = match ord {
                Ordering::Equal => return (cur, false),
                Ordering::Less => self.nodes[cur].left,
                Ordering::Greater => self.nodes[cur].right,
            };
        }

        let id = self.nodes.len();
        self.nodes.push(RbNode::leaf(key, value, parent));
        if parent == NIL {
            self.root = id;
        } else if ord == Ordering::Less {
            self.nodes[parent].left = id;
        } else {
            self.nodes[parent].right = id;
        }

        self.fixup_insertion(id);
        (id, true)
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while cur != NIL {
            let node = &self.nodes[cur];
            cur = match self.comparisons.compare(key, &node.key) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// A new tree holding the entries of both trees; where a key is in both, the entry from
    /// `self` is kept.
    pub fn union(&self, other: &Self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let mut result = Self::new();
        for tree in [self, other] {
            let mut stack: Vec<NodeId> = tree.root_id().into_iter().collect();
            while let Some(id) = stack.pop() {
                let node = &tree.nodes[id];
                result.insert_entry(node.key.clone(), node.value.clone());
                for child in [node.right, node.left] {
                    if child != NIL {
                        stack.push(child);
                    }
                }
            }
        }
        result
    }
}

impl<K: Ord, V> Dictionary<K, V> for RedBlackTree<K, V> {
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError> {
        Ok(self.insert_entry(key, value).1)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.find(key)?;
        Some(self.remove_node(id))
    }

    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V, DictError> {
        let id = self.find(key).ok_or(DictError::KeyNotFound)?;
        Ok(&self.nodes[id].value)
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        let id = self.find(key).ok_or(DictError::KeyNotFound)?;
        Ok(&mut self.nodes[id].value)
    }

    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default,
    {
        let id = match self.find(&key) {
            Some(id) => id,
            None => self.insert_entry(key, V::default()).0,
        };
        Ok(&mut self.nodes[id].value)
    }

    fn clear(&mut self) {
        log::trace!("clearing red-black tree of {} entries", self.nodes.len());
        self.nodes.clear();
        self.root = NIL;
        self.nil_parent = NIL;
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a,
    {
        RedBlackTree::iter(self)
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedBlackTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (k, v) in entries {
            self.insert_entry(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedBlackTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        Self::from_entries(entries)
    }
}

impl<K: Debug, V: Debug> Debug for RedBlackTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> DictStatsTrait for RedBlackTree<K, V> {
    fn get_dict_stats(&self) -> DictStats {
        DictStats::for_tree(
            DictionaryType::RedBlack,
            self.len(),
            &self.comparisons,
            &self.rotations,
            self.height(),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use rand::seq::SliceRandom;
    use rand::{Rng, rng};

    use super::node::NIL;
    use super::{Color, RedBlackTree};
    use crate::{DictError, Dictionary};

    /// Checks links, key order and the coloring rules; returns the black height.
    pub(crate) fn check_tree<K: Ord, V>(tree: &RedBlackTree<K, V>) -> usize {
        if tree.root == NIL {
            assert!(tree.nodes.is_empty());
            return 0;
        }
        assert_eq!(tree.nodes[tree.root].parent, NIL, "root has a parent");
        assert_eq!(tree.color(tree.root), Color::Black, "red root");

        let mut reachable = 0;
        let black_height = check_node(tree, tree.root, None, None, &mut reachable);
        assert_eq!(reachable, tree.len(), "arena holds unreachable nodes");
        assert_eq!(tree.iter().count(), tree.len());
        black_height
    }

    fn check_node<K: Ord, V>(
        tree: &RedBlackTree<K, V>,
        id: usize,
        lo: Option<&K>,
        hi: Option<&K>,
        reachable: &mut usize,
    ) -> usize {
        if id == NIL {
            return 1;
        }
        *reachable += 1;
        let node = &tree.nodes[id];
        if let Some(lo) = lo {
            assert!(node.key > *lo, "key order violated");
        }
        if let Some(hi) = hi {
            assert!(node.key < *hi, "key order violated");
        }
        for child in [node.left, node.right] {
            if child != NIL {
                assert_eq!(tree.nodes[child].parent, id, "stale parent link");
                if node.color == Color::Red {
                    assert_eq!(tree.nodes[child].color, Color::Black, "red node with red child");
                }
            }
        }
        let lh = check_node(tree, node.left, lo, Some(&node.key), reachable);
        let rh = check_node(tree, node.right, Some(&node.key), hi, reachable);
        assert_eq!(lh, rh, "unequal black heights");
        lh + usize::from(node.color == Color::Black)
    }

    fn root_key<K: Copy, V>(tree: &RedBlackTree<K, V>) -> Option<K> {
        tree.root_id().map(|id| tree.nodes[id].key)
    }

    #[test]
    fn test_ascending_inserts_rotate_once() {
        let mut tree = RedBlackTree::new();
        for k in [10, 20, 30] {
            assert_eq!(tree.insert(k, k), Ok(true));
        }
        assert_eq!(tree.rotations(), 1);
        assert_eq!(root_key(&tree), Some(20));
        check_tree(&tree);
    }

    #[test]
    fn test_inner_grandchild_rotates_twice() {
        let mut tree = RedBlackTree::new();
        for k in [30, 10, 20] {
            tree.insert(k, ()).unwrap();
        }
        assert_eq!(tree.rotations(), 2);
        assert_eq!(root_key(&tree), Some(20));
        assert_eq!(tree.comparisons(), 6);
        check_tree(&tree);
    }

    #[test]
    fn test_red_uncle_recolors() {
        let mut tree = RedBlackTree::new();
        for k in [20, 10, 30, 5] {
            tree.insert(k, ()).unwrap();
        }
        assert_eq!(tree.rotations(), 0);
        let color_of = |k: i32| {
            tree.nodes
                .iter()
                .find(|n| n.key == k)
                .map(|n| n.color)
        };
        assert_eq!(color_of(20), Some(Color::Black));
        assert_eq!(color_of(10), Some(Color::Black));
        assert_eq!(color_of(30), Some(Color::Black));
        assert_eq!(color_of(5), Some(Color::Red));
        check_tree(&tree);
    }

    #[test]
    fn test_remove_root_with_two_children() {
        let mut tree: RedBlackTree<i32, i32> =
            [20, 10, 30, 5, 25].into_iter().map(|k| (k, k * 2)).collect();
        assert_eq!(tree.remove(&20), Some(40));
        assert_eq!(tree.len(), 4);
        assert!(!tree.contains(&20));
        for k in [5, 10, 25, 30] {
            assert_eq!(tree.at(&k), Ok(&(k * 2)));
        }
        assert_eq!(root_key(&tree), Some(25));
        check_tree(&tree);
    }

    #[test]
    fn test_remove_black_leaf_runs_fixup() {
        let mut tree: RedBlackTree<i32, ()> = (1..=10).map(|k| (k, ())).collect();
        check_tree(&tree);
        for k in [1, 3, 2, 10, 9, 4] {
            assert!(tree.remove(&k).is_some());
            check_tree(&tree);
        }
        let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_remove_until_empty() {
        let mut tree: RedBlackTree<i32, ()> = (0..32).map(|k| (k, ())).collect();
        for k in (0..32).rev() {
            tree.remove(&k);
            check_tree(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.remove(&0), None);
    }

    #[test]
    fn test_errors_and_update() {
        let mut tree: RedBlackTree<&str, i32> = RedBlackTree::new();
        assert_eq!(tree.at(&"x"), Err(DictError::KeyNotFound));
        assert_eq!(tree.update(&"x", 1), Err(DictError::KeyNotFound));
        assert!(tree.is_empty());
        tree.insert("x", 1).unwrap();
        assert_eq!(tree.insert("x", 2), Ok(false));
        tree.update(&"x", 3).unwrap();
        assert_eq!(tree.at(&"x"), Ok(&3));
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut tree: RedBlackTree<char, usize> = RedBlackTree::new();
        for c in "mississippi".chars() {
            *tree.get_or_insert_default(c).unwrap() += 1;
        }
        let counts: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(counts, vec![('i', 4), ('m', 1), ('p', 2), ('s', 4)]);
        check_tree(&tree);
    }

    #[test]
    fn test_union_prefers_self() {
        let a: RedBlackTree<i32, &str> = [(1, "a"), (2, "a"), (3, "a")].into_iter().collect();
        let b: RedBlackTree<i32, &str> = [(3, "b"), (4, "b")].into_iter().collect();
        let u = a.union(&b);
        let entries: Vec<_> = u.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![(1, "a"), (2, "a"), (3, "a"), (4, "b")]);
        check_tree(&u);
        // Inputs are untouched.
        assert_eq!(a.len(), 3);
        assert_eq!(b.at(&3), Ok(&"b"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: RedBlackTree<i32, i32> = (0..40).map(|k| (k, k)).collect();
        let mut copy = original.clone();
        assert_eq!(copy.comparisons(), original.comparisons());

        original.remove(&7);
        copy.update(&8, -8).unwrap();

        assert!(copy.contains(&7));
        assert_eq!(original.at(&8), Ok(&8));
        check_tree(&original);
        check_tree(&copy);
    }

    #[test]
    fn test_pretty_print_marks_colors() {
        let tree: RedBlackTree<i32, i32> = [2, 1, 3].into_iter().map(|k| (k, k)).collect();
        let drawing = tree.pretty_print();
        let lines: Vec<&str> = drawing.lines().collect();
        assert_eq!(
            lines,
            vec!["┌───[3, 3] RED", "[2, 2] BLACK", "└───[1, 1] RED"]
        );
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut tree: RedBlackTree<i32, ()> = (0..10).map(|k| (k, ())).collect();
        let rotations = tree.rotations();
        assert!(rotations > 0);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.rotations(), rotations);
        tree.reset_counters();
        assert_eq!(tree.rotations(), 0);
        assert_eq!(tree.comparisons(), 0);
    }

    #[test]
    fn test_random_insert_remove_matches_btreemap() {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeMap::new();
        let mut rng = rng();
        for i in 0..5_000u32 {
            let key = rng.random_range(0..800u32);
            if rng.random_bool(0.55) {
                tree.insert(key, i).unwrap();
                model.entry(key).or_insert(i);
            } else {
                assert_eq!(tree.remove(&key), model.remove(&key));
            }
            if i % 200 == 0 {
                check_tree(&tree);
            }
        }
        check_tree(&tree);
        let got: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_height_bound() {
        let mut keys: Vec<u32> = (0..4_096).collect();
        keys.shuffle(&mut rng());
        let tree: RedBlackTree<u32, ()> = keys.into_iter().map(|k| (k, ())).collect();
        let black_height = check_tree(&tree);
        // A red-black tree is at most 2 * log2(n + 1) tall.
        assert!(tree.height() <= 2 * 13);
        assert!(black_height >= 6);
    }
}

//! Lazy in-order traversal for the tree engines.
//!
//! Both trees expose their nodes through [`TreeCursor`]: the AVL tree hands out node
//! references directly, the red-black tree hands out arena ids. [`InOrderIter`] walks either
//! one with an explicit stack, so iteration never recurses and never allocates more than the
//! height of the tree.

use std::fmt::Write;
use std::marker::PhantomData;

/// Navigation over the nodes of a binary search tree.
pub trait TreeCursor<'a>: Copy {
    type Handle: Copy;
    type Key: 'a;
    type Value: 'a;

    fn left(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn right(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn entry(&self, node: Self::Handle) -> (&'a Self::Key, &'a Self::Value);
}

pub struct InOrderIter<'a, C: TreeCursor<'a>> {
    cursor: C,
    // Nodes whose left subtree has been pushed but which have not been yielded yet.
    stack: Vec<C::Handle>,
    remaining: usize,
    _marker: PhantomData<&'a ()>,
}

impl<'a, C: TreeCursor<'a>> InOrderIter<'a, C> {
    pub(crate) fn new(cursor: C, root: Option<C::Handle>, len: usize) -> Self {
        let mut iter = Self {
            cursor,
            stack: Vec::new(),
            remaining: len,
            _marker: PhantomData,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<C::Handle>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = self.cursor.left(n);
        }
    }
}

impl<'a, C: TreeCursor<'a>> Iterator for InOrderIter<'a, C> {
    type Item = (&'a C::Key, &'a C::Value);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(self.cursor.right(node));
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.cursor.entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, C: TreeCursor<'a>> ExactSizeIterator for InOrderIter<'a, C> {}

/// Draws a tree sideways, right subtree on top, one node per line.
///
/// `label` renders a node; absent children of inner nodes are drawn as `#`.
pub(crate) fn draw_sideways<'a, C, F>(cursor: C, root: Option<C::Handle>, label: F) -> String
where
    C: TreeCursor<'a>,
    F: Fn(C::Handle) -> String,
{
    let mut out = String::new();
    let mut path = Vec::new();
    draw_node(cursor, root, &label, &mut path, &mut out);
    out
}

fn draw_node<'a, C, F>(
    cursor: C,
    node: Option<C::Handle>,
    label: &F,
    path: &mut Vec<u8>,
    out: &mut String,
) where
    C: TreeCursor<'a>,
    F: Fn(C::Handle) -> String,
{
    let has_children =
        node.is_some_and(|n| cursor.left(n).is_some() || cursor.right(n).is_some());

    if has_children {
        path.push(b'r');
        draw_node(cursor, node.and_then(|n| cursor.right(n)), label, path, out);
        path.pop();
    }

    for pair in path.windows(2) {
        out.push_str(if pair[0] != pair[1] { "│   " } else { "    " });
    }
    if let Some(last) = path.last() {
        out.push_str(if *last == b'r' { "┌───" } else { "└───" });
    }

    let Some(n) = node else {
        out.push_str("#\n");
        return;
    };
    let _ = writeln!(out, "{}", label(n));

    if has_children {
        path.push(b'l');
        draw_node(cursor, cursor.left(n), label, path, out);
        path.pop();
    }
}

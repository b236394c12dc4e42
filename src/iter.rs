use std::iter::FusedIterator;

use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::tree::RbTree;

/// An iterator over the entries of an `OrderedMap`, sorted by key.
///
/// Walks the successor links from the header's cached minimum, and the
/// predecessor links from the cached maximum when iterated from the back.
pub struct Iter<'a, K, V, C, Ix> {
    /// Reference to the tree
    tree: &'a RbTree<K, V, C, Ix>,
    /// Next node yielded from the front
    front: NodeIndex<Ix>,
    /// Next node yielded from the back
    back: NodeIndex<Ix>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V, C, Ix> Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: &'a RbTree<K, V, C, Ix>) -> Self {
        Iter {
            tree,
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len,
        }
    }
}

impl<'a, K, V, C, Ix> Iterator for Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front;
        self.front = self.tree.successor(x);
        self.remaining -= 1;
        Some(self.tree.node_ref(x, Node::entry))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Iter<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back;
        self.back = self.tree.predecessor(x);
        self.remaining -= 1;
        Some(self.tree.node_ref(x, Node::entry))
    }
}

impl<K, V, C, Ix> ExactSizeIterator for Iter<'_, K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> FusedIterator for Iter<'_, K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> Clone for Iter<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// An into iterator over the entries of an `OrderedMap`, sorted by key.
pub struct IntoIter<K, V, C, Ix> {
    tree: RbTree<K, V, C, Ix>,
    front: NodeIndex<Ix>,
    back: NodeIndex<Ix>,
    remaining: usize,
}

impl<K, V, C, Ix> IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree: RbTree<K, V, C, Ix>) -> Self {
        IntoIter {
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len,
            tree,
        }
    }

    /// Move the entry out of a slot, leaving its links for the remaining walk.
    fn take(&mut self, x: NodeIndex<Ix>) -> (K, V) {
        let node = &mut self.tree.nodes[x.index()];
        let key = node.key.take().expect("live node has a key");
        let value = node.value.take().expect("live node has a value");
        (key, value)
    }
}

impl<K, V, C, Ix> Iterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front;
        self.front = self.tree.successor(x);
        self.remaining -= 1;
        Some(self.take(x))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back;
        self.back = self.tree.predecessor(x);
        self.remaining -= 1;
        Some(self.take(x))
    }
}

impl<K, V, C, Ix> ExactSizeIterator for IntoIter<K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> FusedIterator for IntoIter<K, V, C, Ix> where Ix: IndexType {}

/// An iterator over the keys of an `OrderedMap`, in order.
pub struct Keys<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix> Iterator for Keys<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Keys<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C, Ix> ExactSizeIterator for Keys<'_, K, V, C, Ix> where Ix: IndexType {}

/// An iterator over the values of an `OrderedMap`, in key order.
pub struct Values<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix> Iterator for Values<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Values<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C, Ix> ExactSizeIterator for Values<'_, K, V, C, Ix> where Ix: IndexType {}

use std::fmt;
use std::iter::FusedIterator;

use crate::compare::{Comparator, Natural};
use crate::config::TreeConfig;
use crate::cursor::{Cursor, Direction};
use crate::error::Result;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Keys};
use crate::node::Node;
use crate::tree::RbTree;

/// An ordered set backed by a red-black tree.
///
/// Shares its engine with [`OrderedMap`](crate::OrderedMap); elements are
/// stored as keys with a unit value.
#[derive(Clone)]
pub struct OrderedSet<K, C = Natural, Ix = DefaultIx> {
    pub(crate) tree: RbTree<K, (), C, Ix>,
}

impl<K> OrderedSet<K> {
    /// Create an empty `OrderedSet`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    /// Creates a new `OrderedSet` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TreeConfig::new().capacity(capacity))
    }

    /// Creates a new `OrderedSet` in natural order with the given options.
    #[inline]
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_comparator_and_config(Natural, config)
    }
}

impl<K> Default for OrderedSet<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> OrderedSet<K, C> {
    /// Creates a new `OrderedSet` ordered by `comparator`.
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_config(comparator, TreeConfig::new())
    }
}

impl<K, C, Ix> OrderedSet<K, C, Ix>
where
    Ix: IndexType,
{
    /// Creates a new `OrderedSet` ordered by `comparator` with the given options.
    #[inline]
    #[must_use]
    pub fn with_comparator_and_config(comparator: C, config: TreeConfig) -> Self {
        Self {
            tree: RbTree::new(comparator, config),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.tree.is_indexed()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor<Ix> {
        self.tree.cursor(self.tree.first(), Direction::Forward)
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor<Ix> {
        self.tree.cursor(NodeIndex::header(), Direction::Forward)
    }

    #[inline]
    #[must_use]
    pub fn rbegin(&self) -> Cursor<Ix> {
        self.tree.cursor(self.tree.last(), Direction::Reverse)
    }

    #[inline]
    #[must_use]
    pub fn rend(&self) -> Cursor<Ix> {
        self.tree.cursor(NodeIndex::header(), Direction::Reverse)
    }

    /// The smallest element, in `O(1)`.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        let x = self.tree.first();
        (!x.is_header()).then(|| self.tree.node_ref(x, Node::key))
    }

    /// The largest element, in `O(1)`.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        let x = self.tree.last();
        (!x.is_header()).then(|| self.tree.node_ref(x, Node::key))
    }

    #[inline]
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first().map(|(k, ())| k)
    }

    #[inline]
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last().map(|(k, ())| k)
    }

    /// Get an iterator over the elements of the set, in order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> SetIter<'_, K, C, Ix> {
        SetIter {
            inner: Keys {
                inner: crate::iter::Iter::new(&self.tree),
            },
        }
    }

    /// Move the cursor one step in its direction.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// when the cursor is already at the end or names an erased element.
    #[inline]
    pub fn next_cursor(&self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        self.tree.next_cursor(cursor)
    }

    /// Move the cursor one step against its direction.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// when the cursor is at its first position or names an erased element.
    #[inline]
    pub fn prev_cursor(&self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        self.tree.prev_cursor(cursor)
    }

    /// Element under the cursor.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    #[inline]
    pub fn key_at(&self, cursor: Cursor<Ix>) -> Result<&K> {
        let x = self.tree.check_accessible(cursor)?;
        Ok(self.tree.node_ref(x, Node::key))
    }

    /// Position of the cursor in order; `len()` for the end position.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// for a cursor naming an erased element.
    #[inline]
    pub fn rank(&self, cursor: Cursor<Ix>) -> Result<usize> {
        self.tree.rank_of(cursor)
    }

    /// The element at position `pos`.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::InvalidPosition`](crate::TreeError::InvalidPosition)
    /// when `pos >= len()`.
    #[inline]
    pub fn get_at(&self, pos: usize) -> Result<&K> {
        let x = self.tree.node_at(pos)?;
        Ok(self.tree.node_ref(x, Node::key))
    }

    /// Remove the element at position `pos`.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::InvalidPosition`](crate::TreeError::InvalidPosition)
    /// when `pos >= len()`.
    #[inline]
    pub fn remove_at(&mut self, pos: usize) -> Result<K> {
        self.tree.remove_at(pos).map(|(k, ())| k)
    }

    /// Remove the element under the cursor, returning a cursor at the one
    /// that followed it in the cursor's direction.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    #[inline]
    pub fn remove_cursor(&mut self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        self.tree.remove_cursor(cursor).map(|(next, _)| next)
    }

    /// Keep only the elements for which `f` returns `true`.
    #[inline]
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.tree.retain(|k, _| f(k));
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

impl<K, C, Ix> OrderedSet<K, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Add an element. Returns `false` if an equal element was already present,
    /// in which case the set is unchanged.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert(key, (), None).is_none()
    }

    /// Add an element with a hint: a cursor at the element expected right after it.
    #[inline]
    pub fn insert_with_hint(&mut self, key: K, hint: Cursor<Ix>) -> bool {
        let hint = self.tree.check_accessible(hint).ok();
        self.tree.insert(key, (), hint).is_none()
    }

    /// Remove an element. Returns whether it was present.
    #[inline]
    pub fn remove(&mut self, key: &K) -> bool {
        self.tree.remove(key).is_some()
    }

    /// Remove and return the stored element equal to `key`.
    #[inline]
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.tree.remove(key).map(|(k, ())| k)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.tree.find(key).is_some()
    }

    /// Cursor at `key`, or [`end`](Self::end) when absent.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor<Ix> {
        let x = self.tree.find(key).unwrap_or_else(NodeIndex::header);
        self.tree.cursor(x, Direction::Forward)
    }

    /// Cursor at the first element not less than `key`.
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.lower_bound(key), Direction::Forward)
    }

    /// Cursor at the first element greater than `key`.
    #[inline]
    pub fn upper_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.upper_bound(key), Direction::Forward)
    }

    /// Cursor at the last element not greater than `key`.
    #[inline]
    pub fn reverse_lower_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.reverse_lower_bound(key), Direction::Forward)
    }

    /// Cursor at the last element less than `key`.
    #[inline]
    pub fn reverse_upper_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.reverse_upper_bound(key), Direction::Forward)
    }

    /// Replace the element under the cursor if the new one keeps the order.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    #[inline]
    pub fn update_key(&mut self, cursor: Cursor<Ix>, key: K) -> Result<bool> {
        self.tree.update_key(cursor, key)
    }

    /// Insert every element of `other`. Returns the new length.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedSet;
    ///
    /// let mut a: OrderedSet<_> = [1, 3, 5].into_iter().collect();
    /// let b: OrderedSet<_> = [2, 3, 4].into_iter().collect();
    /// assert_eq!(a.union(&b), 5);
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn union<C2, Ix2>(&mut self, other: &OrderedSet<K, C2, Ix2>) -> usize
    where
        K: Clone,
        Ix2: IndexType,
    {
        let before = self.len();
        for key in other.iter() {
            let _ignore = self.tree.insert(key.clone(), (), None);
        }
        tracing::debug!(before, merged = other.len(), after = self.len(), "union");
        self.len()
    }
}

impl<K, C, Ix> fmt::Debug for OrderedSet<K, C, Ix>
where
    K: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C, Ix> PartialEq for OrderedSet<K, C, Ix>
where
    K: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, C, Ix> Eq for OrderedSet<K, C, Ix>
where
    K: Eq,
    Ix: IndexType,
{
}

impl<K, C, Ix> Extend<K> for OrderedSet<K, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ignore = self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for OrderedSet<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<K, C, Ix> IntoIterator for OrderedSet<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = K;
    type IntoIter = SetIntoIter<K, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter {
            inner: IntoIter::new(self.tree),
        }
    }
}

impl<'a, K, C, Ix> IntoIterator for &'a OrderedSet<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;
    type IntoIter = SetIter<'a, K, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of an `OrderedSet`, in order.
pub struct SetIter<'a, K, C, Ix> {
    inner: Keys<'a, K, (), C, Ix>,
}

impl<'a, K, C, Ix> Iterator for SetIter<'a, K, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, C, Ix> DoubleEndedIterator for SetIter<'_, K, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, C, Ix> ExactSizeIterator for SetIter<'_, K, C, Ix> where Ix: IndexType {}

impl<K, C, Ix> FusedIterator for SetIter<'_, K, C, Ix> where Ix: IndexType {}

/// An owning iterator over the elements of an `OrderedSet`, in order.
pub struct SetIntoIter<K, C, Ix> {
    inner: IntoIter<K, (), C, Ix>,
}

impl<K, C, Ix> Iterator for SetIntoIter<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, C, Ix> DoubleEndedIterator for SetIntoIter<K, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<K, C, Ix> ExactSizeIterator for SetIntoIter<K, C, Ix> where Ix: IndexType {}

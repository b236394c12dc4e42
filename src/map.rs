use std::fmt;
use std::ops::Index;

use crate::compare::{Comparator, Natural};
use crate::config::TreeConfig;
use crate::cursor::{Cursor, Direction};
use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::error::Result;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::node::Node;
use crate::tree::{RbTree, Slot};

/// An ordered key-value map backed by a red-black tree.
///
/// Keys are unique and kept in the order given by the comparator `C`. When
/// built with [`TreeConfig::indexed`], positional access and ranks run in
/// `O(logN)`; otherwise they fall back to an in-order walk.
#[derive(Clone)]
pub struct OrderedMap<K, V, C = Natural, Ix = DefaultIx> {
    pub(crate) tree: RbTree<K, V, C, Ix>,
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty `OrderedMap`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    /// Creates a new `OrderedMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TreeConfig::new().capacity(capacity))
    }

    /// Creates a new `OrderedMap` in natural key order with the given options.
    #[inline]
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_comparator_and_config(Natural, config)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Creates a new `OrderedMap` ordered by `comparator`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_config(comparator, TreeConfig::new())
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Creates a new `OrderedMap` ordered by `comparator` with the given options.
    #[inline]
    #[must_use]
    pub fn with_comparator_and_config(comparator: C, config: TreeConfig) -> Self {
        Self {
            tree: RbTree::new(comparator, config),
        }
    }

    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether order-statistics indexing was enabled at construction.
    #[inline]
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.tree.is_indexed()
    }

    /// Remove all elements from the map
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Cursor at the smallest key, or [`end`](Self::end) when empty.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> Cursor<Ix> {
        self.tree.cursor(self.tree.first(), Direction::Forward)
    }

    /// The one-past-the-end cursor.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Cursor<Ix> {
        self.tree.cursor(NodeIndex::header(), Direction::Forward)
    }

    /// Reverse cursor at the largest key, or [`rend`](Self::rend) when empty.
    #[inline]
    #[must_use]
    pub fn rbegin(&self) -> Cursor<Ix> {
        self.tree.cursor(self.tree.last(), Direction::Reverse)
    }

    /// The one-past-the-end reverse cursor.
    #[inline]
    #[must_use]
    pub fn rend(&self) -> Cursor<Ix> {
        self.tree.cursor(NodeIndex::header(), Direction::Reverse)
    }

    /// The entry with the smallest key, in `O(1)`.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<(&K, &V)> {
        let x = self.tree.first();
        (!x.is_header()).then(|| self.tree.node_ref(x, Node::entry))
    }

    /// The entry with the largest key, in `O(1)`.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<(&K, &V)> {
        let x = self.tree.last();
        (!x.is_header()).then(|| self.tree.node_ref(x, Node::entry))
    }

    /// Remove and return the entry with the smallest key.
    #[inline]
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Remove and return the entry with the largest key.
    #[inline]
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// Get an iterator over the entries of the map, sorted by key.
    ///
    /// Every call starts again from the smallest key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C, Ix> {
        Iter::new(&self.tree)
    }

    /// Get an iterator over the keys of the map, in order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, C, Ix> {
        Keys { inner: self.iter() }
    }

    /// Get an iterator over the values of the map, in key order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, C, Ix> {
        Values { inner: self.iter() }
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
    /// when the cursor is at its first position, the map is empty, or the
    /// cursor names an erased element.
    #[inline]
    pub fn prev_cursor(&self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        self.tree.prev_cursor(cursor)
    }

    /// Key under the cursor.
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

    /// Value under the cursor.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    #[inline]
    pub fn value_at(&self, cursor: Cursor<Ix>) -> Result<&V> {
        let x = self.tree.check_accessible(cursor)?;
        Ok(self.tree.node_ref(x, Node::value))
    }

    /// Mutable value under the cursor. Keys are never writable this way, see
    /// [`update_key`](Self::update_key).
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    #[inline]
    pub fn value_at_mut(&mut self, cursor: Cursor<Ix>) -> Result<&mut V> {
        let x = self.tree.check_accessible(cursor)?;
        Ok(self.tree.node_mut(x, Node::value_mut))
    }

    /// Position of the cursor in key order; `len()` for the end position.
    ///
    /// `O(logN)` when indexed, `O(N)` otherwise.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// for a cursor naming an erased element.
    #[inline]
    pub fn rank(&self, cursor: Cursor<Ix>) -> Result<usize> {
        self.tree.rank_of(cursor)
    }

    /// The entry at position `pos` in key order.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::InvalidPosition`](crate::TreeError::InvalidPosition)
    /// when `pos >= len()`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::{OrderedMap, TreeConfig};
    ///
    /// let mut map = OrderedMap::with_config(TreeConfig::new().indexed(true));
    /// for k in [30, 10, 20] {
    ///     map.insert(k, k * 2);
    /// }
    /// assert_eq!(map.get_at(1), Ok((&20, &40)));
    /// assert!(map.get_at(3).is_err());
    /// ```
    #[inline]
    pub fn get_at(&self, pos: usize) -> Result<(&K, &V)> {
        let x = self.tree.node_at(pos)?;
        Ok(self.tree.node_ref(x, Node::entry))
    }

    /// Remove the entry at position `pos` in key order.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::InvalidPosition`](crate::TreeError::InvalidPosition)
    /// when `pos >= len()`; the map is left untouched.
    #[inline]
    pub fn remove_at(&mut self, pos: usize) -> Result<(K, V)> {
        self.tree.remove_at(pos)
    }

    /// Remove the entry under the cursor and return a cursor at the entry
    /// that followed it in the cursor's direction.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map: OrderedMap<_, _> = (1..=5).map(|k| (k, ())).collect();
    /// let mut cursor = map.begin();
    /// while !cursor.is_end() {
    ///     if map.key_at(cursor)? % 2 == 0 {
    ///         cursor = map.remove_cursor(cursor)?;
    ///     } else {
    ///         cursor = map.next_cursor(cursor)?;
    ///     }
    /// }
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
    /// # Ok::<(), rb_ordered::TreeError>(())
    /// ```
    #[inline]
    pub fn remove_cursor(&mut self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        self.tree.remove_cursor(cursor).map(|(next, _)| next)
    }

    /// Keep only the entries for which `f` returns `true`.
    #[inline]
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.tree.retain(f);
    }

    /// Height of the tree, for diagnostics.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

impl<K, V, C, Ix> OrderedMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Insert a key-value pair into the map.
    /// If the key exists, overwrite and return the previous value.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.tree.insert(key, value, None)
    }

    /// Insert with a hint: a cursor at the entry expected right after `key`.
    ///
    /// When the hint and its predecessor bracket `key`, the new node is
    /// attached without descending from the root, which makes loading sorted
    /// data cheap. A hint that does not bracket `key` is ignored.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(10, "ten");
    /// map.insert(30, "thirty");
    /// let hint = map.find(&30);
    /// map.insert_with_hint(20, "twenty", hint);
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!["ten", "twenty", "thirty"]);
    /// ```
    #[inline]
    pub fn insert_with_hint(&mut self, key: K, value: V, hint: Cursor<Ix>) -> Option<V> {
        let hint = self.tree.check_accessible(hint).ok();
        self.tree.insert(key, value, hint)
    }

    /// Remove a key from the map, returning the value at the key if the key exists
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    /// assert_eq!(map.remove(&3), None);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&2), Some(20));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove(key).map(|(_, v)| v)
    }

    /// Remove a key from the map, returning the stored key and value.
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.tree.remove(key)
    }

    /// Return reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree
            .find(key)
            .map(|x| self.tree.node_ref(x, Node::value))
    }

    /// Return a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree
            .find(key)
            .map(|x| self.tree.node_mut(x, Node::value_mut))
    }

    /// Return the stored key and its value.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree
            .find(key)
            .map(|x| self.tree.node_ref(x, Node::entry))
    }

    /// Return `true` if the map holds `key`.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.find(key).is_some()
    }

    /// Cursor at `key`, or [`end`](Self::end) when absent.
    #[inline]
    pub fn find(&self, key: &K) -> Cursor<Ix> {
        let x = self.tree.find(key).unwrap_or_else(NodeIndex::header);
        self.tree.cursor(x, Direction::Forward)
    }

    /// Cursor at the first key not less than `key`.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let map: OrderedMap<_, _> = [(1, ()), (3, ()), (5, ())].into_iter().collect();
    /// assert_eq!(map.key_at(map.lower_bound(&2)), Ok(&3));
    /// assert_eq!(map.key_at(map.lower_bound(&3)), Ok(&3));
    /// assert!(map.lower_bound(&6).is_end());
    /// ```
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.lower_bound(key), Direction::Forward)
    }

    /// Cursor at the first key greater than `key`.
    #[inline]
    pub fn upper_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.upper_bound(key), Direction::Forward)
    }

    /// Cursor at the last key not greater than `key`.
    #[inline]
    pub fn reverse_lower_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.reverse_lower_bound(key), Direction::Forward)
    }

    /// Cursor at the last key less than `key`.
    #[inline]
    pub fn reverse_upper_bound(&self, key: &K) -> Cursor<Ix> {
        self.tree.cursor(self.tree.reverse_upper_bound(key), Direction::Forward)
    }

    /// Replace the key under the cursor, keeping its value.
    ///
    /// The new key must sort strictly between the neighbouring keys; otherwise
    /// the map is left unchanged and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorAccess`](crate::TreeError::IteratorAccess)
    /// at the end position or for a cursor naming an erased element.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut map: OrderedMap<_, _> = [(10, 'a'), (20, 'b'), (30, 'c')].into_iter().collect();
    /// let cursor = map.find(&20);
    /// assert_eq!(map.update_key(cursor, 25), Ok(true));
    /// assert_eq!(map.update_key(cursor, 35), Ok(false));
    /// assert_eq!(map.get(&25), Some(&'b'));
    /// ```
    #[inline]
    pub fn update_key(&mut self, cursor: Cursor<Ix>, key: K) -> Result<bool> {
        self.tree.update_key(cursor, key)
    }

    /// Get the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::{Entry, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(0);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// map.entry(1).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, Ix> {
        match self.tree.locate(&key, None) {
            Slot::Occupied(node) => Entry::Occupied(OccupiedEntry {
                tree: &mut self.tree,
                node,
            }),
            Slot::Vacant(parent, side) => Entry::Vacant(VacantEntry {
                tree: &mut self.tree,
                key,
                parent,
                side,
            }),
        }
    }

    /// Insert every entry of `other`, in order, overwriting values of keys
    /// present in both. Returns the new length.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut a: OrderedMap<_, _> = [(1, 'a'), (3, 'c')].into_iter().collect();
    /// let b: OrderedMap<_, _> = [(2, 'b'), (3, 'C')].into_iter().collect();
    /// assert_eq!(a.union(&b), 3);
    /// assert_eq!(a.get(&3), Some(&'C'));
    /// ```
    pub fn union<C2, Ix2>(&mut self, other: &OrderedMap<K, V, C2, Ix2>) -> usize
    where
        K: Clone,
        V: Clone,
        Ix2: IndexType,
    {
        let before = self.len();
        for (key, value) in other.iter() {
            let _ignore = self.tree.insert(key.clone(), value.clone(), None);
        }
        tracing::debug!(before, merged = other.len(), after = self.len(), "union");
        self.len()
    }
}

impl<K, V, C, Ix> Index<&K> for OrderedMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, C, Ix> fmt::Debug for OrderedMap<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, Ix> PartialEq for OrderedMap<K, V, C, Ix>
where
    K: PartialEq,
    V: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C, Ix> Eq for OrderedMap<K, V, C, Ix>
where
    K: Eq,
    V: Eq,
    Ix: IndexType,
{
}

impl<K, V, C, Ix> Extend<(K, V)> for OrderedMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ignore = self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C, Ix> IntoIterator for OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a OrderedMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TreeError;

    fn map_of(keys: &[i32]) -> OrderedMap<i32, i32> {
        keys.iter().map(|&k| (k, k * 10)).collect()
    }

    fn keys_of(map: &OrderedMap<i32, i32>) -> Vec<i32> {
        map.keys().copied().collect()
    }

    #[test]
    fn insert_scattered_keys_iterates_sorted() {
        let map = map_of(&[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        assert_eq!(keys_of(&map), (1..=9).collect::<Vec<_>>());
        assert!(map.height() <= 6);
    }

    #[test]
    fn insert_increasing_keys_stays_balanced() {
        let map = map_of(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(map.len(), 8);
        assert!(map.height() <= 6);
    }

    #[test]
    fn erase_then_lower_bound_skips_removed_key() {
        let mut map = map_of(&[1, 2, 3, 4, 5]);
        assert_eq!(map.remove(&3), Some(30));
        assert_eq!(keys_of(&map), vec![1, 2, 4, 5]);
        assert_eq!(map.key_at(map.lower_bound(&3)), Ok(&4));
    }

    #[test]
    fn reverse_upper_bound_finds_strictly_smaller_key() {
        let map = map_of(&[10, 20, 30]);
        assert_eq!(map.key_at(map.reverse_upper_bound(&20)), Ok(&10));
        assert_eq!(map.key_at(map.reverse_lower_bound(&20)), Ok(&20));
        assert_eq!(map.key_at(map.reverse_lower_bound(&25)), Ok(&20));
        assert!(map.reverse_upper_bound(&10).is_end());
    }

    #[test]
    fn bounds_beyond_all_keys_return_end() {
        let map = map_of(&[1, 2, 3]);
        assert_eq!(map.lower_bound(&4), map.end());
        assert_eq!(map.upper_bound(&3), map.end());
        assert_eq!(map.key_at(map.upper_bound(&0)), Ok(&1));
    }

    #[test]
    fn front_and_back_follow_min_and_max() {
        let mut map = map_of(&[4, 2, 6]);
        assert_eq!(map.front(), Some((&2, &20)));
        assert_eq!(map.back(), Some((&6, &60)));
        map.insert(1, 10);
        map.insert(9, 90);
        assert_eq!(map.front(), Some((&1, &10)));
        assert_eq!(map.back(), Some((&9, &90)));
        assert_eq!(map.pop_front(), Some((1, 10)));
        assert_eq!(map.pop_back(), Some((9, 90)));
        assert_eq!(keys_of(&map), vec![2, 4, 6]);
    }

    #[test]
    fn erasing_last_element_resets_cursors() {
        let mut map = map_of(&[7]);
        assert_eq!(map.remove(&7), Some(70));
        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
        assert_eq!(map.front(), None);
        assert_eq!(map.key_at(map.begin()), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn cursor_walks_both_directions() {
        let map = map_of(&[1, 2, 3]);
        let mut cursor = map.begin();
        let mut seen = vec![];
        while !cursor.is_end() {
            seen.push(*map.key_at(cursor).unwrap());
            cursor = map.next_cursor(cursor).unwrap();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(map.next_cursor(cursor), Err(TreeError::IteratorAccess));

        let back = map.prev_cursor(map.end()).unwrap();
        assert_eq!(map.key_at(back), Ok(&3));
        assert_eq!(map.prev_cursor(map.begin()), Err(TreeError::IteratorAccess));

        let mut cursor = map.rbegin();
        let mut seen = vec![];
        while !cursor.is_end() {
            seen.push(*map.key_at(cursor).unwrap());
            cursor = map.next_cursor(cursor).unwrap();
        }
        assert_eq!(seen, vec![3, 2, 1]);
        assert_eq!(map.key_at(map.prev_cursor(map.rend()).unwrap()), Ok(&1));
        assert_eq!(map.prev_cursor(map.rbegin()), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn retreating_on_empty_map_fails() {
        let map: OrderedMap<i32, ()> = OrderedMap::new();
        assert_eq!(map.prev_cursor(map.end()), Err(TreeError::IteratorAccess));
        assert_eq!(map.next_cursor(map.end()), Err(TreeError::IteratorAccess));
        assert_eq!(map.prev_cursor(map.rend()), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn writing_through_cursor_changes_only_the_value() {
        let mut map = map_of(&[1, 2, 3]);
        let cursor = map.find(&2);
        *map.value_at_mut(cursor).unwrap() = 99;
        assert_eq!(map.get(&2), Some(&99));
        assert_eq!(map.value_at_mut(map.end()), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn remove_cursor_returns_following_element() {
        let mut map = map_of(&(0..32).collect::<Vec<_>>());
        let cursor = map.find(&10);
        let next = map.remove_cursor(cursor).unwrap();
        assert_eq!(map.key_at(next), Ok(&11));

        let reverse = map.find(&20).reversed();
        let next = map.remove_cursor(reverse).unwrap();
        assert_eq!(map.key_at(next), Ok(&19));

        let last = map.find(&31);
        assert!(map.remove_cursor(last).unwrap().is_end());
        assert_eq!(map.remove_cursor(map.end()), Err(TreeError::IteratorAccess));
        assert_eq!(map.len(), 29);
    }

    #[test]
    fn erased_cursor_is_rejected() {
        let mut map = map_of(&[1]);
        let cursor = map.find(&1);
        map.remove(&1);
        assert_eq!(map.key_at(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.next_cursor(cursor), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn erased_cursor_is_rejected_after_slot_reuse() {
        let mut map = map_of(&[1, 2]);
        let cursor = map.find(&1);
        map.remove(&1);
        map.insert(50, 500);
        assert_eq!(map.key_at(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.value_at(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.next_cursor(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.rank(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.remove_cursor(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.update_key(cursor, 3), Err(TreeError::IteratorAccess));
        assert_eq!(keys_of(&map), [2, 50]);

        // a fresh cursor at the reused slot works, the stale one is ignored as a hint
        let fresh = map.find(&50);
        assert_eq!(map.key_at(fresh), Ok(&50));
        assert_eq!(map.insert_with_hint(40, 400, cursor), None);
        assert_eq!(keys_of(&map), [2, 40, 50]);
    }

    #[test]
    fn cleared_cursor_is_rejected() {
        let mut map = map_of(&[1, 2, 3]);
        let cursor = map.find(&2);
        map.clear();
        map.extend([(7, 70), (8, 80), (9, 90)]);
        assert_eq!(map.key_at(cursor), Err(TreeError::IteratorAccess));
        assert_eq!(map.key_at(map.begin()), Ok(&7));
    }

    #[test]
    fn update_key_checks_neighbours() {
        let mut map = map_of(&[10, 20, 30]);
        let first = map.begin();
        assert_eq!(map.update_key(first, 5), Ok(true));
        assert_eq!(map.update_key(first, 20), Ok(false));
        assert_eq!(map.update_key(map.rbegin(), 31), Ok(true));
        assert_eq!(keys_of(&map), vec![5, 20, 31]);
        assert_eq!(map.update_key(map.end(), 0), Err(TreeError::IteratorAccess));
    }

    #[test]
    fn positional_access_without_index_scans() {
        let mut map = map_of(&[3, 1, 2]);
        assert!(!map.is_indexed());
        assert_eq!(map.get_at(0), Ok((&1, &10)));
        assert_eq!(map.get_at(2), Ok((&3, &30)));
        assert_eq!(
            map.get_at(3),
            Err(TreeError::InvalidPosition { pos: 3, len: 3 })
        );
        assert_eq!(map.rank(map.find(&3)), Ok(2));
        assert_eq!(map.rank(map.end()), Ok(3));
        assert_eq!(map.remove_at(1), Ok((2, 20)));
        assert_eq!(
            map.remove_at(2),
            Err(TreeError::InvalidPosition { pos: 2, len: 2 })
        );
        assert_eq!(keys_of(&map), vec![1, 3]);
    }

    #[test]
    fn hinted_insert_keeps_order() {
        let mut map = OrderedMap::new();
        map.insert(0, ());
        map.insert(1000, ());
        let mut hint = map.find(&1000);
        for k in (1..1000).rev() {
            map.insert_with_hint(k, (), hint);
            hint = map.find(&k);
        }
        assert_eq!(map.len(), 1001);
        assert!(map.keys().copied().eq(0..=1000));
        // a hint that does not bracket the key falls back to a search
        map.insert_with_hint(5000, (), map.begin());
        map.insert_with_hint(-1, (), map.end());
        assert_eq!(map.front(), Some((&-1, &())));
        assert_eq!(map.back(), Some((&5000, &())));
    }

    #[test]
    fn retain_drops_rejected_entries() {
        let mut map = map_of(&(0..20).collect::<Vec<_>>());
        map.retain(|k, v| {
            *v += 1;
            k % 3 == 0
        });
        assert_eq!(keys_of(&map), vec![0, 3, 6, 9, 12, 15, 18]);
        assert_eq!(map[&3], 31);
    }

    #[test]
    fn union_reinserts_other_in_order() {
        let mut a = map_of(&[1, 3, 5]);
        let b = map_of(&[2, 3, 4]);
        assert_eq!(a.union(&b), 5);
        assert_eq!(keys_of(&a), vec![1, 2, 3, 4, 5]);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn iter_is_double_ended_and_restartable() {
        let map = map_of(&[2, 1, 3]);
        let mut iter = map.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some((&1, &10)));
        assert_eq!(iter.next_back(), Some((&3, &30)));
        assert_eq!(iter.next(), Some((&2, &20)));
        assert_eq!(iter.next(), None);
        assert_eq!(map.iter().count(), 3);
        let owned: Vec<_> = map.clone().into_iter().rev().collect();
        assert_eq!(owned, vec![(3, 30), (2, 20), (1, 10)]);
    }

    #[test]
    fn debug_and_eq_use_key_order() {
        let a = map_of(&[2, 1]);
        let b = map_of(&[1, 2]);
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), "{1: 10, 2: 20}");
    }
}

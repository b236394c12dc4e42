use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::tree::{RbTree, Side};

/// A view into a single entry in a map, which may either be vacant or occupied.
pub enum Entry<'a, K, V, C, Ix> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C, Ix>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C, Ix>),
}

/// A view into an occupied entry in an `OrderedMap`.
/// It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V, C, Ix> {
    /// Reference to the tree
    pub(crate) tree: &'a mut RbTree<K, V, C, Ix>,
    /// The entry node
    pub(crate) node: NodeIndex<Ix>,
}

/// A view into a vacant entry in an `OrderedMap`.
/// It is part of the [`Entry`] enum.
///
/// The attachment point found while looking the key up is kept, so inserting
/// does not search the tree a second time.
pub struct VacantEntry<'a, K, V, C, Ix> {
    /// Mutable reference to the tree
    pub(crate) tree: &'a mut RbTree<K, V, C, Ix>,
    /// The key of this entry
    pub(crate) key: K,
    /// Node under which the key will be attached, the header for an empty tree
    pub(crate) parent: NodeIndex<Ix>,
    /// Free child slot of `parent`
    pub(crate) side: Side,
}

impl<'a, K, V, C, Ix> Entry<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::{Entry, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(matches!(map.entry("a"), Entry::Vacant(_)));
    /// map.entry("a").or_insert(3);
    /// assert!(matches!(map.entry("a"), Entry::Occupied(_)));
    /// assert_eq!(map.get(&"a"), Some(&3));
    /// ```
    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of `default`
    /// if empty, and returns a mutable reference to the value in the entry.
    #[inline]
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Ensures a value is in the entry by inserting `V::default()` if empty.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::OrderedMap;
    ///
    /// let mut counts: OrderedMap<char, usize> = OrderedMap::new();
    /// for c in "abracadabra".chars() {
    ///     *counts.entry(c).or_default() += 1;
    /// }
    /// assert_eq!(counts[&'a'], 5);
    /// assert_eq!(counts.keys().collect::<String>(), "abcdr");
    /// ```
    #[inline]
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Example
    /// ```rust
    /// use rb_ordered::{Entry, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// map.insert(6, 3);
    /// assert!(matches!(map.entry(6), Entry::Occupied(_)));
    /// map.entry(6).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&6), Some(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Entry::Vacant(entry) => Self::Vacant(entry),
        }
    }

    /// The key of this entry.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V, C, Ix> OccupiedEntry<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    /// The stored key.
    #[inline]
    pub fn key(&self) -> &K {
        self.tree.node_ref(self.node, Node::key)
    }

    #[inline]
    pub fn get(&self) -> &V {
        self.tree.node_ref(self.node, Node::value)
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.node_mut(self.node, Node::value_mut)
    }

    /// Converts the entry into a mutable reference bound to the map's lifetime.
    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.node_mut(self.node, Node::value_mut)
    }

    /// Replace the value, returning the old one.
    #[inline]
    pub fn insert(&mut self, value: V) -> V {
        self.tree.node_mut(self.node, Node::set_value(value))
    }

    /// Take the entry out of the map.
    #[inline]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.erase(self.node)
    }

    /// Take the value out of the map.
    #[inline]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

impl<'a, K, V, C, Ix> VacantEntry<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    /// The key that would be inserted.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert `value` under the entry's key and return a mutable reference to it.
    #[inline]
    pub fn insert(self, value: V) -> &'a mut V {
        let tree = self.tree;
        let x = tree.attach(self.parent, self.side, self.key, value);
        tree.node_mut(x, Node::value_mut)
    }
}

/// Construction-time options of a tree.
///
/// # Example
/// ```rust
/// use rb_ordered::{OrderedMap, TreeConfig};
///
/// let map: OrderedMap<u32, &str> = OrderedMap::with_config(TreeConfig::new().indexed(true));
/// assert!(map.is_indexed());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    /// Keep subtree sizes so positional access and ranks run in `O(logN)`.
    pub enable_index: bool,
    /// Number of nodes to reserve up front.
    pub capacity: usize,
}

impl TreeConfig {
    /// Default options: no indexing, no reserved capacity.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enable_index: false,
            capacity: 0,
        }
    }

    /// Enable or disable order-statistics indexing.
    #[inline]
    #[must_use]
    pub const fn indexed(mut self, enable_index: bool) -> Self {
        self.enable_index = enable_index;
        self
    }

    /// Reserve room for `capacity` nodes.
    #[inline]
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

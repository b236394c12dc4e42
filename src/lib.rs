//! `rb_ordered` provides an ordered map and an ordered set based on a red-black tree.
//!
//! Both containers implement the insertion and deletion functionality of a
//! red-black tree, so each modification requires at most O(logN) time.
//!
//! Nodes are kept in an array and reference each other by index, with a
//! header slot that caches the minimum and maximum node. Reading either end
//! is O(1), and so is insertion at either end before rebalancing. Erased
//! slots are reused, and a live node never changes its slot, which lets a
//! [`Cursor`] stay valid across unrelated insertions and removals.
//!
//! Order statistics (`get_at`, `remove_at`, `rank`) are available on every
//! container; enabling [`TreeConfig::indexed`] keeps subtree sizes so they
//! run in O(logN) instead of O(N).
//!
//! # Example
//!
//! ```rust
//! use rb_ordered::{OrderedMap, TreeConfig};
//!
//! let mut map = OrderedMap::with_config(TreeConfig::new().indexed(true));
//! for (k, v) in [(5, "e"), (1, "a"), (3, "c")] {
//!     map.insert(k, v);
//! }
//! assert_eq!(map.get(&3), Some(&"c"));
//! assert_eq!(map.front(), Some((&1, &"a")));
//! assert_eq!(map.get_at(2), Ok((&5, &"e")));
//!
//! let cursor = map.lower_bound(&2);
//! assert_eq!(map.key_at(cursor), Ok(&3));
//! assert_eq!(map.rank(cursor), Ok(1));
//! ```
//!

mod compare;
mod config;
mod cursor;
#[cfg(feature = "graphviz")]
mod draw;
mod entry;
mod error;
mod index;
mod iter;
mod map;
mod node;
#[cfg(feature = "serde")]
mod serde_impl;
mod set;
mod tree;


pub use compare::{Comparator, Natural};
pub use config::TreeConfig;
pub use cursor::{Cursor, Direction};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Result, TreeError};
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::{IntoIter, Iter, Keys, Values};
pub use map::OrderedMap;
pub use set::{OrderedSet, SetIntoIter, SetIter};

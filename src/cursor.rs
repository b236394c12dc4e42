//! Position handles into an ordered container.
//!
//! A [`Cursor`] names a node and a traversal direction. It owns nothing and
//! borrows nothing, so it survives mutations of the container; every read,
//! write or movement goes through the container that produced it. A cursor
//! stays meaningful as long as the element it names is not erased. Once it
//! is, the container rejects the cursor even after the slot is reused.

use crate::index::{DefaultIx, IndexType, NodeIndex};

/// Traversal direction of a [`Cursor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending key order
    Forward,
    /// Descending key order
    Reverse,
}

/// A position in an ordered container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor<Ix = DefaultIx> {
    pub(crate) node: NodeIndex<Ix>,
    /// Generation of the slot when the cursor was made
    pub(crate) generation: u32,
    pub(crate) direction: Direction,
}

impl<Ix: IndexType> Cursor<Ix> {
    pub(crate) fn new(node: NodeIndex<Ix>, generation: u32, direction: Direction) -> Self {
        Self {
            node,
            generation,
            direction,
        }
    }

    /// Traversal direction of this cursor.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the cursor sits at the end position (`end()` or `rend()`).
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_header()
    }

    /// Whether the cursor can be dereferenced.
    #[inline]
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        !self.is_end()
    }

    /// The same position traversed in the other direction.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        let direction = match self.direction {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        };
        Self { direction, ..*self }
    }
}

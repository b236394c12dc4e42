use std::fmt;
use std::hash::Hash;

pub type DefaultIx = u32;

/// Integer type used to address nodes in the arena.
///
/// # Safety
///
/// `new(x).index()` must return `x` for every `x` below `max().index()`.
pub unsafe trait IndexType: Copy + Default + Hash + Ord + fmt::Debug + 'static {
    fn new(x: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

macro_rules! index_type {
    ($t:ty) => {
        unsafe impl IndexType for $t {
            #[inline(always)]
            #[allow(clippy::cast_possible_truncation)]
            fn new(x: usize) -> Self {
                x as $t
            }
            #[inline(always)]
            fn index(&self) -> usize {
                *self as usize
            }
            #[inline(always)]
            fn max() -> Self {
                <$t>::MAX
            }
        }
    };
}

index_type!(u16);
index_type!(u32);
index_type!(usize);

/// Node identifier.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct NodeIndex<Ix = DefaultIx>(Ix);

impl<Ix: IndexType> NodeIndex<Ix> {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    /// The header slot, which is always the first one in the arena.
    #[inline]
    pub fn header() -> Self {
        NodeIndex::new(0)
    }

    #[inline]
    pub fn is_header(self) -> bool {
        self.index() == 0
    }

    /// Reserved index, never handed out to a node.
    #[inline]
    pub fn end() -> Self {
        NodeIndex(IndexType::max())
    }
}

impl<Ix: fmt::Debug> fmt::Debug for NodeIndex<Ix> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeIndex({:?})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_is_slot_zero() {
        let header = NodeIndex::<u32>::header();
        assert!(header.is_header());
        assert_eq!(header.index(), 0);
        assert!(!NodeIndex::<u32>::new(3).is_header());
    }

    #[test]
    fn end_is_the_maximum_index() {
        assert_eq!(NodeIndex::<u16>::end().index(), u16::MAX as usize);
        assert_eq!(NodeIndex::<usize>::end().index(), usize::MAX);
    }
}

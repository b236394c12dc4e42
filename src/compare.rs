//! Total orders over keys.
//!
//! A tree never compares keys directly: every descent goes through a
//! [`Comparator`]. [`Natural`] defers to [`Ord`], and any
//! `Fn(&K, &K) -> Ordering` closure can be used for a custom order.

use std::cmp::Ordering;

/// A total order over `K`.
pub trait Comparator<K: ?Sized> {
    /// Compare two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural order of `K`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_follows_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn closure_is_a_comparator() {
        let rev = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(rev.compare(&1, &2), Ordering::Greater);
        assert_eq!(rev.compare(&2, &2), Ordering::Equal);
    }
}

//! Orderings that decide which element of a priority queue comes out first.
//!
//! A comparator answers one question: is `a` strictly more extreme than `b`?
//! The element that never loses such a comparison is the top of the queue.
//! Every comparator has to impose a strict weak ordering on the elements,
//! otherwise the heaps of this crate silently yield elements out of order.

/// Represents the ordering used by the priority queues of this crate.
///
/// A user can use a custom ordering by implementing this trait or by
/// wrapping a closure with [`from_fn`].
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `a` has strictly higher priority than `b`.
    fn precedes(&self, a: &T, b: &T) -> bool;
}

/// Smaller elements come first. This turns a heap into a min-heap.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MinFirst;

impl<T> Compare<T> for MinFirst
where
    T: Ord + ?Sized,
{
    #[inline]
    fn precedes(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Greater elements come first. This turns a heap into a max-heap.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MaxFirst;

impl<T> Compare<T> for MaxFirst
where
    T: Ord + ?Sized,
{
    #[inline]
    fn precedes(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Adapts a closure `f(a, b)` that returns `true` if `a` comes before `b`.
#[derive(Debug, Copy, Clone)]
pub struct FnCompare<F>(F);

impl<T, F> Compare<T> for FnCompare<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn precedes(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Creates a comparator out of the given closure.
///
/// ```
/// use pairing_pq::{compare, PairingHeap};
///
/// let by_number = compare::from_fn(|a: &(u32, char), b: &(u32, char)| a.0 > b.0);
/// let mut heap = PairingHeap::with_compare(by_number);
/// heap.push((1u32, 'a'));
/// heap.push((7, 'b'));
/// assert_eq!(heap.peek(), Some(&(7, 'b')));
/// ```
pub fn from_fn<T, F>(f: F) -> FnCompare<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool,
{
    FnCompare(f)
}

//! A binary heap stored densely within a `Vec`.
//!
//! The baseline priority queue of this crate. It does not issue handles and
//! thus cannot raise the priority of a single stored element, but it is fast
//! and compact.

use std::iter::FromIterator;
use std::slice;

use tracing::trace;
use unreachable::UncheckedOptionExt;

use crate::compare::{Compare, MinFirst};
use crate::queue::PriorityQueue;

/// A priority queue implemented as an implicit binary tree.
///
/// Index 0 always holds the most extreme element. For every index `i > 0` the
/// element at `i` is never more extreme than its parent at `(i - 1) / 2`.
/// Ties are broken arbitrarily by position.
#[derive(Debug, Clone)]
pub struct BinaryHeap<T, C = MinFirst> {
    data: Vec<T>,
    cmp: C,
}

impl<T> BinaryHeap<T> {
    /// Creates a new min-heap.
    #[inline]
    pub fn new() -> Self {
        BinaryHeap::with_compare(MinFirst)
    }
}

impl<T, C> BinaryHeap<T, C> {
    /// Creates a new `BinaryHeap` ordered by the given comparator.
    #[inline]
    pub fn with_compare(cmp: C) -> Self {
        BinaryHeap::with_capacity_and_compare(0, cmp)
    }

    /// Creates a new `BinaryHeap` with room for `capacity` elements.
    #[inline]
    pub fn with_capacity_and_compare(capacity: usize, cmp: C) -> Self {
        BinaryHeap {
            data: Vec::with_capacity(capacity),
            cmp: cmp,
        }
    }

    /// Returns the number of elements stored in this `BinaryHeap`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if this `BinaryHeap` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drops all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns a reference to the most extreme element if not empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns a reference to the most extreme element.
    ///
    /// Does not check for emptiness so use it carefully!
    #[inline]
    pub unsafe fn peek_unchecked(&self) -> &T {
        self.data.get_unchecked(0)
    }

    /// Iterate over the values in this `BinaryHeap` in unspecified order.
    #[inline]
    pub fn values(&self) -> slice::Iter<T> {
        self.data.iter()
    }

    /// Iterate over the values in this `BinaryHeap` by mutable reference in unspecified order.
    ///
    /// Call `rebuild_all` afterwards if priorities were changed.
    #[inline]
    pub fn values_mut(&mut self) -> slice::IterMut<T> {
        self.data.iter_mut()
    }

    /// Consumes the heap and returns the underlying vector in heap order.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T, C> BinaryHeap<T, C>
where
    C: Compare<T>,
{
    /// Creates a heap out of the given vector in O(n).
    pub fn from_vec_with_compare(vec: Vec<T>, cmp: C) -> Self {
        let mut heap = BinaryHeap { data: vec, cmp: cmp };
        heap.rebuild_all();
        heap
    }

    #[inline]
    fn precedes(&self, fst: usize, snd: usize) -> bool {
        self.cmp.precedes(&self.data[fst], &self.data[snd])
    }

    /// Moves the element at `pos` up until its parent is at least as extreme.
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.precedes(pos, parent) {
                break;
            }
            self.data.swap(pos, parent);
            pos = parent;
        }
    }

    /// Moves the element at `pos` down until no child is more extreme.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let best = if right < len && self.precedes(right, left) {
                right
            } else {
                left
            };
            if !self.precedes(best, pos) {
                break;
            }
            self.data.swap(pos, best);
            pos = best;
        }
    }

    /// Inserts the given element into the `BinaryHeap`.
    pub fn push(&mut self, elem: T) {
        self.data.push(elem);
        let last = self.len() - 1;
        self.sift_up(last);
    }

    /// Removes the most extreme element within this `BinaryHeap` and returns it.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        match self.is_empty() {
            true => None,
            _ => unsafe { Some(self.pop_unchecked()) },
        }
    }

    /// Removes the most extreme element without checking for emptiness and returns it.
    ///
    /// So use this method carefully!
    pub unsafe fn pop_unchecked(&mut self) -> T {
        let mut top = self.data.pop().unchecked_unwrap();
        if !self.is_empty() {
            ::std::mem::swap(&mut top, self.data.get_unchecked_mut(0));
            self.sift_down(0);
        }
        top
    }

    /// Re-establishes the heap order after elements were mutated in place
    /// through `values_mut`.
    ///
    /// Sifts down every internal node starting with the last one, O(n).
    pub fn rebuild_all(&mut self) {
        for pos in (0..self.len() / 2).rev() {
            self.sift_down(pos);
        }
        trace!(len = self.len(), "rebuilt binary heap");
    }

    /// Consumes the heap and returns its elements in sorted order, most extreme first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(elem) = self.pop() {
            sorted.push(elem);
        }
        sorted
    }
}

impl<T, C> Default for BinaryHeap<T, C>
where
    C: Default,
{
    fn default() -> Self {
        BinaryHeap::with_compare(C::default())
    }
}

impl<T, C> FromIterator<T> for BinaryHeap<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        BinaryHeap::from_vec_with_compare(iter.into_iter().collect(), C::default())
    }
}

impl<T, C> Extend<T> for BinaryHeap<T, C>
where
    C: Compare<T>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for elem in iter {
            self.push(elem);
        }
    }
}

impl<T, C> PriorityQueue<T> for BinaryHeap<T, C>
where
    C: Compare<T>,
{
    #[inline]
    fn len(&self) -> usize {
        BinaryHeap::len(self)
    }

    #[inline]
    fn push(&mut self, elem: T) {
        BinaryHeap::push(self, elem)
    }

    #[inline]
    fn peek(&self) -> Option<&T> {
        BinaryHeap::peek(self)
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        BinaryHeap::pop(self)
    }

    fn rebuild_all(&mut self) {
        BinaryHeap::rebuild_all(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MaxFirst;
    use proptest::prelude::*;

    impl<T, C> BinaryHeap<T, C>
    where
        C: Compare<T>,
    {
        fn assert_valid(&self) {
            for pos in 1..self.len() {
                assert!(
                    !self.precedes(pos, (pos - 1) / 2),
                    "element at {} precedes its parent",
                    pos
                );
            }
        }
    }

    #[test]
    fn push_peek_pop() {
        let mut bh = BinaryHeap::new();
        for &elem in &[5, 3, 8, 1] {
            bh.push(elem);
            bh.assert_valid();
        }
        assert_eq!(bh.len(), 4);
        assert_eq!(bh.peek(), Some(&1));
        assert_eq!(bh.pop(), Some(1));
        assert_eq!(bh.peek(), Some(&3));
        bh.push(0);
        assert_eq!(bh.peek(), Some(&0));
        assert_eq!(bh.pop(), Some(0));
        assert_eq!(bh.pop(), Some(3));
        assert_eq!(bh.pop(), Some(5));
        assert_eq!(bh.pop(), Some(8));
        assert!(bh.is_empty());
        assert_eq!(bh.pop(), None);
        assert_eq!(bh.peek(), None);
    }

    #[test]
    fn unchecked_access() {
        let mut bh: BinaryHeap<i32> = vec![9, 4, 6].into_iter().collect();
        unsafe {
            assert_eq!(*bh.peek_unchecked(), 4);
            assert_eq!(bh.pop_unchecked(), 4);
            assert_eq!(bh.pop_unchecked(), 6);
            assert_eq!(bh.pop_unchecked(), 9);
        }
        assert!(bh.is_empty());
    }

    #[test]
    fn from_vec() {
        let bh = BinaryHeap::from_vec_with_compare(vec![7, 2, 9, 4, 4, 1, 8], MinFirst);
        bh.assert_valid();
        assert_eq!(bh.into_sorted_vec(), vec![1, 2, 4, 4, 7, 8, 9]);
    }

    #[test]
    fn into_vec() {
        let bh = BinaryHeap::from_vec_with_compare(vec![7, 2, 9, 4], MaxFirst);
        let mut vec = bh.into_vec();
        assert_eq!(vec[0], 9);
        vec.sort();
        assert_eq!(vec, vec![2, 4, 7, 9]);
    }

    #[test]
    fn rebuild_all() {
        let mut bh: BinaryHeap<i32> = vec![1, 2, 3, 4, 5].into_iter().collect();
        for elem in bh.values_mut() {
            *elem = 10 - *elem;
        }
        bh.rebuild_all();
        bh.assert_valid();
        assert_eq!(bh.peek(), Some(&5));
        assert_eq!(bh.into_sorted_vec(), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn max_first() {
        let mut bh = BinaryHeap::with_compare(MaxFirst);
        bh.extend(vec![3, 1, 4, 1, 5, 9, 2, 6]);
        bh.assert_valid();
        assert_eq!(bh.peek(), Some(&9));
        assert_eq!(bh.into_sorted_vec(), vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: BinaryHeap<i32> = vec![5, 3, 8].into_iter().collect();
        let mut b = a.clone();
        b.push(0);
        assert_eq!(a.peek(), Some(&3));
        a.pop();
        assert_eq!(b.len(), 4);
        assert_eq!(b.peek(), Some(&0));
        b.clear();
        assert_eq!(a.len(), 2);
    }

    proptest! {
        #[test]
        fn heap_order_holds(ops in prop::collection::vec((any::<bool>(), any::<i32>()), 0..300)) {
            let mut bh = BinaryHeap::with_compare(MaxFirst);
            let mut pushes = 0;
            let mut pops = 0;
            for (should_pop, elem) in ops {
                if should_pop {
                    if bh.pop().is_some() {
                        pops += 1;
                    }
                } else {
                    bh.push(elem);
                    pushes += 1;
                }
                bh.assert_valid();
                prop_assert_eq!(bh.len(), pushes - pops);
            }
        }

        #[test]
        fn rebuild_all_after_arbitrary_mutation(
            elems in prop::collection::vec(any::<i32>(), 0..200),
            seed in any::<i32>(),
        ) {
            let mut bh: BinaryHeap<i32> = elems.into_iter().collect();
            for (i, elem) in bh.values_mut().enumerate() {
                *elem = elem.wrapping_mul(31).wrapping_add(seed ^ i as i32);
            }
            let mut expected: Vec<i32> = bh.values().cloned().collect();
            expected.sort();
            bh.rebuild_all();
            bh.assert_valid();
            prop_assert_eq!(bh.into_sorted_vec(), expected);
        }
    }
}

//! The priority queue contract shared by every heap of this crate.

/// Base trait for the priority queues of this crate.
///
/// Both [`BinaryHeap`](crate::BinaryHeap) and [`PairingHeap`](crate::PairingHeap)
/// implement this trait with identical semantics. Which element is "on top"
/// is decided by the queue's [`Compare`](crate::compare::Compare) implementation.
pub trait PriorityQueue<T> {
    /// Returns the number of elements stored in this queue.
    fn len(&self) -> usize;

    /// Returns true if this queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts the given element into this queue.
    fn push(&mut self, elem: T);

    /// Returns a reference to the most extreme element if not empty.
    fn peek(&self) -> Option<&T>;

    /// Removes the most extreme element and returns it.
    fn pop(&mut self) -> Option<T>;

    /// Re-establishes the heap order after elements were mutated in place.
    fn rebuild_all(&mut self);
}

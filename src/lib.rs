#![deny(unused_imports)]
#![deny(missing_docs)]
#![cfg_attr(all(feature = "bench", test), feature(test))]

//! Priority queues for Rust with interchangeable implementations.
//!
//! Two heaps share the [`PriorityQueue`] contract:
//!
//! - [`BinaryHeap`] stores its elements densely within a `Vec` using the
//!   classic sift-up and sift-down algorithms.
//! - [`PairingHeap`] is addressable: inserting elements returns handles that
//!   make it possible to query and edit them later on. For example this allows
//!   for the `update_priority(h: Handle, elem: T)` method that raises the
//!   priority of the element associated with the given handle.
//!
//! The pairing heap stores its nodes within a `Stash` that allocates nodes
//! densely within an array, so nodes never move once they are inserted.
//!
//! Which element comes out first is decided by a [`Compare`] implementation.
//! By default both heaps are min-heaps.
//!
//! ```
//! use pairing_pq::PairingHeap;
//!
//! let mut heap = PairingHeap::new();
//! heap.push(10);
//! heap.push(20);
//! let h = heap.push(30);
//! heap.update_priority(h, 5);
//! assert_eq!(heap.peek(), Some(&5));
//! ```

#[cfg(all(feature = "bench", test))]
extern crate test;

pub mod binary_heap;
pub mod compare;
pub mod pairing_heap;
mod queue;

pub use binary_heap::BinaryHeap;
pub use compare::{Compare, MaxFirst, MinFirst};
pub use pairing_heap::{Handle, PairingHeap};
pub use queue::PriorityQueue;

/// Errors that can be caused while using `PairingHeap`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Caused when a handle does not address an element of the heap (anymore).
    #[error("no element found for the given handle")]
    InvalidHandle,
    /// Caused when using `try_update_priority` with an element that does not
    /// strictly precede the one stored behind the handle.
    #[error("new element does not have a higher priority than the current one")]
    PriorityNotRaised,
}

/// Generic `Result` type for `PairingHeap` methods.
pub type Result<T> = ::std::result::Result<T, Error>;

//! An addressable pairing heap.
//!
//! Addressable heaps return handles to stored elements that make it possible
//! to query and edit them. For example this allows for the
//! `update_priority(h: Handle, elem: T)` method that raises the priority of
//! the element that is associated with the given handle.
//!
//! Nodes are stored within a `Stash` that allocates them densely within an
//! array. A node never moves once it has been inserted, only the links between
//! nodes change, so handles stay valid until their element is popped.
//!
//! Every node knows its first child, its next sibling and a back-reference
//! `prev` that is either its parent (for a first child) or its previous
//! sibling. Only `child` and `sibling` links describe ownership of subtrees.

use std::collections::VecDeque;
use std::iter::FromIterator;
use std::mem;
use std::ops::{Index, IndexMut};

use stash::Stash;
use tracing::{debug, trace};
use unreachable::UncheckedOptionExt;

use crate::compare::{Compare, MinFirst};
use crate::queue::PriorityQueue;
use crate::{Error, Result};

/// A handle to access stored elements within an addressable pairing heap.
///
/// Handles are local to the heap that returned them. A handle stays valid
/// until its element is popped or the heap is cleared; it survives
/// `rebuild_all` and `update_priority`. It is never valid against a clone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl From<usize> for Handle {
    fn from(val: usize) -> Handle {
        Handle(val)
    }
}

impl From<Handle> for usize {
    fn from(handle: Handle) -> usize {
        handle.0
    }
}

#[derive(Debug)]
struct Node<T> {
    elem: T,
    /// First child, owning.
    child: Option<Handle>,
    /// Next sibling within the parent's child list, owning.
    sibling: Option<Handle>,
    /// Parent if this is a first child, previous sibling otherwise.
    prev: Option<Handle>,
}

impl<T> Node<T> {
    #[inline]
    fn new(elem: T) -> Self {
        Node {
            elem: elem,
            child: None,
            sibling: None,
            prev: None,
        }
    }

    #[inline]
    fn is_root(&self) -> bool {
        self.prev.is_none() && self.sibling.is_none()
    }
}

/// An addressable pairing heap implementation.
///
/// Inserting elements into this data structure provides the caller with handles
/// that make accessing the elements possible - this is called "addressable".
/// Handles are always local to the associated pairing heap instance and thus should not be
/// exchanged throughout various instances of pairing heaps.
///
/// The order of elements is defined by the comparator `C`, by default the
/// smallest element is on top.
///
/// A special feature of addressable pairing heaps is the possibility to explicitly
/// raise the priority of an already stored element with the `update_priority`
/// operation.
#[derive(Debug)]
pub struct PairingHeap<T, C = MinFirst> {
    /// Handle to the most extreme element within the pairing heap.
    root: Option<Handle>,

    /// In the ```data``` stash all nodes are stored.
    /// This indirection to the real data allows for efficient addressable elements via handles.
    data: Stash<Node<T>, Handle>,

    cmp: C,
}

impl<T> PairingHeap<T> {
    /// Creates a new min-heap.
    #[inline]
    pub fn new() -> Self {
        PairingHeap::with_compare(MinFirst)
    }
}

impl<T, C> PairingHeap<T, C> {
    /// Creates a new instance of a `PairingHeap` ordered by the given comparator.
    #[inline]
    pub fn with_compare(cmp: C) -> Self {
        PairingHeap {
            root: None,
            data: Stash::default(),
            cmp: cmp,
        }
    }

    /// Returns the number of elements stored in this `PairingHeap`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if this `PairingHeap` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops all elements. Every handle issued so far becomes invalid.
    pub fn clear(&mut self) {
        trace!(len = self.len(), "clearing pairing heap");
        self.root = None;
        self.data.clear();
    }

    /// Returns a reference to the comparator of this heap.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns a reference to the `Node` that is associated with the given handle.
    /// Note that this won't fail on usage for a correct implementation of `PairingHeap`.
    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        unsafe { self.data.get_unchecked(handle) }
    }

    /// Returns a mutable reference to the `Node` that is associated with the given handle.
    /// Note that this won't fail on usage for a correct implementation of `PairingHeap`.
    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        unsafe { self.data.get_unchecked_mut(handle) }
    }

    /// Links the given `lower` tree under the given `upper` tree thus making `lower`
    /// the first child of `upper`.
    fn link(&mut self, upper: Handle, lower: Handle) {
        debug_assert!(upper != lower, "cannot link to self!");
        debug_assert!(self.node(lower).is_root(), "lower cannot have multiple parents!");

        let first = self.node(upper).child;
        if let Some(first) = first {
            self.node_mut(first).prev = Some(lower);
        }
        {
            let lower_node = self.node_mut(lower);
            lower_node.sibling = first;
            lower_node.prev = Some(upper);
        }
        self.node_mut(upper).child = Some(lower);
    }

    /// Iterates over the handles of all nodes reachable from the root.
    fn walk(&self) -> Walk<T, C> {
        Walk {
            heap: self,
            pending: self.root.into_iter().collect(),
        }
    }

    /// Returns true if the given handle addresses an element of this heap.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.data.get(handle).is_some()
    }

    /// Returns a reference to the element associated with the given handle.
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.data.get(handle).map(|node| &node.elem)
    }

    /// Returns a mutable reference to the element associated with the given handle.
    ///
    /// Changing the priority of the element through this reference breaks the
    /// heap order until `rebuild_all` is called.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.data.get_mut(handle).map(|node| &mut node.elem)
    }

    /// Returns a reference to the most extreme element if not empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.root.map(|root| &self.node(root).elem)
    }

    /// Returns a reference to the most extreme element.
    ///
    /// Does not check for emptiness so use it carefully!
    #[inline]
    pub unsafe fn peek_unchecked(&self) -> &T {
        &self.node(self.root.unchecked_unwrap()).elem
    }

    /// Iterate over the values in this `PairingHeap` by reference in unspecified order.
    #[inline]
    pub fn values<'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.data.values().map(|node| &node.elem)
    }

    /// Iterate over the values in this `PairingHeap` by mutable reference in unspecified order.
    ///
    /// Call `rebuild_all` afterwards if priorities were changed.
    #[inline]
    pub fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T> + 'a {
        self.data.values_mut().map(|node| &mut node.elem)
    }
}

impl<T, C> PairingHeap<T, C>
where
    C: Compare<T>,
{
    /// Creates a heap out of the given elements in O(n).
    pub fn from_iter_with_compare<I>(iter: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut heap = PairingHeap::with_compare(cmp);
        heap.extend(iter);
        heap
    }

    /// Returns true if the element at `fst` strictly precedes the one at `snd`.
    #[inline]
    fn precedes(&self, fst: Handle, snd: Handle) -> bool {
        self.cmp.precedes(&self.node(fst).elem, &self.node(snd).elem)
    }

    /// Links the less extreme tree under the more extreme one and returns the
    /// resulting root. On ties `fst` stays on top.
    fn union(&mut self, fst: Handle, snd: Handle) -> Handle {
        debug_assert!(fst != snd, "cannot union self with itself");

        if self.precedes(snd, fst) {
            self.link(snd, fst);
            snd
        } else {
            self.link(fst, snd);
            fst
        }
    }

    /// Melds two heap-ordered trees, either of which may be absent.
    #[inline]
    fn meld(&mut self, fst: Option<Handle>, snd: Option<Handle>) -> Option<Handle> {
        match (fst, snd) {
            (Some(fst), Some(snd)) => Some(self.union(fst, snd)),
            (None, tree) | (tree, None) => tree,
        }
    }

    /// Cuts the given non-root node out of its parent's child list. Its own
    /// children stay attached.
    fn cut(&mut self, handle: Handle) {
        let (prev, sibling) = {
            let node = self.node(handle);
            (node.prev, node.sibling)
        };
        debug_assert!(prev.is_some(), "cannot cut a root");

        if let Some(prev) = prev {
            if self.node(prev).child == Some(handle) {
                self.node_mut(prev).child = sibling;
            } else {
                self.node_mut(prev).sibling = sibling;
            }
        }
        if let Some(sibling) = sibling {
            self.node_mut(sibling).prev = prev;
        }
        let node = self.node_mut(handle);
        node.prev = None;
        node.sibling = None;
    }

    /// Inserts the given element into the `PairingHeap` and returns a `Handle`
    /// to it that allows to directly address it.
    ///
    /// The handle is for example required in order to use methods like `update_priority`.
    #[inline]
    pub fn push(&mut self, elem: T) -> Handle {
        let handle = self.data.put(Node::new(elem));
        let root = self.root;
        self.root = self.meld(Some(handle), root);
        handle
    }

    /// Removes the most extreme element within this `PairingHeap` and returns it.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        match self.is_empty() {
            true => None,
            _ => unsafe { Some(self.pop_unchecked()) },
        }
    }

    /// Removes the most extreme element within this `PairingHeap` without
    /// checking for emptiness and returns it.
    ///
    /// So use this method carefully!
    pub unsafe fn pop_unchecked(&mut self) -> T {
        let root = self.root.take().unchecked_unwrap();

        let mut trees = VecDeque::new();
        let mut next = self.node_mut(root).child.take();
        while let Some(child) = next {
            let node = self.node_mut(child);
            next = node.sibling.take();
            node.prev = None;
            trees.push_back(child);
        }

        let elem = self.data.take_unchecked(root).elem;
        Forest { heap: &mut *self, trees }.pair_up();
        elem
    }

    /// Replaces the element associated with the given `handle` by `elem`.
    ///
    /// `elem` must be strictly more extreme than the element it replaces.
    /// This is not checked in release builds: violating it breaks the heap
    /// order. Use `try_update_priority` for a checked variant.
    ///
    /// Will panic if the given handle does not address an element.
    pub fn update_priority(&mut self, handle: Handle, elem: T) {
        {
            let node = self
                .data
                .get_mut(handle)
                .expect("no node found for given handle");
            debug_assert!(
                self.cmp.precedes(&elem, &node.elem),
                "new element must have a higher priority"
            );
            node.elem = elem;
        }
        self.raise(handle);
    }

    /// Replaces the element associated with the given `handle` by `elem` if
    /// `elem` is strictly more extreme than the current one.
    pub fn try_update_priority(&mut self, handle: Handle, elem: T) -> Result<()> {
        let raised = match self.data.get(handle) {
            None => {
                debug!(?handle, "rejected priority update for vacant handle");
                return Err(Error::InvalidHandle);
            }
            Some(node) => self.cmp.precedes(&elem, &node.elem),
        };
        if !raised {
            debug!(?handle, "rejected priority update that does not raise the priority");
            return Err(Error::PriorityNotRaised);
        }

        self.node_mut(handle).elem = elem;
        self.raise(handle);
        Ok(())
    }

    /// Restores the heap order around a node whose element became more extreme.
    fn raise(&mut self, handle: Handle) {
        if self.root == Some(handle) {
            return;
        }
        self.cut(handle);
        let root = self.root;
        self.root = self.meld(Some(handle), root);
    }

    /// Re-establishes the heap order after an unknown subset of elements has
    /// been mutated in place through `get_mut`, `values_mut` or `IndexMut`.
    ///
    /// All handles stay valid. Runs in O(n) and never reallocates a node.
    /// If the comparator panics, every element stays in the heap but their
    /// order is unspecified until the next successful `rebuild_all`.
    pub fn rebuild_all(&mut self) {
        let root = match self.root.take() {
            Some(root) => root,
            None => return,
        };

        let mut pending = vec![root];
        let mut isolated = VecDeque::with_capacity(self.len());
        while let Some(handle) = pending.pop() {
            let node = self.node_mut(handle);
            pending.extend(node.child.take());
            pending.extend(node.sibling.take());
            node.prev = None;
            isolated.push_back(handle);
        }

        Forest { heap: &mut *self, trees: isolated }.fold_front();
        trace!(len = self.len(), "rebuilt pairing heap");
    }

    /// Moves all elements of `other` into `self`, leaving `other` empty.
    ///
    /// Handles of `other` become invalid, the elements get new handles in
    /// `self` that are not reported. Elements are ordered by the comparator of `self`.
    pub fn append(&mut self, other: &mut Self) {
        let moved = other.len();
        let mut pending: Vec<Handle> = other.root.take().into_iter().collect();
        while let Some(handle) = pending.pop() {
            let node = unsafe { other.data.take_unchecked(handle) };
            pending.extend(node.child);
            pending.extend(node.sibling);
            self.push(node.elem);
        }
        debug_assert_eq!(other.data.len(), 0);
        debug!(moved, len = self.len(), "appended pairing heap");
    }

    /// Iterate over values stored within a `PairingHeap` in sorted order,
    /// most extreme first. Drains the heap.
    #[inline]
    pub fn drain_sorted(self) -> DrainSorted<T, C> {
        DrainSorted { heap: self }
    }

    /// Consumes the heap and returns its elements in sorted order, most extreme first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let len = self.len();
        let mut sorted = Vec::with_capacity(len);
        sorted.extend(self.drain_sorted());
        sorted
    }
}

/// Preorder walk over the handles of a heap's nodes.
struct Walk<'a, T: 'a, C: 'a> {
    heap: &'a PairingHeap<T, C>,
    pending: Vec<Handle>,
}

impl<'a, T, C> Iterator for Walk<'a, T, C> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.pending.pop()?;
        let node = self.heap.node(handle);
        self.pending.extend(node.sibling);
        self.pending.extend(node.child);
        Some(handle)
    }
}

/// Trees detached from a heap while it is restructured.
///
/// Whatever trees are left when this is dropped get linked below the front
/// one, which becomes the root. A panicking comparator thus never loses an
/// element, it only leaves the heap order unspecified.
struct Forest<'a, T: 'a, C: 'a> {
    heap: &'a mut PairingHeap<T, C>,
    trees: VecDeque<Handle>,
}

impl<'a, T, C> Forest<'a, T, C>
where
    C: Compare<T>,
{
    /// Melds the two front trees and queues the result at the back until a
    /// single tree is left.
    fn pair_up(mut self) {
        while self.trees.len() > 1 {
            let melded = self.heap.union(self.trees[0], self.trees[1]);
            self.trees.pop_front();
            self.trees.pop_front();
            self.trees.push_back(melded);
        }
    }

    /// Melds every tree into the front one, in queue order.
    fn fold_front(mut self) {
        while self.trees.len() > 1 {
            let acc = self.heap.union(self.trees[0], self.trees[1]);
            self.trees.pop_front();
            self.trees[0] = acc;
        }
    }
}

impl<'a, T, C> Drop for Forest<'a, T, C> {
    fn drop(&mut self) {
        let root = self.trees.pop_front();
        if let Some(root) = root {
            while let Some(tree) = self.trees.pop_front() {
                self.heap.link(root, tree);
            }
        }
        self.heap.root = root;
    }
}

impl<T, C> Default for PairingHeap<T, C>
where
    C: Default,
{
    fn default() -> Self {
        PairingHeap::with_compare(C::default())
    }
}

impl<T, C> Clone for PairingHeap<T, C>
where
    T: Clone,
    C: Compare<T> + Clone,
{
    /// Builds an independent heap holding the same elements. The tree shape
    /// may differ and handles of `self` are not valid against the copy.
    fn clone(&self) -> Self {
        let mut copy = PairingHeap::with_compare(self.cmp.clone());
        for handle in self.walk() {
            copy.push(self.node(handle).elem.clone());
        }
        copy
    }

    /// Copy-and-swap: `self` is only touched once the copy is complete.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        mem::swap(self, &mut copy);
        trace!(len = self.len(), "replaced pairing heap by a copy");
    }
}

impl<T, C> FromIterator<T> for PairingHeap<T, C>
where
    C: Compare<T> + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        PairingHeap::from_iter_with_compare(iter, C::default())
    }
}

impl<T, C> Extend<T> for PairingHeap<T, C>
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

impl<T, C> PriorityQueue<T> for PairingHeap<T, C>
where
    C: Compare<T>,
{
    #[inline]
    fn len(&self) -> usize {
        PairingHeap::len(self)
    }

    #[inline]
    fn push(&mut self, elem: T) {
        PairingHeap::push(self, elem);
    }

    #[inline]
    fn peek(&self) -> Option<&T> {
        PairingHeap::peek(self)
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        PairingHeap::pop(self)
    }

    fn rebuild_all(&mut self) {
        PairingHeap::rebuild_all(self)
    }
}

impl<T, C> Index<Handle> for PairingHeap<T, C> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("no node found for given handle")
    }
}

impl<T, C> IndexMut<Handle> for PairingHeap<T, C> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("no node found for given handle")
    }
}

/// Iterator over values stored within a `PairingHeap` in sorted order. Drains the heap.
#[derive(Debug)]
pub struct DrainSorted<T, C> {
    heap: PairingHeap<T, C>,
}

impl<T, C> Iterator for DrainSorted<T, C>
where
    C: Compare<T>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}


#[cfg(all(feature = "bench", test))]
mod bench {
    use super::*;
    use crate::binary_heap::BinaryHeap;
    use test::{black_box, Bencher};

    fn setup_sample() -> Vec<i64> {
        use rand::{sample, thread_rng};
        let n = 100_000;
        let mut rng = thread_rng();
        sample(&mut rng, 1..n, n as usize)
    }

    #[bench]
    fn pairing_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut ph = PairingHeap::new();
            for &key in sample.iter() {
                black_box(ph.push(key));
            }
        });
    }

    #[bench]
    fn binary_heap_push(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut bh = BinaryHeap::new();
            for &key in sample.iter() {
                black_box(bh.push(key));
            }
        });
    }

    #[bench]
    fn pairing_heap_pop(bencher: &mut Bencher) {
        let ph: PairingHeap<i64> = setup_sample().into_iter().collect();
        bencher.iter(|| {
            let mut ph = ph.clone();
            while let Some(_) = black_box(ph.pop()) {}
        });
    }

    #[bench]
    fn binary_heap_pop(bencher: &mut Bencher) {
        let bh: BinaryHeap<i64> = setup_sample().into_iter().collect();
        bencher.iter(|| {
            let mut bh = bh.clone();
            while let Some(_) = black_box(bh.pop()) {}
        });
    }

    #[bench]
    fn pairing_heap_update_priority(bencher: &mut Bencher) {
        let sample = setup_sample();
        bencher.iter(|| {
            let mut ph = PairingHeap::new();
            let handles: Vec<Handle> = sample.iter().map(|&key| ph.push(key)).collect();
            for (&h, &key) in handles.iter().zip(sample.iter()) {
                ph.update_priority(h, key - 200_000);
            }
            black_box(ph.peek());
        });
    }

    #[bench]
    fn pairing_heap_rebuild_all(bencher: &mut Bencher) {
        let mut ph: PairingHeap<i64> = setup_sample().into_iter().collect();
        bencher.iter(|| {
            for elem in ph.values_mut() {
                *elem = -*elem;
            }
            ph.rebuild_all();
            black_box(ph.peek());
        });
    }

    #[bench]
    fn pairing_heap_clone(bencher: &mut Bencher) {
        let ph: PairingHeap<i64> = setup_sample().into_iter().collect();
        bencher.iter(|| {
            black_box(&ph.clone());
        });
    }
}

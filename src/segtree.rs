//! Module implement an interval tree, [SegRoot], as an augmented
//! red-black tree.
//!
//! Nodes are ordered by interval start, and every node additionally keeps
//! the largest interval end found in its subtree. An overlap query skips
//! any subtree whose largest end is at or before the query start, and stops
//! at the first node whose start is at or after the query end, giving
//! O(log n + m) for m reported intervals.
//!
//! Intervals are half-open, `[start, end)`. A stored interval overlaps the
//! query `[lo, hi)` when `start < hi && lo < end`. Empty query ranges
//! report nothing.

use std::{cmp::Ordering, fmt};

use crate::{
    cached::RbRootCached,
    node::{rb, Linked, RbNode, Store},
    rbtree::Augment,
    Error, Result,
};

/// Interval node, embed it in a record that implements [Segment].
#[derive(Clone, Debug, Default)]
pub struct SegNode<K> {
    rb: RbNode,
    start: K,
    end: K,
    subtree_end: K,
}

impl<K: Ord + Copy> SegNode<K> {
    /// Create a detached node for `[start, end)`.
    pub fn new(start: K, end: K) -> SegNode<K> {
        SegNode {
            rb: RbNode::new(),
            start,
            end,
            subtree_end: end,
        }
    }

    #[inline]
    pub fn start(&self) -> K {
        self.start
    }

    #[inline]
    pub fn end(&self) -> K {
        self.end
    }

    /// Largest end among this node and all its descendants.
    #[inline]
    pub fn subtree_end(&self) -> K {
        self.subtree_end
    }

    /// Change the interval of a node that is not linked.
    pub fn set_range(&mut self, start: K, end: K) {
        debug_assert!(!self.rb.is_linked(), "set_range on a linked node");
        self.start = start;
        self.end = end;
        self.subtree_end = end;
    }

    #[inline]
    pub fn overlaps(&self, lo: K, hi: K) -> bool {
        overlaps(self.start, self.end, lo, hi)
    }
}

/// Whether `[start, end)` overlaps `[lo, hi)`.
#[inline]
pub fn overlaps<K: Ord>(start: K, end: K, lo: K, hi: K) -> bool {
    start < hi && lo < end
}

impl<K> Linked for SegNode<K> {
    fn as_rb(&self) -> &RbNode {
        &self.rb
    }

    fn as_rb_mut(&mut self) -> &mut RbNode {
        &mut self.rb
    }
}

/// Implemented by records that embed a [SegNode].
pub trait Segment: Linked {
    type Key: Ord + Copy;

    fn as_seg(&self) -> &SegNode<Self::Key>;

    fn as_seg_mut(&mut self) -> &mut SegNode<Self::Key>;
}

impl<K: Ord + Copy> Segment for SegNode<K> {
    type Key = K;

    fn as_seg(&self) -> &SegNode<K> {
        self
    }

    fn as_seg_mut(&mut self) -> &mut SegNode<K> {
        self
    }
}

#[inline]
fn seg<S>(s: &S, id: usize) -> &SegNode<<S::Item as Segment>::Key>
where
    S: Store + ?Sized,
    S::Item: Segment,
{
    s.get(id).as_seg()
}

/// Augmentation callbacks maintaining [SegNode::subtree_end].
#[derive(Clone, Copy, Debug, Default)]
pub struct SubtreeEnd;

impl SubtreeEnd {
    fn compute<S>(s: &S, id: usize) -> <S::Item as Segment>::Key
    where
        S: Store + ?Sized,
        S::Item: Segment,
    {
        let node = seg(s, id);
        let mut max = node.end;
        if let Some(left) = node.rb.left() {
            max = max.max(seg(s, left).subtree_end);
        }
        if let Some(right) = node.rb.right() {
            max = max.max(seg(s, right).subtree_end);
        }
        max
    }
}

impl<S> Augment<S> for SubtreeEnd
where
    S: Store + ?Sized,
    S::Item: Segment,
{
    fn propagate(&self, s: &mut S, mut node: Option<usize>, stop: Option<usize>) {
        while let Some(id) = node {
            if node == stop {
                break;
            }
            let subtree_end = SubtreeEnd::compute(s, id);
            let n = s.get_mut(id).as_seg_mut();
            if n.subtree_end == subtree_end {
                break;
            }
            n.subtree_end = subtree_end;
            node = n.rb.parent();
        }
    }

    fn copy(&self, s: &mut S, old: usize, new: usize) {
        let subtree_end = seg(s, old).subtree_end;
        s.get_mut(new).as_seg_mut().subtree_end = subtree_end;
    }

    fn rotate(&self, s: &mut S, old: usize, new: usize) {
        let subtree_end = seg(s, old).subtree_end;
        s.get_mut(new).as_seg_mut().subtree_end = subtree_end;
        let subtree_end = SubtreeEnd::compute(s, old);
        s.get_mut(old).as_seg_mut().subtree_end = subtree_end;
    }
}

/// Root handle of an interval tree.
#[derive(Clone, Debug, Default)]
pub struct SegRoot {
    root: RbRootCached,
}

impl SegRoot {
    /// Create an empty tree.
    pub fn new() -> SegRoot {
        SegRoot {
            root: RbRootCached::new(),
        }
    }

    /// Return the underlying tree, for plain traversal.
    #[inline]
    pub fn as_cached(&self) -> &RbRootCached {
        &self.root
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Return the interval with the smallest start, O(1).
    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.root.first()
    }
}

impl SegRoot {
    /// Insert `node`, ordered by interval start. Intervals with equal
    /// start are placed after existing ones.
    pub fn insert<S>(&mut self, s: &mut S, node: usize) -> Result<()>
    where
        S: Store + ?Sized,
        S::Item: Segment,
    {
        // a linked node keeps its summary, the guard rejects it below.
        if !rb(s, node).is_linked() {
            let n = s.get_mut(node).as_seg_mut();
            n.subtree_end = n.end;
        }
        self.root
            .insert_augmented(s, node, |a, b| cmp_start(a, b), &SubtreeEnd)
    }

    pub fn delete<S>(&mut self, s: &mut S, node: usize) -> Result<()>
    where
        S: Store + ?Sized,
        S::Item: Segment,
    {
        self.root.delete_augmented(s, node, &SubtreeEnd)
    }

    pub fn clear<S>(&mut self, s: &mut S) -> usize
    where
        S: Store + ?Sized,
        S::Item: Segment,
    {
        self.root.clear(s)
    }
}

/// Query API.
impl SegRoot {
    /// Return the overlapping interval with the smallest start.
    pub fn first_overlap<S, K>(&self, s: &S, lo: K, hi: K) -> Option<usize>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
        K: Ord + Copy,
    {
        if lo >= hi {
            return None;
        }
        let root = self.root.root()?;
        if seg(s, root).subtree_end <= lo {
            return None;
        }
        let leftmost = self.root.first()?;
        if seg(s, leftmost).start >= hi {
            return None;
        }
        subtree_search(s, root, lo, hi)
    }

    /// Iterate over intervals overlapping `[lo, hi)`, by ascending start.
    pub fn overlaps<'a, S, K>(&self, s: &'a S, lo: K, hi: K) -> Overlaps<'a, S, K>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
        K: Ord + Copy,
    {
        let next = self.first_overlap(s, lo, hi);
        Overlaps {
            store: s,
            lo,
            hi,
            next,
        }
    }

    /// Return a cursor over intervals overlapping `[lo, hi)`, that does not
    /// hold on to the store.
    pub fn cursor<S, K>(&self, s: &S, lo: K, hi: K) -> OverlapCursor<K>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
        K: Ord + Copy,
    {
        OverlapCursor {
            lo,
            hi,
            next: self.first_overlap(s, lo, hi),
        }
    }
}

impl SegRoot {
    /// Validate the tree, refer to [RbRootCached::validate], and check
    /// every node's subtree end against its subtree.
    pub fn validate<S>(&self, s: &S) -> Result<usize>
    where
        S: Store + ?Sized,
        S::Item: Segment,
        <S::Item as Segment>::Key: fmt::Debug,
    {
        let height = self.root.validate(s, |a, b| cmp_start(a, b))?;
        validate_subtree_end(s, self.root.root())?;
        Ok(height)
    }
}

fn cmp_start<T: Segment>(a: &T, b: &T) -> Ordering {
    a.as_seg().start.cmp(&b.as_seg().start)
}

// first overlapping node under `node`, given subtree_end(node) > lo.
fn subtree_search<S, K>(s: &S, mut node: usize, lo: K, hi: K) -> Option<usize>
where
    S: Store + ?Sized,
    S::Item: Segment<Key = K>,
    K: Ord + Copy,
{
    loop {
        let n = seg(s, node);
        if let Some(left) = n.rb.left() {
            if seg(s, left).subtree_end > lo {
                node = left;
                continue;
            }
        }
        if n.start < hi {
            if lo < n.end {
                return Some(node);
            }
            if let Some(right) = n.rb.right() {
                if seg(s, right).subtree_end > lo {
                    node = right;
                    continue;
                }
            }
        }
        return None;
    }
}

/// Return the overlapping interval following `node` by ascending start.
pub fn next_overlap<S, K>(s: &S, node: usize, lo: K, hi: K) -> Option<usize>
where
    S: Store + ?Sized,
    S::Item: Segment<Key = K>,
    K: Ord + Copy,
{
    let mut node = node;
    let mut right = seg(s, node).rb.right();
    loop {
        if let Some(r) = right {
            if seg(s, r).subtree_end > lo {
                return subtree_search(s, r, lo, hi);
            }
        }

        // climb until we come up from a left child.
        loop {
            let parent = seg(s, node).rb.parent()?;
            let prev = node;
            node = parent;
            right = seg(s, node).rb.right();
            if right != Some(prev) {
                break;
            }
        }

        let n = seg(s, node);
        if hi <= n.start {
            return None;
        } else if lo < n.end {
            return Some(node);
        }
    }
}

/// Iterator over overlapping intervals, borrowing the store.
pub struct Overlaps<'a, S: ?Sized, K> {
    store: &'a S,
    lo: K,
    hi: K,
    next: Option<usize>,
}

impl<'a, S, K> Overlaps<'a, S, K>
where
    S: Store + ?Sized,
    S::Item: Segment<Key = K>,
    K: Ord + Copy,
{
    /// Resume a query at `node`, included if it overlaps `[lo, hi)`.
    pub fn from_node(store: &'a S, node: usize, lo: K, hi: K) -> Overlaps<'a, S, K> {
        let next = if seg(store, node).overlaps(lo, hi) {
            Some(node)
        } else {
            next_overlap(store, node, lo, hi)
        };
        Overlaps { store, lo, hi, next }
    }

    /// Resume a query after `node`, `node` excluded.
    pub fn after_node(store: &'a S, node: usize, lo: K, hi: K) -> Overlaps<'a, S, K> {
        let next = next_overlap(store, node, lo, hi);
        Overlaps { store, lo, hi, next }
    }
}

impl<'a, S, K> Iterator for Overlaps<'a, S, K>
where
    S: Store + ?Sized,
    S::Item: Segment<Key = K>,
    K: Ord + Copy,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let node = self.next?;
        self.next = next_overlap(self.store, node, self.lo, self.hi);
        Some(node)
    }
}

/// Cursor over overlapping intervals. The interval it returns can be
/// deleted before asking for the next one.
#[derive(Clone, Copy, Debug)]
pub struct OverlapCursor<K> {
    lo: K,
    hi: K,
    next: Option<usize>,
}

impl<K: Ord + Copy> OverlapCursor<K> {
    /// Resume a query at `node`, included if it overlaps `[lo, hi)`.
    pub fn from_node<S>(s: &S, node: usize, lo: K, hi: K) -> OverlapCursor<K>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
    {
        let next = if seg(s, node).overlaps(lo, hi) {
            Some(node)
        } else {
            next_overlap(s, node, lo, hi)
        };
        OverlapCursor { lo, hi, next }
    }

    /// Resume a query after `node`, `node` excluded.
    pub fn after_node<S>(s: &S, node: usize, lo: K, hi: K) -> OverlapCursor<K>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
    {
        let next = next_overlap(s, node, lo, hi);
        OverlapCursor { lo, hi, next }
    }

    pub fn next<S>(&mut self, s: &S) -> Option<usize>
    where
        S: Store + ?Sized,
        S::Item: Segment<Key = K>,
    {
        let node = self.next?;
        self.next = next_overlap(s, node, self.lo, self.hi);
        Some(node)
    }
}

// return the true largest end under `node`, checking stored values.
fn validate_subtree_end<S, K>(s: &S, node: Option<usize>) -> Result<Option<K>>
where
    S: Store + ?Sized,
    S::Item: Segment<Key = K>,
    K: Ord + Copy + fmt::Debug,
{
    let id = match node {
        Some(id) => id,
        None => return Ok(None),
    };
    let n = seg(s, id);

    let mut max = n.end;
    for child in [n.rb.left(), n.rb.right()].iter() {
        if let Some(end) = validate_subtree_end(s, *child)? {
            max = max.max(end);
        }
    }

    if n.subtree_end != max {
        err_at!(Fatal, msg: "node {} subtree_end {:?} expected {:?}", id, n.subtree_end, max)?;
    }
    Ok(Some(max))
}

#[cfg(test)]
#[path = "segtree_test.rs"]
mod segtree_test;

//! Module implement [RbRootCached], a tree handle that also tracks the
//! left-most node.

use std::cmp::Ordering;

use crate::{
    iter::{self, Cursor, Iter, Order},
    rbtree::{Augment, Noop, RbRoot},
    node::{Slot, Store},
    Error, Result,
};

/// Root handle that keeps the smallest node at hand.
///
/// Insert learns whether the new node is the new minimum during its own
/// descent, delete of the minimum moves the cache to its successor, so
/// [first](RbRootCached::first) is O(1).
#[derive(Clone, Debug, Default)]
pub struct RbRootCached {
    root: RbRoot,
    leftmost: Option<usize>,
}

impl RbRootCached {
    /// Create an empty tree.
    pub fn new() -> RbRootCached {
        RbRootCached {
            root: RbRoot::new(),
            leftmost: None,
        }
    }

    /// Return the plain root handle, for read-only operations.
    #[inline]
    pub fn as_root(&self) -> &RbRoot {
        &self.root
    }

    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.root.root()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Return the node with the smallest key, O(1).
    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.leftmost
    }

    /// Return the node with the largest key, O(log n).
    pub fn last<S: Store + ?Sized>(&self, s: &S) -> Option<usize> {
        self.root.last(s)
    }
}

impl RbRootCached {
    pub fn insert<S, F>(&mut self, s: &mut S, node: usize, cmp: F) -> Result<()>
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        self.insert_augmented(s, node, cmp, &Noop)
    }

    pub fn insert_augmented<S, F, A>(
        &mut self,
        s: &mut S,
        node: usize,
        cmp: F,
        aug: &A,
    ) -> Result<()>
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
        A: Augment<S>,
    {
        let (slot, leftmost) = self.root.descend(s, node, cmp);
        self.link_augmented(s, slot, node, leftmost, aug)
    }

    /// Return the empty position where `node` would be linked, and whether
    /// it would become the left-most node.
    pub fn find_slot<S, F>(&self, s: &S, node: usize, cmp: F) -> (Slot, bool)
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        self.root.descend(s, node, cmp)
    }

    pub fn link<S>(&mut self, s: &mut S, slot: Slot, node: usize, leftmost: bool) -> Result<()>
    where
        S: Store + ?Sized,
    {
        self.link_augmented(s, slot, node, leftmost, &Noop)
    }

    pub fn link_augmented<S, A>(
        &mut self,
        s: &mut S,
        slot: Slot,
        node: usize,
        leftmost: bool,
        aug: &A,
    ) -> Result<()>
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        self.root.link_augmented(s, slot, node, aug)?;
        if leftmost {
            self.leftmost = Some(node);
        }
        Ok(())
    }

    pub fn delete<S>(&mut self, s: &mut S, node: usize) -> Result<()>
    where
        S: Store + ?Sized,
    {
        self.delete_augmented(s, node, &Noop)
    }

    pub fn delete_augmented<S, A>(&mut self, s: &mut S, node: usize, aug: &A) -> Result<()>
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        if self.leftmost == Some(node) {
            // left-most has no left child, its successor is one step away.
            let next = iter::next(s, node);
            self.root.delete_augmented(s, node, aug)?;
            self.leftmost = next;
        } else {
            self.root.delete_augmented(s, node, aug)?;
        }
        Ok(())
    }

    pub fn replace<S>(&mut self, s: &mut S, old: usize, new: usize) -> Result<()>
    where
        S: Store + ?Sized,
    {
        self.root.replace(s, old, new)?;
        if self.leftmost == Some(old) {
            self.leftmost = Some(new);
        }
        Ok(())
    }

    pub fn find<S, Q, F>(&self, s: &S, key: &Q, cmp: F) -> Option<usize>
    where
        S: Store + ?Sized,
        Q: ?Sized,
        F: FnMut(&S::Item, &Q) -> Ordering,
    {
        self.root.find(s, key, cmp)
    }

    pub fn clear<S>(&mut self, s: &mut S) -> usize
    where
        S: Store + ?Sized,
    {
        self.leftmost = None;
        self.root.clear(s)
    }
}

/// Traversal API.
impl RbRootCached {
    /// Iterate node ids in ascending order, starting at the cached
    /// left-most node.
    pub fn iter<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        match self.leftmost {
            Some(node) => Iter::from_node(s, node, Order::Ascending),
            None => Iter::new(s, None, Order::Ascending),
        }
    }

    pub fn reverse<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        self.root.reverse(s)
    }

    pub fn post_order<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        self.root.post_order(s)
    }

    pub fn pre_order<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        self.root.pre_order(s)
    }

    pub fn cursor<S: Store + ?Sized>(&self, s: &S, order: Order) -> Cursor {
        match (order, self.leftmost) {
            (Order::Ascending, Some(node)) => Cursor::from_node(node, order),
            (_, _) => self.root.cursor(s, order),
        }
    }
}

impl RbRootCached {
    /// Validate the tree, refer to [RbRoot::validate], and check that the
    /// cached node is the left-most node.
    pub fn validate<S, F>(&self, s: &S, cmp: F) -> Result<usize>
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        let height = self.root.validate(s, cmp)?;
        let leftmost = self.root.first(s);
        if leftmost != self.leftmost {
            err_at!(Fatal, msg: "cached {:?} left-most {:?}", self.leftmost, leftmost)?;
        }
        Ok(height)
    }
}

#[cfg(test)]
#[path = "cached_test.rs"]
mod cached_test;

//! Module implement the red-black tree core, [RbRoot].
//!
//! Insert links the new node as a red leaf and walks upward fixing
//! red-red violations. Delete splices the in-order successor into the
//! place of a node with two children, then, when a black node left the
//! tree, restores black-height by walking upward from the splice point.
//! Both sides share a single rotation primitive, which
//! notifies the [Augment] callbacks after every rotation.

use std::cmp::Ordering;

use crate::{
    debug,
    iter::{self, Cursor, Iter, Order},
    node::{is_black, is_red, rb, rb_mut, set_black, set_parent, set_red},
    node::{Side, Slot, State, Store},
    Error, Result,
};

/// Callbacks to maintain per-node summaries of a subtree.
///
/// Before linking a new node the caller must initialise its summary as if
/// it were a leaf, removed nodes carry stale summaries.
pub trait Augment<S: Store + ?Sized> {
    /// Recompute summaries from `node` upward, stopping before `stop`.
    fn propagate(&self, s: &mut S, node: Option<usize>, stop: Option<usize>);

    /// `new` takes over the position, and subtree, of `old`.
    fn copy(&self, s: &mut S, old: usize, new: usize);

    /// `new` was rotated above `old`, `old` is now a child of `new`.
    fn rotate(&self, s: &mut S, old: usize, new: usize);
}

/// Augmentation that maintains nothing, for plain trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl<S: Store + ?Sized> Augment<S> for Noop {
    #[inline]
    fn propagate(&self, _: &mut S, _: Option<usize>, _: Option<usize>) {}

    #[inline]
    fn copy(&self, _: &mut S, _: usize, _: usize) {}

    #[inline]
    fn rotate(&self, _: &mut S, _: usize, _: usize) {}
}

/// Root handle of a red-black tree whose nodes live in a [Store].
#[derive(Clone, Debug, Default)]
pub struct RbRoot {
    node: Option<usize>,
}

impl RbRoot {
    /// Create an empty tree.
    pub fn new() -> RbRoot {
        RbRoot { node: None }
    }

    /// Return the top-most node.
    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.node
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Return the node with the smallest key, O(log n).
    pub fn first<S: Store + ?Sized>(&self, s: &S) -> Option<usize> {
        iter::first(s, self.node)
    }

    /// Return the node with the largest key, O(log n).
    pub fn last<S: Store + ?Sized>(&self, s: &S) -> Option<usize> {
        iter::last(s, self.node)
    }
}

impl RbRoot {
    /// Insert `node` using `cmp(new, existing)`. Nodes comparing equal to
    /// an existing node are placed after it.
    pub fn insert<S, F>(&mut self, s: &mut S, node: usize, cmp: F) -> Result<()>
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        self.insert_augmented(s, node, cmp, &Noop)
    }

    /// Same as insert, maintaining the summaries of `aug`.
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
        let (slot, _) = self.descend(s, node, cmp);
        self.link_augmented(s, slot, node, aug)
    }

    /// Return the empty position where `node` would be linked.
    pub fn find_slot<S, F>(&self, s: &S, node: usize, cmp: F) -> Slot
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        self.descend(s, node, cmp).0
    }

    /// Link `node` at `slot`, usually obtained from find_slot, and
    /// rebalance the tree.
    pub fn link<S>(&mut self, s: &mut S, slot: Slot, node: usize) -> Result<()>
    where
        S: Store + ?Sized,
    {
        self.link_augmented(s, slot, node, &Noop)
    }

    pub fn link_augmented<S, A>(&mut self, s: &mut S, slot: Slot, node: usize, aug: &A) -> Result<()>
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        debug::link_check(s, slot.parent, self.occupant(s, slot), node)?;

        {
            let n = rb_mut(s, node);
            n.parent = slot.parent;
            n.left = None;
            n.right = None;
            n.black = false;
            n.state = State::Linked;
        }
        match slot.parent {
            Some(parent) => rb_mut(s, parent).set_child(slot.side, Some(node)),
            None => self.node = Some(node),
        }

        aug.propagate(s, slot.parent, None);
        self.insert_color(s, node, aug);
        Ok(())
    }

    /// Unlink `node` from the tree and rebalance. The node is tagged
    /// [State::Removed] afterwards.
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
        debug::delete_check(s, node)?;
        self.erase(s, node, aug);
        Ok(())
    }

    /// Find a node for which `cmp(record, key)` returns Equal. Among
    /// several equal nodes, which one is found depends on the tree shape.
    pub fn find<S, Q, F>(&self, s: &S, key: &Q, mut cmp: F) -> Option<usize>
    where
        S: Store + ?Sized,
        Q: ?Sized,
        F: FnMut(&S::Item, &Q) -> Ordering,
    {
        let mut node = self.node;
        while let Some(id) = node {
            node = match cmp(s.get(id), key) {
                Ordering::Less => rb(s, id).right,
                Ordering::Greater => rb(s, id).left,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Put the detached `new` in place of the linked `old`, taking over its
    /// colour and links. Caller must make sure both order the same way.
    pub fn replace<S>(&mut self, s: &mut S, old: usize, new: usize) -> Result<()>
    where
        S: Store + ?Sized,
    {
        debug::delete_check(s, old)?;
        debug::link_check(s, rb(s, old).parent, None, new)?;

        let links = rb(s, old).clone();
        {
            let n = rb_mut(s, new);
            n.parent = links.parent;
            n.left = links.left;
            n.right = links.right;
            n.black = links.black;
            n.state = State::Linked;
        }
        set_parent(s, links.left, Some(new));
        set_parent(s, links.right, Some(new));
        self.change_child(s, old, Some(new), links.parent);
        rb_mut(s, old).poison();
        Ok(())
    }

    /// Tear down the tree in O(n) without rebalancing, tagging every node
    /// as removed. Return the number of nodes released.
    pub fn clear<S>(&mut self, s: &mut S) -> usize
    where
        S: Store + ?Sized,
    {
        let mut cursor = self.cursor(s, Order::PostOrder);
        let mut n = 0;
        while let Some(id) = cursor.next(s) {
            rb_mut(s, id).poison();
            n += 1;
        }
        self.node = None;
        n
    }
}

/// Traversal API.
impl RbRoot {
    /// Iterate node ids in ascending order.
    pub fn iter<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        Iter::new(s, self.node, Order::Ascending)
    }

    /// Iterate node ids in descending order.
    pub fn reverse<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        Iter::new(s, self.node, Order::Descending)
    }

    /// Iterate node ids, children before their parent. To tear the tree
    /// down use [RbRoot::clear], deleting nodes along a post-order walk
    /// rebalances the tree under it and may leave nodes behind.
    pub fn post_order<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        Iter::new(s, self.node, Order::PostOrder)
    }

    /// Iterate node ids, parent before its children.
    pub fn pre_order<'a, S: Store + ?Sized>(&self, s: &'a S) -> Iter<'a, S> {
        Iter::new(s, self.node, Order::PreOrder)
    }

    /// Return a cursor positioned at the first node for `order`. Unlike
    /// [Iter] it does not hold on to the store, so the node it returns can
    /// be removed before asking for the next one.
    ///
    /// Only ascending and descending cursors are exact under removal.
    /// Pre-order and post-order cursors follow the tree shape, which a
    /// removal may rotate, so a single pass can skip nodes.
    pub fn cursor<S: Store + ?Sized>(&self, s: &S, order: Order) -> Cursor {
        Cursor::new(s, self.node, order)
    }
}

impl RbRoot {
    /// Validate the tree with following rules:
    ///
    /// * Root is black and has no parent.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Parent links agree with child links.
    /// * Children are ordered with respect to their parent, by `cmp`.
    ///
    /// Return the black-height of the tree.
    pub fn validate<S, F>(&self, s: &S, mut cmp: F) -> Result<usize>
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        if let Some(root) = self.node {
            if !rb(s, root).black {
                err_at!(Fatal, msg: "root {} is red", root)?;
            }
        }
        validate_tree(s, self.node, None, &mut cmp)
    }
}

impl RbRoot {
    // descend like insert, also returning whether every step went left.
    pub(crate) fn descend<S, F>(&self, s: &S, node: usize, mut cmp: F) -> (Slot, bool)
    where
        S: Store + ?Sized,
        F: FnMut(&S::Item, &S::Item) -> Ordering,
    {
        let mut slot = Slot {
            parent: None,
            side: Side::Left,
        };
        let mut leftmost = true;

        let mut cur = self.node;
        while let Some(id) = cur {
            let side = match cmp(s.get(node), s.get(id)) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => {
                    leftmost = false;
                    Side::Right
                }
            };
            slot = Slot {
                parent: Some(id),
                side,
            };
            cur = rb(s, id).child(side);
        }

        (slot, leftmost)
    }

    fn occupant<S: Store + ?Sized>(&self, s: &S, slot: Slot) -> Option<usize> {
        match slot.parent {
            Some(parent) => rb(s, parent).child(slot.side),
            None => self.node,
        }
    }

    // replace `old` with `new` in the child link of `parent`.
    fn change_child<S>(&mut self, s: &mut S, old: usize, new: Option<usize>, parent: Option<usize>)
    where
        S: Store + ?Sized,
    {
        match parent {
            Some(parent) => {
                let p = rb_mut(s, parent);
                if p.left == Some(old) {
                    p.left = new
                } else {
                    p.right = new
                }
            }
            None => self.node = new,
        }
    }

    //  rotate(node, Left)                rotate(node, Right)
    //
    //        node            x                node          x
    //        /  \           / \               /  \         / \
    //      a     x   =>  node  c             x    c  =>   a  node
    //           / \      /  \               / \              /  \
    //          b   c    a    b             a   b            b    c
    //
    // Colours are left to the caller.
    pub(crate) fn rotate<S, A>(&mut self, s: &mut S, aug: &A, node: usize, side: Side)
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        let x = match rb(s, node).child(side.flip()) {
            Some(x) => x,
            None => return,
        };
        let inner = rb(s, x).child(side);
        let parent = rb(s, node).parent;

        rb_mut(s, node).set_child(side.flip(), inner);
        set_parent(s, inner, Some(node));

        rb_mut(s, x).set_child(side, Some(node));
        rb_mut(s, x).parent = parent;
        rb_mut(s, node).parent = Some(x);
        self.change_child(s, node, Some(x), parent);

        aug.rotate(s, node, x);
    }

    fn insert_color<S, A>(&mut self, s: &mut S, mut node: usize, aug: &A)
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        loop {
            let parent = match rb(s, node).parent {
                Some(parent) => parent,
                None => {
                    set_black(s, Some(node));
                    break;
                }
            };
            if rb(s, parent).black {
                break;
            }
            // a red parent is never the root, but keep the root black anyway.
            let gparent = match rb(s, parent).parent {
                Some(gparent) => gparent,
                None => {
                    set_black(s, Some(parent));
                    break;
                }
            };

            let side = side_of(s, gparent, parent);
            let uncle = rb(s, gparent).child(side.flip());
            if is_red(s, uncle) {
                set_black(s, Some(parent));
                set_black(s, uncle);
                set_red(s, gparent);
                node = gparent;
                continue;
            }

            let mut parent = parent;
            if rb(s, parent).child(side.flip()) == Some(node) {
                self.rotate(s, aug, parent, side);
                parent = node;
            }
            self.rotate(s, aug, gparent, side.flip());
            set_black(s, Some(parent));
            set_red(s, gparent);
            break;
        }
    }

    fn erase<S, A>(&mut self, s: &mut S, node: usize, aug: &A)
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        let (left, right, parent, black) = {
            let n = rb(s, node);
            (n.left, n.right, n.parent, n.black)
        };

        // (child that moved up, its parent, colour removed, rebalance from)
        let (child, child_parent, removed_black, from) = match (left, right) {
            (Some(left), Some(right)) => {
                let (mut succ, mut succ_parent) = (right, node);
                while let Some(l) = rb(s, succ).left {
                    succ_parent = succ;
                    succ = l;
                }
                let succ_black = rb(s, succ).black;
                let child = rb(s, succ).right;

                let child_parent = if succ == right {
                    aug.copy(s, node, succ);
                    succ
                } else {
                    rb_mut(s, succ_parent).left = child;
                    set_parent(s, child, Some(succ_parent));
                    rb_mut(s, succ).right = Some(right);
                    rb_mut(s, right).parent = Some(succ);
                    aug.copy(s, node, succ);
                    aug.propagate(s, Some(succ_parent), Some(succ));
                    succ_parent
                };

                rb_mut(s, succ).left = Some(left);
                rb_mut(s, left).parent = Some(succ);
                self.change_child(s, node, Some(succ), parent);
                {
                    let n = rb_mut(s, succ);
                    n.parent = parent;
                    n.black = black;
                }
                (child, Some(child_parent), succ_black, Some(succ))
            }
            (left, right) => {
                let child = left.or(right);
                self.change_child(s, node, child, parent);
                set_parent(s, child, parent);
                (child, parent, black, parent)
            }
        };

        aug.propagate(s, from, None);
        if removed_black {
            self.erase_color(s, child, child_parent, aug);
        }
        rb_mut(s, node).poison();
    }

    // `node` carries an extra black, possibly None for an empty position
    // under `parent`.
    fn erase_color<S, A>(&mut self, s: &mut S, mut node: Option<usize>, mut parent: Option<usize>, aug: &A)
    where
        S: Store + ?Sized,
        A: Augment<S>,
    {
        while let Some(p) = parent {
            if is_red(s, node) {
                break;
            }

            let side = if rb(s, p).left == node {
                Side::Left
            } else {
                Side::Right
            };

            let mut sibling = rb(s, p).child(side.flip());
            if is_red(s, sibling) {
                set_black(s, sibling);
                set_red(s, p);
                self.rotate(s, aug, p, side);
                sibling = rb(s, p).child(side.flip());
            }
            let mut sib = match sibling {
                Some(sib) => sib,
                None => {
                    node = Some(p);
                    parent = rb(s, p).parent;
                    continue;
                }
            };

            let near = rb(s, sib).child(side);
            let far = rb(s, sib).child(side.flip());
            if is_black(s, near) && is_black(s, far) {
                set_red(s, sib);
                node = Some(p);
                parent = rb(s, p).parent;
                continue;
            }

            if is_black(s, far) {
                if let Some(near) = near {
                    set_black(s, Some(near));
                    set_red(s, sib);
                    self.rotate(s, aug, sib, side.flip());
                    sib = near;
                }
            }

            let black = rb(s, p).black;
            rb_mut(s, sib).black = black;
            set_black(s, Some(p));
            let far = rb(s, sib).child(side.flip());
            set_black(s, far);
            self.rotate(s, aug, p, side);
            return;
        }

        set_black(s, node);
    }
}

fn side_of<S: Store + ?Sized>(s: &S, parent: usize, child: usize) -> Side {
    if rb(s, parent).left == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
}

fn validate_tree<S, F>(s: &S, node: Option<usize>, parent: Option<usize>, cmp: &mut F) -> Result<usize>
where
    S: Store + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let id = match node {
        Some(id) => id,
        None => return Ok(0),
    };
    let n = rb(s, id);

    if n.state != State::Linked {
        err_at!(Fatal, msg: "node {} in tree is {:?}", id, n.state)?;
    }
    if n.parent != parent {
        err_at!(Fatal, msg: "node {} parent {:?} expected {:?}", id, n.parent, parent)?;
    }

    let red = !n.black;
    if red && is_red(s, parent) {
        err_at!(Fatal, msg: "consecutive reds {:?} {}", parent, id)?;
    }

    let lblacks = validate_tree(s, n.left, Some(id), cmp)?;
    let rblacks = validate_tree(s, n.right, Some(id), cmp)?;
    if lblacks != rblacks {
        err_at!(Fatal, msg: "unbalanced blacks {} {} at {}", lblacks, rblacks, id)?;
    }

    if let Some(left) = n.left {
        if cmp(s.get(left), s.get(id)) == Ordering::Greater {
            err_at!(Fatal, msg: "sort left:{} parent:{}", left, id)?;
        }
    }
    if let Some(right) = n.right {
        if cmp(s.get(right), s.get(id)) == Ordering::Less {
            err_at!(Fatal, msg: "sort right:{} parent:{}", right, id)?;
        }
    }

    Ok(if red { lblacks } else { lblacks + 1 })
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;

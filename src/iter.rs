//! Module implement traversal over the shape of a tree.
//!
//! Every walk follows child and parent links, nothing is allocated and the
//! tree is not touched. Each step computes the next node before handing
//! out the current one, [Cursor] builds on this to let the caller remove
//! the node it was just handed.
//!
//! Removing the current node keeps ascending and descending walks exact,
//! since rebalancing preserves in-order sequence. Pre-order and post-order
//! walks follow the tree shape, a removal that rotates the tree may make
//! them skip nodes, use [RbRoot::clear] to tear a tree down.
//!
//! [RbRoot::clear]: crate::RbRoot::clear

use crate::node::{rb, Store};

/// Visiting order for [Iter] and [Cursor].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Smallest to largest key.
    Ascending,
    /// Largest to smallest key.
    Descending,
    /// Both children before the node itself.
    PostOrder,
    /// Node before its children, left subtree first.
    PreOrder,
}

impl Order {
    /// Return the node where a walk over the tree at `root` starts.
    pub fn first<S: Store + ?Sized>(self, s: &S, root: Option<usize>) -> Option<usize> {
        match self {
            Order::Ascending => first(s, root),
            Order::Descending => last(s, root),
            Order::PostOrder => post_first(s, root),
            Order::PreOrder => root,
        }
    }

    /// Return the node visited after `node`.
    pub fn step<S: Store + ?Sized>(self, s: &S, node: usize) -> Option<usize> {
        match self {
            Order::Ascending => next(s, node),
            Order::Descending => prev(s, node),
            Order::PostOrder => post_next(s, node),
            Order::PreOrder => pre_next(s, node),
        }
    }
}

/// Return the left-most node under `root`.
pub fn first<S: Store + ?Sized>(s: &S, root: Option<usize>) -> Option<usize> {
    let mut node = root?;
    while let Some(left) = rb(s, node).left() {
        node = left;
    }
    Some(node)
}

/// Return the right-most node under `root`.
pub fn last<S: Store + ?Sized>(s: &S, root: Option<usize>) -> Option<usize> {
    let mut node = root?;
    while let Some(right) = rb(s, node).right() {
        node = right;
    }
    Some(node)
}

/// In-order successor of `node`.
pub fn next<S: Store + ?Sized>(s: &S, node: usize) -> Option<usize> {
    if let Some(right) = rb(s, node).right() {
        return first(s, Some(right));
    }

    // climb until we come up from a left child.
    let mut node = node;
    while let Some(parent) = rb(s, node).parent() {
        if rb(s, parent).right() != Some(node) {
            return Some(parent);
        }
        node = parent;
    }
    None
}

/// In-order predecessor of `node`.
pub fn prev<S: Store + ?Sized>(s: &S, node: usize) -> Option<usize> {
    if let Some(left) = rb(s, node).left() {
        return last(s, Some(left));
    }

    let mut node = node;
    while let Some(parent) = rb(s, node).parent() {
        if rb(s, parent).left() != Some(node) {
            return Some(parent);
        }
        node = parent;
    }
    None
}

/// Pre-order successor of `node`.
pub fn pre_next<S: Store + ?Sized>(s: &S, node: usize) -> Option<usize> {
    let n = rb(s, node);
    if n.left().is_some() {
        return n.left();
    }
    if n.right().is_some() {
        return n.right();
    }

    let mut node = node;
    while let Some(parent) = rb(s, node).parent() {
        let p = rb(s, parent);
        if p.left() == Some(node) && p.right().is_some() {
            return p.right();
        }
        node = parent;
    }
    None
}

/// Return the first node of a post-order walk, the deepest node on the
/// left-most path.
pub fn post_first<S: Store + ?Sized>(s: &S, root: Option<usize>) -> Option<usize> {
    root.map(|root| left_deep(s, root))
}

/// Post-order successor of `node`.
pub fn post_next<S: Store + ?Sized>(s: &S, node: usize) -> Option<usize> {
    let parent = rb(s, node).parent()?;
    let p = rb(s, parent);
    match p.right() {
        Some(right) if p.left() == Some(node) => Some(left_deep(s, right)),
        _ => Some(parent),
    }
}

fn left_deep<S: Store + ?Sized>(s: &S, mut node: usize) -> usize {
    loop {
        let n = rb(s, node);
        node = match (n.left(), n.right()) {
            (Some(left), _) => left,
            (None, Some(right)) => right,
            (None, None) => break node,
        };
    }
}

/// Iterator over node ids, borrowing the store for its life time.
pub struct Iter<'a, S: ?Sized> {
    store: &'a S,
    order: Order,
    next: Option<usize>,
}

impl<'a, S: Store + ?Sized> Iter<'a, S> {
    /// Walk the whole tree at `root`.
    pub fn new(store: &'a S, root: Option<usize>, order: Order) -> Iter<'a, S> {
        let next = order.first(store, root);
        Iter { store, order, next }
    }

    /// Walk starting at `node`, `node` included.
    pub fn from_node(store: &'a S, node: usize, order: Order) -> Iter<'a, S> {
        Iter {
            store,
            order,
            next: Some(node),
        }
    }

    /// Continue a walk after `node`, `node` excluded.
    pub fn after_node(store: &'a S, node: usize, order: Order) -> Iter<'a, S> {
        let next = order.step(store, node);
        Iter { store, order, next }
    }
}

impl<'a, S: Store + ?Sized> Iterator for Iter<'a, S> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let node = self.next?;
        self.next = self.order.step(self.store, node);
        Some(node)
    }
}

/// Cursor over node ids that does not hold on to the store.
///
/// ```
/// use rbseg::{Order, RbNode, RbRoot};
///
/// let mut nodes = vec![RbNode::new(); 8];
/// let mut root = RbRoot::new();
/// for id in 0..nodes.len() {
///     root.insert(&mut nodes, id, |_, _| std::cmp::Ordering::Greater).unwrap();
/// }
///
/// let mut cursor = root.cursor(&nodes, Order::Ascending);
/// while let Some(id) = cursor.next(&nodes) {
///     root.delete(&mut nodes, id).unwrap();
/// }
/// assert!(root.is_empty());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    order: Order,
    next: Option<usize>,
}

impl Cursor {
    /// Walk the whole tree at `root`.
    pub fn new<S: Store + ?Sized>(s: &S, root: Option<usize>, order: Order) -> Cursor {
        Cursor {
            order,
            next: order.first(s, root),
        }
    }

    /// Walk starting at `node`, `node` included.
    pub fn from_node(node: usize, order: Order) -> Cursor {
        Cursor {
            order,
            next: Some(node),
        }
    }

    /// Continue a walk after `node`, `node` excluded.
    pub fn after_node<S: Store + ?Sized>(s: &S, node: usize, order: Order) -> Cursor {
        Cursor {
            order,
            next: order.step(s, node),
        }
    }

    /// Return the node to visit, having already moved past it.
    pub fn next<S: Store + ?Sized>(&mut self, s: &S) -> Option<usize> {
        let node = self.next?;
        self.next = self.order.step(s, node);
        Some(node)
    }

    /// Node that the following call to next will return.
    pub fn peek(&self) -> Option<usize> {
        self.next
    }
}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;

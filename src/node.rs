use crate::Error;

/// Life-cycle of a node, as seen by the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Constructed by the caller, never inserted.
    Detached,
    /// Currently part of a tree.
    Linked,
    /// Unlinked by a delete, replace or clear. Safe to insert again.
    Removed,
}

impl Default for State {
    fn default() -> State {
        State::Detached
    }
}

/// Which child position of a parent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An empty child position in the tree, where a new node can be linked.
///
/// `parent` is None only when the tree is empty, in which case the slot is
/// the root position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub parent: Option<usize>,
    pub side: Side,
}

/// Link fields embedded in every record that takes part in a tree.
///
/// Links are ids into the record [Store]. The parent link is only a
/// back-reference used to walk upward, ownership of records always
/// stays with the store.
#[derive(Clone, Debug, Default)]
pub struct RbNode {
    pub(crate) parent: Option<usize>, // store: parent, None for root
    pub(crate) left: Option<usize>,   // store: left child
    pub(crate) right: Option<usize>,  // store: right child
    pub(crate) black: bool,           // store: black or red
    pub(crate) state: State,
}

impl RbNode {
    /// Create a detached node.
    pub fn new() -> RbNode {
        RbNode::default()
    }

    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    pub fn left(&self) -> Option<usize> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<usize> {
        self.right
    }

    #[inline]
    pub fn child(&self, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.black
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.state == State::Linked
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<usize>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    // clear links and tag the node as removed.
    pub(crate) fn poison(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
        self.black = false;
        self.state = State::Removed;
    }
}

/// Implemented by records that embed a [RbNode].
pub trait Linked {
    fn as_rb(&self) -> &RbNode;

    fn as_rb_mut(&mut self) -> &mut RbNode;
}

impl Linked for RbNode {
    fn as_rb(&self) -> &RbNode {
        self
    }

    fn as_rb_mut(&mut self) -> &mut RbNode {
        self
    }
}

/// Caller owned storage of records, addressed by id.
///
/// Tree operations index into the store with ids they were handed, an
/// out-of-range id is a caller bug and panics like slice indexing.
pub trait Store {
    type Item: Linked;

    fn get(&self, id: usize) -> &Self::Item;

    fn get_mut(&mut self, id: usize) -> &mut Self::Item;

    /// Invoked when a guard rejects an insert or delete, before the error
    /// is returned to the caller. Override to route diagnostics elsewhere.
    fn report(&self, err: &Error) {
        report_corruption(err)
    }
}

impl<T: Linked> Store for [T] {
    type Item = T;

    #[inline]
    fn get(&self, id: usize) -> &T {
        &self[id]
    }

    #[inline]
    fn get_mut(&mut self, id: usize) -> &mut T {
        &mut self[id]
    }
}

impl<T: Linked> Store for Vec<T> {
    type Item = T;

    #[inline]
    fn get(&self, id: usize) -> &T {
        &self[id]
    }

    #[inline]
    fn get_mut(&mut self, id: usize) -> &mut T {
        &mut self[id]
    }
}

/// Default corruption report: through the `log` facade when a logger
/// is listening, otherwise straight to stderr.
pub fn report_corruption(err: &Error) {
    if log::log_enabled!(log::Level::Error) {
        log::error!("{}", err);
    } else {
        eprintln!("{}", err);
    }
}

#[inline]
pub(crate) fn rb<S: Store + ?Sized>(s: &S, id: usize) -> &RbNode {
    s.get(id).as_rb()
}

#[inline]
pub(crate) fn rb_mut<S: Store + ?Sized>(s: &mut S, id: usize) -> &mut RbNode {
    s.get_mut(id).as_rb_mut()
}

#[inline]
pub(crate) fn is_red<S: Store + ?Sized>(s: &S, node: Option<usize>) -> bool {
    node.map_or(false, |id| !rb(s, id).black)
}

#[inline]
pub(crate) fn is_black<S: Store + ?Sized>(s: &S, node: Option<usize>) -> bool {
    node.map_or(true, |id| rb(s, id).black)
}

#[inline]
pub(crate) fn set_black<S: Store + ?Sized>(s: &mut S, node: Option<usize>) {
    if let Some(id) = node {
        rb_mut(s, id).black = true
    }
}

#[inline]
pub(crate) fn set_red<S: Store + ?Sized>(s: &mut S, id: usize) {
    rb_mut(s, id).black = false
}

#[inline]
pub(crate) fn set_parent<S: Store + ?Sized>(s: &mut S, node: Option<usize>, parent: Option<usize>) {
    if let Some(id) = node {
        rb_mut(s, id).parent = parent
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

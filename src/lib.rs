//! Package implement intrusive red-black tree and an interval tree on top.
//!
//! Quoting from [Wikipedia][rbt]:
//!
//! > A red–black tree is a self-balancing binary search tree ... Each node
//! > stores an extra bit representing "color" ("red" or "black"), used to
//! > ensure that the tree remains balanced during insertions and deletions.
//!
//! Nodes are embedded in caller owned records, and records live in a caller
//! owned [Store], typically a `Vec` of records. The tree links records by
//! their index in the store and never allocates, copies or frees them.
//!
//! * [RbRoot] is the plain tree handle.
//! * [RbRootCached] additionally tracks the minimum node, in O(1).
//! * [SegRoot] augments every node with the maximum interval end in its
//!   subtree, to answer overlap queries in O(log n + m).
//!
//! - Caller supplied comparators, no key type is imposed on records.
//! - Ascending, descending, pre-order and post-order traversal.
//! - Cursors, that survive removal of the node they just returned.
//! - Guards against double insert and double delete in debug builds.
//! - Not thread safe.
//!
//! Building a tree over a vector of records:
//!
//! ```
//! use rbseg::{Linked, RbNode, RbRoot};
//!
//! struct Rec { rb: RbNode, key: u32 }
//!
//! impl Linked for Rec {
//!     fn as_rb(&self) -> &RbNode { &self.rb }
//!     fn as_rb_mut(&mut self) -> &mut RbNode { &mut self.rb }
//! }
//!
//! let mut recs: Vec<Rec> = [5, 3, 8, 1]
//!     .iter()
//!     .map(|key| Rec { rb: RbNode::new(), key: *key })
//!     .collect();
//!
//! let mut root = RbRoot::new();
//! for id in 0..recs.len() {
//!     root.insert(&mut recs, id, |a, b| a.key.cmp(&b.key)).unwrap();
//! }
//!
//! let keys: Vec<u32> = root.iter(&recs).map(|id| recs[id].key).collect();
//! assert_eq!(keys, vec![1, 3, 5, 8]);
//!
//! let id = root.find(&recs, &8, |rec, key| rec.key.cmp(key)).unwrap();
//! root.delete(&mut recs, id).unwrap();
//! assert_eq!(root.find(&recs, &8, |rec, key| rec.key.cmp(key)), None);
//! ```
//!
//! Overlap queries on half-open intervals:
//!
//! ```
//! use rbseg::{SegNode, SegRoot};
//!
//! let mut segs = vec![
//!     SegNode::new(1, 5),
//!     SegNode::new(2, 9),
//!     SegNode::new(6, 10),
//!     SegNode::new(13, 15),
//! ];
//! let mut root = SegRoot::new();
//! for id in 0..segs.len() {
//!     root.insert(&mut segs, id).unwrap();
//! }
//!
//! let hits: Vec<usize> = root.overlaps(&segs, 4, 8).collect();
//! assert_eq!(hits, vec![0, 1, 2]);
//! assert_eq!(root.overlaps(&segs, 20, 30).next(), None);
//! ```
//!
//! [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, std::fs::read(file_path), format!("read failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod cached;
mod debug;
mod iter;
mod node;
mod rbtree;
mod segtree;

pub use cached::RbRootCached;
pub use iter::{first, last, next, post_first, post_next, pre_next, prev, Cursor, Iter, Order};
pub use node::{report_corruption, Linked, RbNode, Side, Slot, State, Store};
pub use rbtree::{Augment, Noop, RbRoot};
pub use segtree::{
    next_overlap, overlaps, OverlapCursor, Overlaps, SegNode, SegRoot, Segment, SubtreeEnd,
};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    /// Tree invariant found broken by a validate call.
    Fatal(String, String),
    /// Insert of a node that is already linked.
    DoubleInsert(String, String),
    /// Delete of a node that is not linked, removed or never inserted.
    DoubleDelete(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            DoubleInsert(p, msg) => write!(f, "{} DoubleInsert: {}", p, msg),
            DoubleDelete(p, msg) => write!(f, "{} DoubleDelete: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;

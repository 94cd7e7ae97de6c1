// Guards against the caller errors we can cheaply detect: inserting a node
// that is still linked, and deleting a node that is not linked.
//
// Guards are compiled in with debug assertions, or with the `debug-check`
// feature. On violation the store's report hook is called and the mutation
// is skipped, leaving the tree as it was.

use crate::{node::Store, Result};

#[cfg(any(debug_assertions, feature = "debug-check"))]
use crate::{
    node::{rb, State},
    Error,
};

#[cfg(any(debug_assertions, feature = "debug-check"))]
pub(crate) fn link_check<S>(
    s: &S,
    parent: Option<usize>,
    occupant: Option<usize>,
    node: usize,
) -> Result<()>
where
    S: Store + ?Sized,
{
    let res = if occupant == Some(node) {
        err_at!(
            DoubleInsert,
            msg: "rb_insert corruption parent:{:?} slot already holds node {}",
            parent,
            node
        )
    } else if rb(s, node).state() == State::Linked {
        err_at!(
            DoubleInsert,
            msg: "rb_insert corruption node {} is still linked under {:?}",
            node,
            rb(s, node).parent()
        )
    } else {
        Ok(())
    };

    if let Err(err) = &res {
        s.report(err)
    }
    res
}

#[cfg(not(any(debug_assertions, feature = "debug-check")))]
#[inline(always)]
pub(crate) fn link_check<S>(_: &S, _: Option<usize>, _: Option<usize>, _: usize) -> Result<()>
where
    S: Store + ?Sized,
{
    Ok(())
}

#[cfg(any(debug_assertions, feature = "debug-check"))]
pub(crate) fn delete_check<S>(s: &S, node: usize) -> Result<()>
where
    S: Store + ?Sized,
{
    let res = match rb(s, node).state() {
        State::Removed => err_at!(
            DoubleDelete,
            msg: "rb_delete corruption node {} is already removed",
            node
        ),
        State::Detached => err_at!(
            DoubleDelete,
            msg: "rb_delete corruption node {} was never inserted",
            node
        ),
        State::Linked => Ok(()),
    };

    if let Err(err) = &res {
        s.report(err)
    }
    res
}

#[cfg(not(any(debug_assertions, feature = "debug-check")))]
#[inline(always)]
pub(crate) fn delete_check<S>(_: &S, _: usize) -> Result<()>
where
    S: Store + ?Sized,
{
    Ok(())
}

#[cfg(all(test, any(debug_assertions, feature = "debug-check")))]
#[path = "debug_test.rs"]
mod debug_test;

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Generic breadth-first tree walk.
//!
//! The walk is parameterized by an expansion function, so the same engine
//! serves upward ancestor chains (expansion = "the parent, if any"),
//! sibling searches, or subtree scans. State is threaded mutably through
//! every callback; the first callback failure aborts the walk and
//! surfaces the error.

use std::collections::VecDeque;

use pqm_ast::node::XorNode;

/// Walk the tree from `root`, breadth first.
///
/// `visit` runs on every frontier node in FIFO order; `expand` supplies
/// the next frontier nodes. The walk ends when the frontier is empty,
/// `early_exit` reports true after a visit, or a callback fails. The
/// caller guarantees acyclicity: no node may be yielded twice.
pub fn traverse<S, E, X, V>(
    state: &mut S,
    root: XorNode,
    mut expand: X,
    mut visit: V,
    early_exit: Option<&dyn Fn(&S) -> bool>,
) -> Result<(), E>
where
    X: FnMut(&mut S, &XorNode) -> Result<Vec<XorNode>, E>,
    V: FnMut(&mut S, &XorNode) -> Result<(), E>,
{
    let mut frontier = VecDeque::new();
    frontier.push_back(root);

    while let Some(node) = frontier.pop_front() {
        visit(state, &node)?;
        if let Some(stop) = early_exit {
            if stop(state) {
                return Ok(());
            }
        }
        frontier.extend(expand(state, &node)?);
    }
    Ok(())
}

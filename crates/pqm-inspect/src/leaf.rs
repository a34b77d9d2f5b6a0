// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Leaf selection: which token does a caret sit behind?

use pqm_ast::node::AstNode;
use pqm_ast::{NodeId, Position};
use pqm_parser::NodeIdMap;

use crate::error::InspectError;

/// The leaf whose start is nearest to the left of `position`.
///
/// A leaf starting exactly at `position` is not selected: the caret sits
/// to the immediate left of the character at that position, so the
/// preceding leaf is the one under inspection. Returns `None` when no
/// leaf starts before the caret. `leaf_ids` may be in any order but must
/// name completed leaf nodes.
pub fn leaf_at_or_before<'m>(
    position: Position,
    map: &'m NodeIdMap,
    leaf_ids: &[NodeId],
) -> Result<Option<&'m AstNode>, InspectError> {
    let mut best: Option<&AstNode> = None;
    for &id in leaf_ids {
        let leaf = map.expect_ast(id)?;
        if !leaf.range.start.is_before(position) {
            continue;
        }
        match best {
            Some(current) if leaf.range.start.code_unit <= current.range.start.code_unit => {}
            _ => best = Some(leaf),
        }
    }
    Ok(best)
}

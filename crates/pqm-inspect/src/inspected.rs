// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The public inspection record and its assembly.

use std::collections::BTreeMap;

use pqm_ast::node::{NodeKind, XorNode};
use pqm_ast::{NodeId, Position};
use pqm_parser::NodeIdMap;

use crate::error::InspectError;
use crate::leaf::leaf_at_or_before;
use crate::traverse::traverse;
use crate::visitor::{caret_name, InspectState};

/// Identifier text visible at the caret -> the node that binds it.
///
/// Keys are unique; iteration order is lexicographic, which consumers
/// must not read meaning into beyond determinism.
pub type ScopeMap = BTreeMap<String, XorNode>;

/// An identifier the caret rests on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionName {
    /// The name-bearing leaf.
    pub node: XorNode,
    /// Its spelling.
    pub literal: String,
}

/// The caret-at-identifier outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionIdentifier {
    /// The identifier resolves to a binding visible at the caret.
    Local {
        identifier: PositionName,
        definition: XorNode,
    },
    /// The identifier resolves to nothing in scope.
    Undefined { identifier: PositionName },
}

impl PositionIdentifier {
    pub fn identifier(&self) -> &PositionName {
        match self {
            PositionIdentifier::Local { identifier, .. } => identifier,
            PositionIdentifier::Undefined { identifier } => identifier,
        }
    }
}

/// The syntactic role of a visited node relative to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeRole {
    /// The outermost node of the document.
    Root,
    /// The name side of a `name = value` pair.
    BindingKey { name: String },
    /// The value side of a let binding.
    LetBindingValue { name: String },
    /// The value side of a record field.
    FieldValue { name: String },
    /// The value side of a section member.
    SectionMemberValue { name: String },
    /// The body of an each expression.
    EachBody,
    /// The `in` body of a let expression.
    LetBody,
    /// A formal parameter; `index` counts parameters, not child slots.
    FunctionParameter { index: u32 },
    /// The body of a function expression.
    FunctionBody,
    /// Any other child position.
    Child {
        parent: NodeKind,
        slot: Option<u32>,
    },
}

/// One entry of the ancestor chain, nearest enclosing first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AncestorNode {
    pub node: XorNode,
    pub role: NodeRole,
}

/// The semantic context at a caret position.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inspected {
    /// Ancestors of the selected leaf, the leaf itself first.
    pub nodes: Vec<AncestorNode>,
    /// Bindings visible at the caret.
    pub scope: ScopeMap,
    /// The caret identifier's resolution, when the caret rests on one.
    pub position_identifier: Option<PositionIdentifier>,
}

impl Inspected {
    /// Inspect `position` against a parsed document.
    ///
    /// Pure: reads the map, owns its accumulator, returns. When no leaf
    /// starts before the caret there is nothing to inspect and the empty
    /// record is returned.
    pub fn try_from(
        position: Position,
        map: &NodeIdMap,
        leaf_ids: &[NodeId],
    ) -> Result<Inspected, InspectError> {
        let Some(leaf) = leaf_at_or_before(position, map, leaf_ids)? else {
            return Ok(Inspected::default());
        };

        let root = XorNode::from_ast(leaf);
        let mut state = InspectState::new(map, caret_name(map, leaf));
        traverse(
            &mut state,
            root,
            |state, node| Ok(state.map().parent_xor(node.id).into_iter().collect()),
            |state, node| state.visit(node),
            None,
        )?;
        Ok(state.finish())
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Position-driven inspection for parsed Power Query / M documents.
//!
//! Given a parsed document (its [`pqm_parser::NodeIdMap`] and leaf-id
//! list) and a caret position, [`Inspected::try_from`] produces the
//! semantic context at that caret: the chain of enclosing ancestors, the
//! identifier bindings in scope, and - when the caret rests on an
//! identifier - a resolution to the node that defines it.
//!
//! The engine works over the mixed tree a real editor session produces:
//! completed nodes and the context nodes an interrupted parse leaves
//! behind. Each inspection is a pure function of its inputs; many may
//! read the same map concurrently once the parser has finished.

mod error;
mod inspected;
mod leaf;
mod traverse;
mod visitor;

pub use error::InspectError;
pub use inspected::{
    AncestorNode, Inspected, NodeRole, PositionIdentifier, PositionName, ScopeMap,
};
pub use leaf::leaf_at_or_before;
pub use traverse::traverse;

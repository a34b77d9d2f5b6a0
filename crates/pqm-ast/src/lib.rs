// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for the Power Query / M formula language.
//!
//! This crate defines the token and node types shared between the lexer,
//! the parser, and the inspection engine.

pub mod node;
pub mod position;
pub mod token;

pub use node::{AstNode, ContextNode, NodeKind, XorNode, XorVariant};
pub use position::{Position, TokenPosition, TokenRange};
pub use token::{Token, TokenKind};

/// Unique identifier for syntax tree nodes.
///
/// Assigned by the parser; stable for the lifetime of one parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

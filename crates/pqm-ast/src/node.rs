// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree node records and the uniform node handle.
//!
//! A parsed document is stored flat: nodes live in id-keyed maps owned by
//! the parser's `NodeIdMap`, and parent/child structure is kept as id
//! links. Two node families exist side by side:
//!
//! - [`AstNode`]: a completely parsed node, leaf or interior.
//! - [`ContextNode`]: an in-progress production left behind when parsing
//!   was interrupted. It knows its intended kind but may have missing
//!   children.
//!
//! [`XorNode`] is the cheap copyable handle over either family that the
//! inspection engine traffics in.

use crate::position::{TokenPosition, TokenRange};
use crate::NodeId;

/// The syntactic kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A fixed lexical element: keyword, operator, punctuation, `@`.
    Constant,
    Identifier,
    /// A record-field or section-member name; admits keywords and quoted
    /// spellings.
    GeneralizedIdentifier,
    LiteralExpression,
    IdentifierExpression,
    EachExpression,
    FunctionExpression,
    ParameterList,
    Parameter,
    LetExpression,
    IdentifierPairedExpression,
    GeneralizedIdentifierPairedExpression,
    RecordExpression,
    RecordLiteral,
    ListExpression,
    ParenthesizedExpression,
    UnaryExpression,
    BinaryOpExpression,
    IfExpression,
    Section,
    SectionMember,
}

/// A completely parsed node.
///
/// `literal` is present exactly on leaves and holds the token text (the
/// identifier spelling, the literal source, the constant's lexeme).
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// This node's slot among its parent's children. Absent on the root.
    pub attribute_index: Option<u32>,
    pub range: TokenRange,
    pub literal: Option<String>,
}

impl AstNode {
    /// Whether this leaf is one of the two name-bearing kinds.
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, NodeKind::Identifier | NodeKind::GeneralizedIdentifier)
    }

    /// Whether this leaf is the inclusive-scope constant `@`.
    pub fn is_inclusive_constant(&self) -> bool {
        self.kind == NodeKind::Constant && self.literal.as_deref() == Some("@")
    }
}

/// An in-progress production the parser never finished.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub attribute_index: Option<u32>,
    /// Where the production began, if any token was consumed under it.
    pub start: Option<TokenPosition>,
}

/// Which family a node handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum XorVariant {
    Ast,
    Context,
}

/// Uniform handle over an AST node or a parser-context node.
///
/// Cheap to copy; the node record itself is resolved through the
/// `NodeIdMap` when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XorNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub variant: XorVariant,
}

impl XorNode {
    pub fn from_ast(node: &AstNode) -> Self {
        Self { id: node.id, kind: node.kind, variant: XorVariant::Ast }
    }

    pub fn from_context(node: &ContextNode) -> Self {
        Self { id: node.id, kind: node.kind, variant: XorVariant::Context }
    }

    pub fn is_ast(&self) -> bool {
        self.variant == XorVariant::Ast
    }

    pub fn is_context(&self) -> bool {
        self.variant == XorVariant::Context
    }
}

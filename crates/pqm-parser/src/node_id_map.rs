// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The document-wide id-indexed structural map.
//!
//! Every node of a parsed document lives in exactly one of two indexes:
//! completed nodes in `ast_nodes`, interrupted productions in
//! `context_nodes`. Structure is kept as id links: `parent_ids` is a
//! partial function (absent at the root), `child_ids` lists children in
//! source order.

use std::collections::HashMap;

use pqm_ast::node::{AstNode, ContextNode, XorNode};
use pqm_ast::{NodeId, NodeKind, TokenRange};
use thiserror::Error;

/// A structural contradiction in the map.
///
/// These indicate a bug in the producer (or a caller holding ids from a
/// different document) and are surfaced verbatim to inspection callers.
#[derive(Debug, Clone, Error)]
pub enum MapError {
    #[error("node {0:?} is not in the map")]
    MissingNode(NodeId),

    #[error("node {0:?} is a context node where a completed node was required")]
    NotAst(NodeId),

    #[error("node {0:?} is a completed node where a context node was required")]
    NotContext(NodeId),
}

/// Random-access index over one parsed document.
#[derive(Debug, Default)]
pub struct NodeIdMap {
    ast_nodes: HashMap<NodeId, AstNode>,
    context_nodes: HashMap<NodeId, ContextNode>,
    parent_ids: HashMap<NodeId, NodeId>,
    child_ids: HashMap<NodeId, Vec<NodeId>>,
}

impl NodeIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn ast_node(&self, id: NodeId) -> Option<&AstNode> {
        self.ast_nodes.get(&id)
    }

    pub fn context_node(&self, id: NodeId) -> Option<&ContextNode> {
        self.context_nodes.get(&id)
    }

    /// The completed node under `id`, or an invariant failure when the id
    /// is absent or still a context node.
    pub fn expect_ast(&self, id: NodeId) -> Result<&AstNode, MapError> {
        match self.ast_nodes.get(&id) {
            Some(node) => Ok(node),
            None if self.context_nodes.contains_key(&id) => Err(MapError::NotAst(id)),
            None => Err(MapError::MissingNode(id)),
        }
    }

    pub fn expect_context(&self, id: NodeId) -> Result<&ContextNode, MapError> {
        match self.context_nodes.get(&id) {
            Some(node) => Ok(node),
            None if self.ast_nodes.contains_key(&id) => Err(MapError::NotContext(id)),
            None => Err(MapError::MissingNode(id)),
        }
    }

    /// A uniform handle for `id`, preferring the completed form when both
    /// indexes have an entry (they never should).
    pub fn xor(&self, id: NodeId) -> Option<XorNode> {
        if let Some(node) = self.ast_nodes.get(&id) {
            return Some(XorNode::from_ast(node));
        }
        self.context_nodes.get(&id).map(XorNode::from_context)
    }

    pub fn expect_xor(&self, id: NodeId) -> Result<XorNode, MapError> {
        self.xor(id).ok_or(MapError::MissingNode(id))
    }

    pub fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        self.parent_ids.get(&id).copied()
    }

    /// The parent handle, or `None` at the root.
    pub fn parent_xor(&self, id: NodeId) -> Option<XorNode> {
        self.parent_id(id).and_then(|parent| self.xor(parent))
    }

    /// Children of `id` in source order. Empty for leaves.
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.child_ids.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of `id` whose kind lies in `kinds`, preserving order.
    pub fn children_of_kind(&self, id: NodeId, kinds: &[NodeKind]) -> Vec<XorNode> {
        self.child_ids(id)
            .iter()
            .filter_map(|&child| self.xor(child))
            .filter(|child| kinds.contains(&child.kind))
            .collect()
    }

    /// Whether `id` is a completed node with no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.ast_nodes.contains_key(&id) && self.child_ids(id).is_empty()
    }

    /// The recorded slot of `id` within its parent, from either index.
    pub fn attribute_index(&self, id: NodeId) -> Option<u32> {
        self.ast_nodes
            .get(&id)
            .map(|n| n.attribute_index)
            .or_else(|| self.context_nodes.get(&id).map(|n| n.attribute_index))
            .flatten()
    }

    /// The deepest-right completed leaf under `id` satisfying `predicate`.
    ///
    /// Context nodes along the way are descended through, never returned.
    pub fn right_most_leaf_where(
        &self,
        id: NodeId,
        predicate: &dyn Fn(&AstNode) -> bool,
    ) -> Option<&AstNode> {
        let children = self.child_ids(id);
        if children.is_empty() {
            return match self.ast_nodes.get(&id) {
                Some(node) if predicate(node) => Some(node),
                _ => None,
            };
        }
        children
            .iter()
            .rev()
            .find_map(|&child| self.right_most_leaf_where(child, predicate))
    }

    pub fn right_most_leaf(&self, id: NodeId) -> Option<&AstNode> {
        self.right_most_leaf_where(id, &|_| true)
    }

    /// The deepest-left completed leaf under `id`.
    pub fn left_most_leaf(&self, id: NodeId) -> Option<&AstNode> {
        let children = self.child_ids(id);
        if children.is_empty() {
            return self.ast_nodes.get(&id);
        }
        children.iter().find_map(|&child| self.left_most_leaf(child))
    }

    /// All ids in the map, either index. Order is unspecified.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ast_nodes.keys().chain(self.context_nodes.keys()).copied()
    }

    // =========================================================================
    // Construction (parser-internal)
    // =========================================================================

    pub(crate) fn insert_ast(&mut self, node: AstNode) {
        self.ast_nodes.insert(node.id, node);
    }

    pub(crate) fn insert_context(&mut self, node: ContextNode) {
        self.context_nodes.insert(node.id, node);
    }

    /// Append `child` to `parent`'s child list and record the back link.
    pub(crate) fn link_child(&mut self, parent: NodeId, child: NodeId) {
        self.child_ids.entry(parent).or_default().push(child);
        self.parent_ids.insert(child, parent);
    }

    /// Number of children currently linked under `parent`.
    pub(crate) fn child_count(&self, parent: NodeId) -> u32 {
        self.child_ids(parent).len() as u32
    }

    /// Detach `child`, which must be the last child of `parent`.
    pub(crate) fn unlink_last_child(&mut self, parent: NodeId, child: NodeId) {
        let children = self.child_ids.entry(parent).or_default();
        debug_assert_eq!(children.last(), Some(&child));
        children.pop();
        self.parent_ids.remove(&child);
    }

    pub(crate) fn set_attribute_index(&mut self, id: NodeId, attribute_index: Option<u32>) {
        if let Some(node) = self.ast_nodes.get_mut(&id) {
            node.attribute_index = attribute_index;
        } else if let Some(node) = self.context_nodes.get_mut(&id) {
            node.attribute_index = attribute_index;
        }
    }

    /// Replace the context node `id` with its completed form.
    pub(crate) fn promote_context(&mut self, id: NodeId, range: TokenRange) -> Result<(), MapError> {
        let context = self.context_nodes.remove(&id).ok_or(MapError::NotContext(id))?;
        self.insert_ast(AstNode {
            id,
            kind: context.kind,
            attribute_index: context.attribute_index,
            range,
            literal: None,
        });
        Ok(())
    }
}

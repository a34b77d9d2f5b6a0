// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The per-ancestor inspection visitor.
//!
//! Visited nearest-enclosing-first, each ancestor contributes four things:
//! its descriptor, its scope injections, a chance to resolve the caret
//! identifier, and assignment-key bookkeeping. Scope insertion is first
//! write wins: the binding from a deeper ancestor shadows any outer one.
//!
//! Context nodes flow through the same table as completed nodes. A
//! context node missing the child that would normally supply a binding
//! contributes nothing; that is never an error.

use std::collections::HashMap;

use pqm_ast::node::{NodeKind, XorNode};
use pqm_ast::NodeId;
use pqm_parser::NodeIdMap;

use crate::error::InspectError;
use crate::inspected::{
    AncestorNode, Inspected, NodeRole, PositionIdentifier, PositionName, ScopeMap,
};

/// The mutable accumulator threaded through the ancestor walk.
pub(crate) struct InspectState<'a> {
    map: &'a NodeIdMap,
    /// The name the caret rests on, if the selected leaf is one.
    caret: Option<PositionName>,
    /// Whether the caret name sits behind the inclusive-scope `@`.
    caret_inclusive: bool,
    nodes: Vec<AncestorNode>,
    scope: ScopeMap,
    position_identifier: Option<PositionIdentifier>,
    /// Binding-LHS identifier node -> the binding's value node.
    assignment_keys: HashMap<NodeId, XorNode>,
}

impl<'a> InspectState<'a> {
    pub(crate) fn new(map: &'a NodeIdMap, caret: Option<(PositionName, bool)>) -> Self {
        let (caret, caret_inclusive) = match caret {
            Some((name, inclusive)) => (Some(name), inclusive),
            None => (None, false),
        };
        Self {
            map,
            caret,
            caret_inclusive,
            nodes: Vec::new(),
            scope: ScopeMap::new(),
            position_identifier: None,
            assignment_keys: HashMap::new(),
        }
    }

    pub(crate) fn map(&self) -> &'a NodeIdMap {
        self.map
    }

    /// Visit one ancestor: descriptor, scope, resolution, bookkeeping.
    pub(crate) fn visit(&mut self, node: &XorNode) -> Result<(), InspectError> {
        let came_from = self.nodes.last().map(|ancestor| ancestor.node.id);
        let role = self.classify_role(node);
        self.nodes.push(AncestorNode { node: *node, role });

        match node.kind {
            NodeKind::EachExpression => self.inspect_each(node),
            NodeKind::FunctionExpression => self.inspect_function(node),
            NodeKind::LetExpression => self.inspect_let(node, came_from),
            NodeKind::RecordExpression | NodeKind::RecordLiteral => self.inspect_record(node),
            NodeKind::Section => self.inspect_section(node),
            _ => {}
        }
        Ok(())
    }

    /// Freeze the accumulator into the public record, classifying an
    /// unmatched caret identifier as undefined.
    pub(crate) fn finish(self) -> Inspected {
        let position_identifier = match self.position_identifier {
            Some(found) => Some(found),
            None => self
                .caret
                .map(|identifier| PositionIdentifier::Undefined { identifier }),
        };
        Inspected {
            nodes: self.nodes,
            scope: self.scope,
            position_identifier,
        }
    }

    // =========================================================================
    // Step 1: ancestor descriptors
    // =========================================================================

    fn classify_role(&self, node: &XorNode) -> NodeRole {
        let Some(parent) = self.map.parent_xor(node.id) else {
            return NodeRole::Root;
        };
        let slot = self.map.attribute_index(node.id);
        let fallback = NodeRole::Child { parent: parent.kind, slot };

        match parent.kind {
            NodeKind::IdentifierPairedExpression
            | NodeKind::GeneralizedIdentifierPairedExpression => {
                match self.binding_key(parent.id) {
                    Some((key_id, name)) if key_id == node.id => NodeRole::BindingKey { name },
                    Some((_, name))
                        if node.kind != NodeKind::Constant
                            && self.map.child_ids(parent.id).last() == Some(&node.id) =>
                    {
                        match self.map.parent_xor(parent.id).map(|g| g.kind) {
                            Some(NodeKind::LetExpression) => NodeRole::LetBindingValue { name },
                            Some(NodeKind::SectionMember) => {
                                NodeRole::SectionMemberValue { name }
                            }
                            Some(NodeKind::RecordExpression) | Some(NodeKind::RecordLiteral) => {
                                NodeRole::FieldValue { name }
                            }
                            _ => fallback,
                        }
                    }
                    _ => fallback,
                }
            }
            NodeKind::EachExpression if node.kind != NodeKind::Constant => NodeRole::EachBody,
            NodeKind::LetExpression
                if node.kind != NodeKind::Constant
                    && node.kind != NodeKind::IdentifierPairedExpression =>
            {
                NodeRole::LetBody
            }
            NodeKind::FunctionExpression
                if node.kind != NodeKind::Constant && node.kind != NodeKind::ParameterList =>
            {
                NodeRole::FunctionBody
            }
            NodeKind::ParameterList if node.kind == NodeKind::Parameter => {
                let index = self
                    .map
                    .children_of_kind(parent.id, &[NodeKind::Parameter])
                    .iter()
                    .position(|param| param.id == node.id)
                    .unwrap_or(0) as u32;
                NodeRole::FunctionParameter { index }
            }
            _ => fallback,
        }
    }

    // =========================================================================
    // Step 2: scope injection
    // =========================================================================

    fn inspect_each(&mut self, node: &XorNode) {
        // `each` has no explicit parameter node; the expression itself
        // stands in as the binding site of `_`.
        self.add_to_scope("_", *node);
    }

    fn inspect_function(&mut self, node: &XorNode) {
        let Some(param_list) = self
            .map
            .children_of_kind(node.id, &[NodeKind::ParameterList])
            .into_iter()
            .next()
        else {
            return;
        };
        for param in self.map.children_of_kind(param_list.id, &[NodeKind::Parameter]) {
            // The parameter name is its first identifier child; an `as`
            // ascription contributes a second one which must not bind.
            let Some(name) = self
                .map
                .children_of_kind(param.id, &[NodeKind::Identifier])
                .into_iter()
                .next()
            else {
                continue;
            };
            let Some(literal) = self.map.ast_node(name.id).and_then(|leaf| leaf.literal.clone())
            else {
                continue;
            };
            self.add_to_scope(&literal, param);
        }
    }

    /// Let bindings become visible after their own definition: inside the
    /// `in` body every binding is in scope, inside a binding's value only
    /// the textually preceding ones are - unless the caret name carries
    /// `@`, which makes the binding being defined visible to itself.
    fn inspect_let(&mut self, node: &XorNode, came_from: Option<NodeId>) {
        let limit = came_from.and_then(|id| {
            let from = self.map.xor(id)?;
            if from.kind == NodeKind::IdentifierPairedExpression
                && self.map.parent_id(id) == Some(node.id)
            {
                self.map.attribute_index(id)
            } else {
                None
            }
        });

        for paired in self
            .map
            .children_of_kind(node.id, &[NodeKind::IdentifierPairedExpression])
        {
            let Some((key_id, literal)) = self.binding_key(paired.id) else { continue };
            let Some(value) = self.binding_value(paired.id, key_id) else { continue };
            self.record_assignment_key(key_id, &literal, value);

            let visible = match limit {
                None => true,
                Some(limit_index) => {
                    let index = self.map.attribute_index(paired.id).unwrap_or(u32::MAX);
                    index < limit_index || (index == limit_index && self.caret_inclusive)
                }
            };
            if visible {
                self.add_to_scope(&literal, value);
            }
        }
    }

    /// Record fields are mutually visible, in any order.
    fn inspect_record(&mut self, node: &XorNode) {
        for paired in self
            .map
            .children_of_kind(node.id, &[NodeKind::GeneralizedIdentifierPairedExpression])
        {
            self.inject_binding(paired.id);
        }
    }

    /// Section members are mutually visible, in any order.
    fn inspect_section(&mut self, node: &XorNode) {
        for member in self.map.children_of_kind(node.id, &[NodeKind::SectionMember]) {
            for paired in self
                .map
                .children_of_kind(member.id, &[NodeKind::IdentifierPairedExpression])
            {
                self.inject_binding(paired.id);
            }
        }
    }

    fn inject_binding(&mut self, paired: NodeId) {
        let Some((key_id, literal)) = self.binding_key(paired) else { return };
        let Some(value) = self.binding_value(paired, key_id) else { return };
        self.record_assignment_key(key_id, &literal, value);
        self.add_to_scope(&literal, value);
    }

    /// The name leaf of a `name = value` pair. Quoted and generalized
    /// keys may span several tokens; the right-most name leaf is the one
    /// that counts.
    fn binding_key(&self, paired: NodeId) -> Option<(NodeId, String)> {
        let map = self.map;
        let key = map
            .children_of_kind(
                paired,
                &[NodeKind::Identifier, NodeKind::GeneralizedIdentifier],
            )
            .into_iter()
            .next()?;
        let leaf = map.right_most_leaf_where(key.id, &|node| node.is_identifier())?;
        Some((leaf.id, leaf.literal.clone()?))
    }

    /// The value node of a `name = value` pair, absent while the parser
    /// has not produced one.
    fn binding_value(&self, paired: NodeId, key: NodeId) -> Option<XorNode> {
        let children = self.map.child_ids(paired);
        let &last = children.last()?;
        if last == key {
            return None;
        }
        let node = self.map.xor(last)?;
        (node.kind != NodeKind::Constant).then_some(node)
    }

    // =========================================================================
    // Steps 3 and 4: caret resolution and assignment keys
    // =========================================================================

    /// First write wins: a deeper ancestor's binding shadows outer ones.
    fn add_to_scope(&mut self, name: &str, definition: XorNode) {
        if self.scope.contains_key(name) {
            return;
        }
        self.scope.insert(name.to_string(), definition);

        if self.position_identifier.is_some() {
            return;
        }
        if let Some(caret) = &self.caret {
            if caret.literal == name {
                self.position_identifier = Some(PositionIdentifier::Local {
                    identifier: caret.clone(),
                    definition,
                });
            }
        }
    }

    /// Remember the value node behind a binding's LHS identifier. When
    /// the caret sits on that very identifier, this resolves it without
    /// waiting for the name to become visible in scope.
    fn record_assignment_key(&mut self, key: NodeId, name: &str, value: XorNode) {
        self.assignment_keys.insert(key, value);

        if self.position_identifier.is_some() {
            return;
        }
        let Some(caret) = &self.caret else { return };
        if caret.node.id == key && !self.scope.contains_key(name) {
            self.scope.insert(name.to_string(), value);
            self.position_identifier = Some(PositionIdentifier::Local {
                identifier: caret.clone(),
                definition: value,
            });
        }
    }
}

/// Identify the name under the caret, if the selected leaf is one.
///
/// Two shapes qualify: an identifier leaf, and the `@` constant whose
/// parent identifier-expression supplies the name. The second value is
/// whether the name sits behind `@` (an inclusive, self-referencing use).
pub(crate) fn caret_name(
    map: &NodeIdMap,
    leaf: &pqm_ast::node::AstNode,
) -> Option<(PositionName, bool)> {
    if leaf.is_identifier() {
        let literal = leaf.literal.clone()?;
        let node = XorNode::from_ast(leaf);
        let inclusive = match map.parent_xor(leaf.id) {
            Some(parent) if parent.kind == NodeKind::IdentifierExpression => map
                .children_of_kind(parent.id, &[NodeKind::Constant])
                .iter()
                .any(|constant| {
                    map.ast_node(constant.id)
                        .map(|c| c.literal.as_deref() == Some("@"))
                        .unwrap_or(false)
                }),
            _ => false,
        };
        return Some((PositionName { node, literal }, inclusive));
    }

    if leaf.is_inclusive_constant() {
        let parent = map.parent_xor(leaf.id)?;
        if parent.kind != NodeKind::IdentifierExpression {
            return None;
        }
        let name = map.right_most_leaf_where(parent.id, &|node| node.is_identifier())?;
        let literal = name.literal.clone()?;
        return Some((PositionName { node: XorNode::from_ast(name), literal }, true));
    }

    None
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.
//!
//! Nodes are built arena-style, straight into the [`NodeIdMap`]: opening a
//! production inserts a context node linked under the enclosing open
//! production, consumed tokens become leaf nodes, and closing a production
//! promotes its context node to a completed node. A parse error leaves the
//! open productions behind as context nodes, which is exactly the partial
//! tree shape downstream position inspection is specified against.

use pqm_ast::node::{AstNode, ContextNode};
use pqm_ast::token::{Token, TokenKind};
use pqm_ast::{NodeId, NodeKind, TokenPosition, TokenRange};
use thiserror::Error;

use crate::node_id_map::NodeIdMap;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// A parse error.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub position: TokenPosition,
}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, position: TokenPosition) -> Self {
        Self {
            message: format!("expected {}, found {}", expected, found.display_name()),
            position,
        }
    }
}

/// The result of parsing: the structural map plus whatever was salvaged.
#[derive(Debug)]
pub struct ParseResult {
    pub map: NodeIdMap,
    /// The outermost node - completed on success, a context node when the
    /// parse was interrupted, `None` for an empty document.
    pub root: Option<NodeId>,
    /// Every leaf node id, in source order.
    pub leaf_ids: Vec<NodeId>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The parser for M source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    map: NodeIdMap,
    leaf_ids: Vec<NodeId>,
    /// Stack of open productions; the top is where new nodes attach.
    open_stack: Vec<NodeId>,
    /// Counter for generating unique NodeIds.
    next_node_id: u32,
    /// First node ever allocated, the root fallback for broken documents.
    first_node: Option<NodeId>,
    /// Collected errors during parsing.
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.is_empty() {
            let zero = TokenPosition::new(0, 0, 0);
            tokens.push(Token { kind: TokenKind::Eof, range: TokenRange::new(zero, zero) });
        }
        Self {
            tokens,
            pos: 0,
            map: NodeIdMap::new(),
            leaf_ids: Vec::new(),
            open_stack: Vec::new(),
            next_node_id: 0,
            first_node: None,
            errors: Vec::new(),
        }
    }

    /// Parse a document: an expression, or a section when the input leads
    /// with `section` (optionally behind a literal attribute record).
    pub fn parse(mut self) -> ParseResult {
        let root = if self.at_end() {
            None
        } else {
            let parsed = if self.is_section_document() {
                self.parse_section()
            } else {
                self.parse_expression()
            };
            match parsed {
                Ok(id) => {
                    if !self.at_end() {
                        self.errors.push(ParseError::expected(
                            "end of input",
                            self.current_kind(),
                            self.current().range.start,
                        ));
                    }
                    Some(id)
                }
                Err(error) => {
                    self.errors.push(error);
                    self.open_stack.first().copied().or(self.first_node)
                }
            }
        };

        ParseResult {
            map: self.map,
            root,
            leaf_ids: self.leaf_ids,
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn check_name(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_) | TokenKind::QuotedIdent(_))
    }

    // =========================================================================
    // Node Construction
    // =========================================================================

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Begin a production: insert a context node under the current open
    /// production and make it the new attachment point.
    fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_id();
        let start = (!self.at_end()).then(|| self.current().range.start);
        let parent = self.open_stack.last().copied();
        let attribute_index = parent.map(|p| self.map.child_count(p));
        self.map.insert_context(ContextNode { id, kind, attribute_index, start });
        if let Some(parent) = parent {
            self.map.link_child(parent, id);
        }
        if self.first_node.is_none() {
            self.first_node = Some(id);
        }
        self.open_stack.push(id);
        id
    }

    /// Begin a production that wraps an already-parsed node: the new
    /// context takes over `child`'s slot and adopts it as first child.
    /// Used for left-recursive binary expressions.
    fn open_adopting(&mut self, kind: NodeKind, child: NodeId) -> NodeId {
        let id = self.next_id();
        let parent = self.map.parent_id(child);
        let slot = self.map.attribute_index(child);
        let start = self.map.left_most_leaf(child).map(|leaf| leaf.range.start);

        if let Some(parent) = parent {
            self.map.unlink_last_child(parent, child);
        }
        self.map.insert_context(ContextNode { id, kind, attribute_index: slot, start });
        if let Some(parent) = parent {
            self.map.link_child(parent, id);
        }
        self.map.link_child(id, child);
        self.map.set_attribute_index(child, Some(0));
        if self.first_node.is_none() {
            self.first_node = Some(id);
        }
        self.open_stack.push(id);
        id
    }

    /// Finish a production: promote its context node to a completed node
    /// spanning its first through last leaf.
    fn close(&mut self, id: NodeId) {
        let popped = self.open_stack.pop();
        debug_assert_eq!(popped, Some(id));
        let range = match (self.map.left_most_leaf(id), self.map.right_most_leaf(id)) {
            (Some(first), Some(last)) => TokenRange::new(first.range.start, last.range.end),
            _ => {
                let at = self.current().range.start;
                TokenRange::new(at, at)
            }
        };
        let _ = self.map.promote_context(id, range);
    }

    /// Consume the current token as a leaf node of the given kind.
    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let token = self.advance();
        let id = self.next_id();
        let parent = self.open_stack.last().copied();
        let attribute_index = parent.map(|p| self.map.child_count(p));
        self.map.insert_ast(AstNode {
            id,
            kind,
            attribute_index,
            range: token.range,
            literal: token.kind.literal_text().map(str::to_string),
        });
        if let Some(parent) = parent {
            self.map.link_child(parent, id);
        }
        if self.first_node.is_none() {
            self.first_node = Some(id);
        }
        self.leaf_ids.push(id);
        id
    }

    /// Consume the current token as a `Constant` leaf.
    fn eat_constant(&mut self) -> NodeId {
        self.leaf(NodeKind::Constant)
    }

    fn expect_constant(&mut self, kind: &TokenKind) -> Result<NodeId, ParseError> {
        if self.check(kind) {
            Ok(self.eat_constant())
        } else {
            Err(ParseError::expected(
                &kind.display_name(),
                self.current_kind(),
                self.current().range.start,
            ))
        }
    }

    // =========================================================================
    // Document Dispatch
    // =========================================================================

    fn is_section_document(&self) -> bool {
        match self.current_kind() {
            TokenKind::Section => true,
            // An attribute record may precede `section`; skip to its
            // matching bracket and look one past it.
            TokenKind::LBracket => {
                let mut depth = 0usize;
                let mut i = self.pos;
                while let Some(token) = self.tokens.get(i) {
                    match token.kind {
                        TokenKind::LBracket => depth += 1,
                        TokenKind::RBracket => {
                            depth = depth.saturating_sub(1);
                            if depth == 0 {
                                return matches!(
                                    self.tokens.get(i + 1).map(|t| &t.kind),
                                    Some(TokenKind::Section)
                                );
                            }
                        }
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    i += 1;
                }
                false
            }
            _ => false,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Let => self.parse_let_expression(),
            TokenKind::Each => self.parse_each_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::LParen if self.is_function_ahead() => self.parse_function_expression(),
            _ => self.parse_binary_expression(0),
        }
    }

    fn parse_let_expression(&mut self) -> Result<NodeId, ParseError> {
        let let_expr = self.open(NodeKind::LetExpression);
        self.expect_constant(&TokenKind::Let)?;
        loop {
            self.parse_identifier_paired_expression()?;
            if self.check(&TokenKind::Comma) {
                self.eat_constant();
            } else {
                break;
            }
        }
        self.expect_constant(&TokenKind::In)?;
        self.parse_expression()?;
        self.close(let_expr);
        Ok(let_expr)
    }

    fn parse_each_expression(&mut self) -> Result<NodeId, ParseError> {
        let each = self.open(NodeKind::EachExpression);
        self.expect_constant(&TokenKind::Each)?;
        self.parse_expression()?;
        self.close(each);
        Ok(each)
    }

    fn parse_if_expression(&mut self) -> Result<NodeId, ParseError> {
        let if_expr = self.open(NodeKind::IfExpression);
        self.expect_constant(&TokenKind::If)?;
        self.parse_expression()?;
        self.expect_constant(&TokenKind::Then)?;
        self.parse_expression()?;
        self.expect_constant(&TokenKind::Else)?;
        self.parse_expression()?;
        self.close(if_expr);
        Ok(if_expr)
    }

    fn parse_function_expression(&mut self) -> Result<NodeId, ParseError> {
        let func = self.open(NodeKind::FunctionExpression);
        let params = self.open(NodeKind::ParameterList);
        self.expect_constant(&TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            loop {
                self.parse_parameter()?;
                if self.check(&TokenKind::Comma) {
                    self.eat_constant();
                } else {
                    break;
                }
            }
        }
        self.expect_constant(&TokenKind::RParen)?;
        self.close(params);
        self.expect_constant(&TokenKind::FatArrow)?;
        self.parse_expression()?;
        self.close(func);
        Ok(func)
    }

    fn parse_parameter(&mut self) -> Result<NodeId, ParseError> {
        let param = self.open(NodeKind::Parameter);
        if self.check(&TokenKind::Optional) {
            self.eat_constant();
        }
        if !self.check_name() {
            return Err(ParseError::expected(
                "a parameter name",
                self.current_kind(),
                self.current().range.start,
            ));
        }
        self.leaf(NodeKind::Identifier);
        // Optional ascription: `as <type name>`.
        if self.check(&TokenKind::As) {
            self.eat_constant();
            if !self.check_name() {
                return Err(ParseError::expected(
                    "a type name",
                    self.current_kind(),
                    self.current().range.start,
                ));
            }
            self.leaf(NodeKind::Identifier);
        }
        self.close(param);
        Ok(param)
    }

    fn parse_binary_expression(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_unary_expression()?;
        loop {
            let Some(bp) = binary_binding_power(self.current_kind()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            let node = self.open_adopting(NodeKind::BinaryOpExpression, lhs);
            self.eat_constant();
            self.parse_binary_expression(bp + 1)?;
            self.close(node);
            lhs = node;
        }
        Ok(lhs)
    }

    fn parse_unary_expression(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Not | TokenKind::Minus | TokenKind::Plus => {
                let unary = self.open(NodeKind::UnaryExpression);
                self.eat_constant();
                self.parse_unary_expression()?;
                self.close(unary);
                Ok(unary)
            }
            _ => self.parse_primary_expression(),
        }
    }

    fn parse_primary_expression(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Number(_)
            | TokenKind::Text(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => Ok(self.leaf(NodeKind::LiteralExpression)),
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_) | TokenKind::At => {
                self.parse_identifier_expression()
            }
            TokenKind::LParen => self.parse_parenthesized_expression(),
            TokenKind::LBracket => self.parse_record(NodeKind::RecordExpression),
            TokenKind::LBrace => self.parse_list_expression(),
            _ => Err(ParseError::expected(
                "an expression",
                self.current_kind(),
                self.current().range.start,
            )),
        }
    }

    fn parse_identifier_expression(&mut self) -> Result<NodeId, ParseError> {
        let expr = self.open(NodeKind::IdentifierExpression);
        if self.check(&TokenKind::At) {
            self.eat_constant();
        }
        if !self.check_name() {
            return Err(ParseError::expected(
                "an identifier",
                self.current_kind(),
                self.current().range.start,
            ));
        }
        self.leaf(NodeKind::Identifier);
        self.close(expr);
        Ok(expr)
    }

    fn parse_parenthesized_expression(&mut self) -> Result<NodeId, ParseError> {
        let paren = self.open(NodeKind::ParenthesizedExpression);
        self.expect_constant(&TokenKind::LParen)?;
        self.parse_expression()?;
        self.expect_constant(&TokenKind::RParen)?;
        self.close(paren);
        Ok(paren)
    }

    fn parse_list_expression(&mut self) -> Result<NodeId, ParseError> {
        let list = self.open(NodeKind::ListExpression);
        self.expect_constant(&TokenKind::LBrace)?;
        if !self.check(&TokenKind::RBrace) {
            loop {
                self.parse_expression()?;
                if self.check(&TokenKind::Comma) {
                    self.eat_constant();
                } else {
                    break;
                }
            }
        }
        self.expect_constant(&TokenKind::RBrace)?;
        self.close(list);
        Ok(list)
    }

    /// Parse `[name = expression, ...]` as either a record expression or a
    /// record literal (the section-attribute position).
    fn parse_record(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let record = self.open(kind);
        self.expect_constant(&TokenKind::LBracket)?;
        if !self.check(&TokenKind::RBracket) {
            loop {
                self.parse_field()?;
                if self.check(&TokenKind::Comma) {
                    self.eat_constant();
                } else {
                    break;
                }
            }
        }
        self.expect_constant(&TokenKind::RBracket)?;
        self.close(record);
        Ok(record)
    }

    fn parse_field(&mut self) -> Result<NodeId, ParseError> {
        let paired = self.open(NodeKind::GeneralizedIdentifierPairedExpression);
        if !self.current_kind().is_generalized_ident() {
            return Err(ParseError::expected(
                "a field name",
                self.current_kind(),
                self.current().range.start,
            ));
        }
        self.leaf(NodeKind::GeneralizedIdentifier);
        self.expect_constant(&TokenKind::Eq)?;
        self.parse_expression()?;
        self.close(paired);
        Ok(paired)
    }

    fn parse_identifier_paired_expression(&mut self) -> Result<NodeId, ParseError> {
        let paired = self.open(NodeKind::IdentifierPairedExpression);
        if !self.check_name() {
            return Err(ParseError::expected(
                "an identifier",
                self.current_kind(),
                self.current().range.start,
            ));
        }
        self.leaf(NodeKind::Identifier);
        self.expect_constant(&TokenKind::Eq)?;
        self.parse_expression()?;
        self.close(paired);
        Ok(paired)
    }

    /// Whether the `(` at the cursor opens a function's parameter list.
    fn is_function_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::FatArrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    // =========================================================================
    // Sections
    // =========================================================================

    fn parse_section(&mut self) -> Result<NodeId, ParseError> {
        let section = self.open(NodeKind::Section);
        if self.check(&TokenKind::LBracket) {
            self.parse_record(NodeKind::RecordLiteral)?;
        }
        self.expect_constant(&TokenKind::Section)?;
        if self.check_name() {
            self.leaf(NodeKind::Identifier);
        }
        self.expect_constant(&TokenKind::Semi)?;
        while !self.at_end() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }
            if let Err(error) = self.parse_section_member() {
                self.errors.push(error);
                self.synchronize_members(section);
            }
        }
        self.close(section);
        Ok(section)
    }

    fn parse_section_member(&mut self) -> Result<NodeId, ParseError> {
        let member = self.open(NodeKind::SectionMember);
        if self.check(&TokenKind::Shared) {
            self.eat_constant();
        }
        self.parse_identifier_paired_expression()?;
        self.expect_constant(&TokenKind::Semi)?;
        self.close(member);
        Ok(member)
    }

    /// Abandon the open productions of a broken member and skip to the
    /// next member boundary. The abandoned productions stay in the map as
    /// context nodes.
    fn synchronize_members(&mut self, section: NodeId) {
        while let Some(&top) = self.open_stack.last() {
            if top == section {
                break;
            }
            self.open_stack.pop();
        }
        while !self.at_end() {
            if self.check(&TokenKind::Semi) {
                self.advance();
                return;
            }
            self.advance();
        }
    }
}

fn binary_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Or => Some(1),
        TokenKind::And => Some(2),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq => Some(3),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Ampersand => Some(4),
        TokenKind::Star | TokenKind::Slash => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqm_lexer::Lexer;

    fn parse(source: &str) -> ParseResult {
        let lexed = Lexer::new(source).tokenize();
        assert!(lexed.is_ok(), "lex errors in {:?}: {:?}", source, lexed.errors);
        Parser::new(lexed.tokens).parse()
    }

    fn child_kinds(result: &ParseResult, id: NodeId) -> Vec<NodeKind> {
        result
            .map
            .child_ids(id)
            .iter()
            .map(|&child| result.map.xor(child).unwrap().kind)
            .collect()
    }

    #[test]
    fn empty_document_has_no_root() {
        let result = parse("");
        assert!(result.is_ok());
        assert_eq!(result.root, None);
        assert!(result.leaf_ids.is_empty());
    }

    #[test]
    fn bare_literal_is_the_root() {
        let result = parse("42");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::LiteralExpression);
        assert!(result.map.is_leaf(root));
    }

    #[test]
    fn let_expression_shape() {
        let result = parse("let x = 1, y = x in y");
        assert!(result.is_ok(), "{:?}", result.errors);
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::LetExpression);
        assert_eq!(
            child_kinds(&result, root),
            vec![
                NodeKind::Constant, // let
                NodeKind::IdentifierPairedExpression,
                NodeKind::Constant, // ,
                NodeKind::IdentifierPairedExpression,
                NodeKind::Constant, // in
                NodeKind::IdentifierExpression,
            ]
        );

        // A paired expression is key, equals, value.
        let paired = result.map.child_ids(root)[1];
        assert_eq!(
            child_kinds(&result, paired),
            vec![NodeKind::Identifier, NodeKind::Constant, NodeKind::LiteralExpression]
        );
        let key = result.map.expect_ast(result.map.child_ids(paired)[0]).unwrap();
        assert_eq!(key.literal.as_deref(), Some("x"));
    }

    #[test]
    fn binary_expressions_nest_by_precedence() {
        let result = parse("1 + 2 * 3");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::BinaryOpExpression);
        assert_eq!(
            child_kinds(&result, root),
            vec![NodeKind::LiteralExpression, NodeKind::Constant, NodeKind::BinaryOpExpression]
        );
        // The adopted operand keeps slot 0.
        let lhs = result.map.child_ids(root)[0];
        assert_eq!(result.map.attribute_index(lhs), Some(0));
    }

    #[test]
    fn binary_expressions_are_left_associative() {
        let result = parse("1 - 2 - 3");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        // ((1 - 2) - 3): the left child is itself a binary expression.
        assert_eq!(
            child_kinds(&result, root),
            vec![NodeKind::BinaryOpExpression, NodeKind::Constant, NodeKind::LiteralExpression]
        );
    }

    #[test]
    fn function_expression_shape() {
        let result = parse("(a, b) => a + b");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::FunctionExpression);
        let params = result.map.child_ids(root)[0];
        assert_eq!(
            result.map.children_of_kind(params, &[NodeKind::Parameter]).len(),
            2
        );
    }

    #[test]
    fn each_wraps_its_body() {
        let result = parse("each _ + 1");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::EachExpression);
        assert_eq!(
            child_kinds(&result, root),
            vec![NodeKind::Constant, NodeKind::BinaryOpExpression]
        );
    }

    #[test]
    fn at_sign_becomes_inclusive_constant() {
        let result = parse("let f = @f in f");
        assert!(result.is_ok());
        let root = result.root.unwrap();
        let paired = result.map.child_ids(root)[1];
        let value = *result.map.child_ids(paired).last().unwrap();
        assert_eq!(result.map.expect_ast(value).unwrap().kind, NodeKind::IdentifierExpression);
        let at = result.map.expect_ast(result.map.child_ids(value)[0]).unwrap();
        assert!(at.is_inclusive_constant());
    }

    #[test]
    fn section_document_shape() {
        let result = parse("section Store; shared a = 1; b = a;");
        assert!(result.is_ok(), "{:?}", result.errors);
        let root = result.root.unwrap();
        assert_eq!(result.map.expect_ast(root).unwrap().kind, NodeKind::Section);
        let members = result.map.children_of_kind(root, &[NodeKind::SectionMember]);
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn section_attribute_record_is_a_literal() {
        let result = parse("[Version = \"1.0\"] section Store; a = 1;");
        assert!(result.is_ok(), "{:?}", result.errors);
        let root = result.root.unwrap();
        assert_eq!(
            child_kinds(&result, root)[0],
            NodeKind::RecordLiteral,
        );
    }

    #[test]
    fn interrupted_parse_keeps_context_nodes() {
        let result = parse("let x = 1, y = ");
        assert!(!result.is_ok());
        let root = result.root.unwrap();
        // The let never completed.
        assert!(result.map.context_node(root).is_some());
        assert_eq!(result.map.expect_context(root).unwrap().kind, NodeKind::LetExpression);
        // Its finished pieces are completed nodes.
        let paired = result.map.children_of_kind(root, &[NodeKind::IdentifierPairedExpression]);
        assert_eq!(paired.len(), 2);
        assert!(paired[0].is_ast());
        assert!(paired[1].is_context());
    }

    #[test]
    fn section_recovers_at_member_boundaries() {
        let result = parse("section S; a = ; b = 2;");
        assert_eq!(result.errors.len(), 1);
        let root = result.root.unwrap();
        // The section itself completed, with the broken member left as a
        // context child and the following member parsed normally.
        assert!(result.map.ast_node(root).is_some());
        let members = result.map.children_of_kind(root, &[NodeKind::SectionMember]);
        assert_eq!(members.len(), 2);
        assert!(members[0].is_context());
        assert!(members[1].is_ast());
    }

    #[test]
    fn map_links_are_mutually_consistent() {
        let result = parse("let x = 1 in [f = x, g = each _ ]");
        assert!(result.is_ok());
        for id in result.map.ids() {
            for &child in result.map.child_ids(id) {
                assert_eq!(result.map.parent_id(child), Some(id));
            }
            if let Some(parent) = result.map.parent_id(id) {
                assert!(result.map.child_ids(parent).contains(&id));
            }
        }
        // Every leaf is reported exactly once, in source order.
        let mut last_code_unit = None;
        for &leaf in &result.leaf_ids {
            assert!(result.map.is_leaf(leaf));
            let start = result.map.expect_ast(leaf).unwrap().range.start.code_unit;
            if let Some(previous) = last_code_unit {
                assert!(start > previous);
            }
            last_code_unit = Some(start);
        }
    }

    #[test]
    fn node_ranges_cover_their_subtrees() {
        let result = parse("let x = 1 in x");
        assert!(result.is_ok());
        let root = result.map.expect_ast(result.root.unwrap()).unwrap();
        assert_eq!(root.range.start.code_unit, 0);
        assert_eq!(root.range.end.code_unit, 14);
    }
}

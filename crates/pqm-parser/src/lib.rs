// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Power Query / M formula language.
//!
//! Transforms a token stream into a flat, id-indexed syntax tree (the
//! [`NodeIdMap`]). Productions interrupted by a parse error are left
//! behind as context nodes, so downstream consumers always receive a
//! usable partial tree.

mod node_id_map;
mod parser;

pub use node_id_map::{MapError, NodeIdMap};
pub use parser::{ParseError, ParseResult, Parser};

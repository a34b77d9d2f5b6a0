// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Inspection error types.

use pqm_parser::MapError;
use thiserror::Error;

/// An inspection failure.
///
/// Inspection fails only on structural contradictions in the node map;
/// these indicate a bug in the parser (or ids from a different document)
/// and should be treated as such by callers. An unresolvable identifier
/// or a caret with nothing to its left are ordinary `Ok` outcomes.
#[derive(Debug, Clone, Error)]
pub enum InspectError {
    #[error("node map invariant violated: {0}")]
    Invariant(#[from] MapError),
}

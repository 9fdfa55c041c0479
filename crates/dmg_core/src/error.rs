//! Error types for attack resolution and ledger bookkeeping.
//!
//! Only a handful of conditions are reported to callers. Catalog misses fall
//! back to documented defaults, malformed text inputs coerce to zero, and
//! stale reroll/revert requests are ignored, so none of those appear here.

use thiserror::Error;

use crate::roster::Side;

/// Result type alias using [`CalcError`].
pub type Result<T> = std::result::Result<T, CalcError>;

/// Top-level error type for the calculator core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The active combatant of a side has no identity key, so an attack
    /// involving it cannot be resolved.
    #[error("No combatant identity set on the {side} side")]
    MissingIdentity {
        /// Side whose active combatant is unnamed.
        side: Side,
    },

    /// Roster slot index out of range.
    #[error("Invalid roster slot {index} on the {side} side")]
    InvalidSlot {
        /// Side of the roster.
        side: Side,
        /// Offending slot index.
        index: usize,
    },

    /// Move slot index out of range.
    #[error("Invalid move slot: {0}")]
    InvalidMoveSlot(usize),

    /// Two catalog records share one identity key.
    #[error("Duplicate {kind} key in catalog: {key}")]
    DuplicateCatalogKey {
        /// Record kind (`species`, `move` or `item`).
        kind: &'static str,
        /// The repeated key.
        key: String,
    },

    /// Configuration text could not be parsed.
    #[error("Failed to parse battle config: {0}")]
    ConfigParse(String),
}

//! Error types for the daisy-chain calculator.
//!
//! The solver itself never fails: absent readings, zero currents and
//! infeasible ballasts are all expressed in its output. [`ChainError`]
//! covers what can go wrong around it: editing, data entry and the node
//! store.

use std::path::PathBuf;

use thiserror::Error;

use crate::chain::NodeId;

/// Result type alias using [`ChainError`].
pub type Result<T> = std::result::Result<T, ChainError>;

/// Unified error type for all daisychain operations.
#[derive(Error, Debug)]
pub enum ChainError {
    // ============ Editing Errors ============
    /// Node id not present in the session
    #[error("Node {id} not found")]
    NodeNotFound { id: NodeId },

    /// Rectifier with no nodes
    #[error("Rectifier '{rectifier}' has no nodes")]
    UnknownRectifier { rectifier: String },

    /// Field name that does not name an editable input
    #[error("Unknown field '{name}' (expected ra, rb, ia, ib or rc)")]
    UnknownField { name: String },

    /// Value text that is not a number
    #[error("Invalid value '{text}' for field '{field}'")]
    InvalidValue { field: String, text: String },

    // ============ Store Errors ============
    /// Same id appears twice in one upsert batch
    #[error("Duplicate node id {id} in upsert batch")]
    DuplicateId { id: NodeId },

    /// Two nodes of one rectifier claim the same position
    #[error("Rectifier '{rectifier}' already has a node at index {index} (nodes {existing} and {incoming})")]
    DuplicateIndex {
        rectifier: String,
        index: u32,
        existing: NodeId,
        incoming: NodeId,
    },

    /// No id left above the highest stored one
    #[error("Node ids exhausted")]
    IdsExhausted,

    // ============ I/O Errors ============
    /// Error reading the store file
    #[error("Failed to read node store '{}': {source}", path.display())]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the store file
    #[error("Failed to write node store '{}': {source}", path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file is not a valid node list
    #[error("Malformed node store '{}': {source}", path.display())]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error writing a report
    #[error("Report output error: {0}")]
    Output(#[from] std::io::Error),

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl ChainError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Create an unknown rectifier error
    pub fn unknown_rectifier(rectifier: impl Into<String>) -> Self {
        Self::UnknownRectifier {
            rectifier: rectifier.into(),
        }
    }
}

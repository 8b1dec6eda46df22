//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with protocol identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A symbolic data-id name did not match any known identifier.
    #[error("unknown data-id name: {0:?}")]
    UnknownDataId(String),
}

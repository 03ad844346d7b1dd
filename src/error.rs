//! Error types for the countdown components.

use thiserror::Error;

/// Errors reported by the layout engine.
///
/// Both variants describe a caller breaking the layout contract, so they are
/// returned to the caller as-is and never recovered inside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The container width is unknown, so no cell size can be derived.
    #[error("unbounded width not supported")]
    UnboundedContainer,

    /// A grid needs at least one column.
    #[error("grid must have at least one column")]
    ZeroColumns,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `LiftError` as one
//! variant where a core parse or configuration failure can surface.

use thiserror::Error;

/// The top-level error type for `lift-core`.
#[derive(Debug, Error)]
pub enum LiftError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `lift-core`.
pub type LiftResult<T> = Result<T, LiftError>;

//! Errors raised while building or evaluating a network.

use thiserror::Error;

/// A `(rows, cols)` pair.
pub type Shape = (usize, usize);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetError {
    /// A matrix product was requested between incompatible operands.
    #[error("Shape mismatch: cannot multiply {left:?} by {right:?}")]
    ShapeMismatch { left: Shape, right: Shape },

    #[error("Invalid topology: {reason}")]
    InvalidTopology { reason: String },

    #[error("Expected a buffer of {expected} elements but received {actual}")]
    StorageLength { expected: usize, actual: usize },

    #[error("Image of {width}x{height} pixels scaled by {scale} is too large")]
    ImageTooLarge {
        width: usize,
        height: usize,
        scale: usize,
    },

    #[error("Invalid initializer: {reason}")]
    InvalidInitializer { reason: String },
}

impl NetError {
    pub(crate) fn topology<S: Into<String>>(reason: S) -> Self {
        NetError::InvalidTopology {
            reason: reason.into(),
        }
    }
}

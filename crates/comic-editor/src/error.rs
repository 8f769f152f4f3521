//! Editor-level errors.

use comic_core::{InputError, StructuralError, SurfaceError};
use thiserror::Error;

/// A collaborator on the other side of a network or disk boundary failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Server error: {status}")]
    Status { status: u16 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Rejected by backend: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

/// Anything an editor operation can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

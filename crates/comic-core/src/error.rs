//! Error types shared across the workspace.

use thiserror::Error;

/// User-supplied input was rejected. Nothing was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter some text to create panels")]
    EmptyText,

    #[error("Please upload a valid text file (.txt), got {0:?}")]
    InvalidFileType(String),

    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Invalid URL format: {0}")]
    MalformedUrl(String),

    #[error("Please enter a title for your comic")]
    MissingTitle,

    #[error("No video frames supplied")]
    NoFrames,

    #[error("Video frame {0} is not valid base64")]
    InvalidFrame(usize),
}

/// The scene-suggestion service could not help. Always recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("Scene suggestion service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed scene suggestions: {0}")]
    Malformed(String),
}

/// Analysis or surface contents don't line up with what the materializer needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("No panels to create from analysis")]
    NoPanels,

    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Panel {index} not found on the surface ({available} frames available)")]
    MissingFrame { index: usize, available: usize },
}

/// The rendering surface failed to serialize or restore its state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Failed to restore document: {0}")]
    Deserialize(String),
}

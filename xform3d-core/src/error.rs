//! Error types for matrix access, camera basis construction and settings.

use thiserror::Error;

/// Error type for core transform operations.
///
/// Every failing operation leaves previously computed matrices untouched, so
/// callers can keep rendering with the last good state.
#[derive(Error, Debug)]
pub enum Error {
    /// Matrix element access outside the 4x4 range.
    #[error("matrix index ({row}, {col}) out of bounds for 4x4 matrix")]
    IndexOutOfBounds { row: usize, col: usize },

    /// The view direction is parallel to the up direction (or zero), so no
    /// right vector can be formed.
    #[error("degenerate camera basis: view direction is parallel to up direction")]
    DegenerateBasis,

    /// Frustum parameters that would divide by zero or invert depth.
    #[error("invalid frustum: {0}")]
    InvalidFrustum(String),

    /// Settings document could not be parsed.
    #[error("invalid settings: {0}")]
    Config(String),

    /// Settings file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for core transform operations.
pub type Result<T> = std::result::Result<T, Error>;

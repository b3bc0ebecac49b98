use std::path::PathBuf;

/// Convenience result type used across the tiler.
pub type TilerResult<T> = Result<T, TilerError>;

/// Top-level error taxonomy used by compositor and batch APIs.
#[derive(thiserror::Error, Debug)]
pub enum TilerError {
    /// Invalid configuration or degenerate geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// An input could not be decoded into a raster.
    #[error("decode error: {0}")]
    Decode(String),

    /// A finished canvas could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A page unit failed while handling `path`.
    #[error("page #{index}: '{}': {source}", .path.display())]
    Page {
        /// 0-based page index.
        index: usize,
        /// File that was being read or written.
        path: PathBuf,
        /// Underlying failure.
        source: Box<TilerError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilerError {
    /// Build a [`TilerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TilerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TilerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TilerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach the page index and offending file to an error.
    pub fn in_page(self, index: usize, path: impl Into<PathBuf>) -> Self {
        Self::Page {
            index,
            path: path.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

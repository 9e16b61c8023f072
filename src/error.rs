//! Error types for stroke replay

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for replay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, transforming or replaying a drawing.
///
/// Every variant is fatal to the current run; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The stroke file does not exist
    #[error("Stroke file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The stroke file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data line had two fields but one of them was not a finite number
    #[error("Malformed point on line {line}: {content:?}")]
    MalformedPoint { line: usize, content: String },

    /// Parsing produced no strokes at all (carries the source name)
    #[error("No strokes loaded from {0}")]
    EmptyDrawing(String),

    /// The drawing's extent overflows, so it cannot be scaled onto the canvas
    #[error("Drawing extent {width}x{height} cannot be fitted onto the canvas")]
    UnscalableDrawing { width: f64, height: f64 },

    /// The drawing primitive never became available
    #[error("Drawing API not ready after {0}ms")]
    ReadinessTimeout(u64),

    /// A call into the drawing surface failed or returned something unusable
    #[error("External call failed: {0}")]
    ExternalCall(String),

    /// The screenshot could not be persisted
    #[error("Failed to write {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),
}

impl Error {
    /// Map an `io::Error` raised while reading `path` to the matching variant.
    pub(crate) fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path)
        } else {
            Error::Io { path, source }
        }
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}

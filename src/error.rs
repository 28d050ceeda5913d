//! Error types for the gridrover crate

use thiserror::Error;

/// Main error type for the gridrover crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transport request '{request}' failed: {source}")]
    Transport {
        request: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reply to '{request}' could not be parsed: {message}")]
    ReplyParse { request: String, message: String },

    #[error("world extents must be positive, got {width}x{height}")]
    EmptyWorld { width: i64, height: i64 },

    #[error("{grid} grid is {got_width}x{got_height}, world declares {width}x{height}")]
    GridDimensionMismatch {
        grid: String,
        got_width: usize,
        got_height: usize,
        width: usize,
        height: usize,
    },

    #[error("goal ({x}, {y}) is outside the {width}x{height} world")]
    GoalOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("goal ({x}, {y}) lies on an obstacle")]
    GoalOnObstacle { x: usize, y: usize },

    #[error("no legal move from ({x}, {y}): all four neighbours are obstacles")]
    NoLegalMove { x: usize, y: usize },

    #[error("invalid direction token '{token}'")]
    InvalidDirection { token: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

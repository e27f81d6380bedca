//! Error types for chord diagram construction and rendering.

use thiserror::Error;

/// Result type alias for chord diagram operations.
pub type Result<T> = std::result::Result<T, ChordError>;

/// Errors that can occur while building or displaying a chord diagram.
#[derive(Debug, Error)]
pub enum ChordError {
    /// Gradient requested with fewer than two colors, or a color that
    /// could not be parsed.
    #[error("invalid color spec: {0}")]
    InvalidColorSpec(String),

    /// A non-finite angle was passed for a curve endpoint.
    #[error("invalid angle: start={start}, end={end} (both must be finite)")]
    InvalidAngle {
        /// Requested start angle in radians.
        start: f64,
        /// Requested end angle in radians.
        end: f64,
    },

    /// A canvas parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Formatting the rendering failed.
    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Terminal or file output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

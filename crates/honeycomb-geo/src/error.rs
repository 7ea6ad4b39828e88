//! Error types for honeycomb-geo.

use thiserror::Error;

/// Result type for honeycomb-geo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while projecting or resolving boundaries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A geographic coordinate is outside the projection's valid range.
    #[error("cannot project ({lon}, {lat}): {reason}")]
    Projection {
        lon: f64,
        lat: f64,
        reason: &'static str,
    },

    /// A planar coordinate cannot be mapped back to geographic space.
    #[error("cannot unproject ({x}, {y}): {reason}")]
    Unprojection {
        x: f64,
        y: f64,
        reason: &'static str,
    },

    /// No boundary polygon could be resolved.
    #[error("boundary unavailable: {0}")]
    BoundaryUnavailable(String),

    /// Invalid projection parameters.
    #[error("invalid UTM zone: {0}")]
    InvalidZone(String),
}

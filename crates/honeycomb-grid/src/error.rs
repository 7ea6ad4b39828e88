//! Error types for honeycomb-grid.

use thiserror::Error;

/// Result type for honeycomb-grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors and non-fatal conditions raised while building a grid.
///
/// Only [`Error::InvalidConfig`] aborts a build. The other kinds are
/// recorded in the [`BuildReport`](crate::BuildReport) of a grid that was
/// still produced, except [`Error::InvalidRating`] which only comes from
/// converting raw ratings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Projection or boundary failure from the geometry layer.
    #[error(transparent)]
    Geo(#[from] honeycomb_geo::Error),

    /// The slice had no events; every hexagon stays at zero.
    #[error("no events in slice")]
    EmptyInput,

    /// The lattice covering the region would exceed the configured cell
    /// limit; the grid is left empty.
    #[error("lattice of {candidates} candidate cells exceeds the limit of {limit}")]
    LatticeTooLarge { candidates: usize, limit: usize },

    /// A star rating outside 0..=4.
    #[error("star rating {0} outside 0..=4")]
    InvalidRating(u8),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

//! Honeycomb Grid
//!
//! Builds hexagonal influence grids from geotagged, severity-labeled events.
//!
//! # Pipeline
//!
//! ```text
//! events ──► BoundaryRegion ──► HexLattice ──► aggregate ──► classify ──► propagate ──► HexGrid
//! ```
//!
//! 1. The region to tile is resolved from district outlines, or from the
//!    extent of the events when no outline is usable.
//! 2. A regular lattice of `hex_size` cells is laid over the region in the
//!    projected plane.
//! 3. Every event is counted in exactly one hexagon (lowest id wins on
//!    shared edges).
//! 4. Each hexagon gets a star rating from its statistics:
//!
//!    | condition                         | stars                  |
//!    |-----------------------------------|------------------------|
//!    | more than 5 severity 2/3 events   | 4                      |
//!    | otherwise                         | `min(3, max_severity)` |
//!
//! 5. One snapshot round of neighbor influence raises ratings next to 3 and
//!    4 star hexagons.
//!
//! [`GridBuilder::build_daily`] runs the pipeline once per calendar day.

mod aggregate;
mod classify;
mod config;
mod error;
mod event;
mod grid;
mod hexagon;
mod lattice;
mod propagate;

pub use aggregate::{aggregate, locate, Aggregation, Placement};
pub use classify::{classify, classify_all, DENSITY_THRESHOLD};
pub use config::{GridConfig, DEFAULT_HEX_SIZE_METERS, DEFAULT_MAX_CELLS, DEFAULT_TARGET_DISTRICTS};
pub use error::{Error, Result};
pub use event::{slice_by_day, DateRange, Event};
pub use grid::{BuildReport, GridBuilder, GridSummary, HexGrid, StarHistogram};
pub use hexagon::{HexStats, Hexagon, StarRating};
pub use lattice::{HexLattice, LatticeCell};
pub use propagate::{propagate, propose, Propagation, Proposal};

//! Honeycomb Geometry
//!
//! Geographic plumbing for hexagon grids:
//!
//! - [`Projection`]: WGS84 ⇄ planar meters, with [`UtmProjector`] as the
//!   shipped transverse Mercator implementation.
//! - [`BoundaryRegion`]: the planar area to tile, either bounded by the union
//!   of selected district outlines or falling back to the data extent.
//!
//! Hexagons are laid out in the plane so they are true regular hexagons by
//! shape and area; only their outlines are reprojected to geographic
//! coordinates for output.

mod boundary;
mod error;
mod point;
mod projection;

pub use boundary::{BoundaryFeature, BoundaryRegion, DistrictFilter, RegionMode, DEFAULT_MARGIN_METERS};
pub use error::{Error, Result};
pub use point::GeoPoint;
pub use projection::{Hemisphere, Projection, UtmProjector, UtmZone};

// Re-exported so callers can build features without depending on `geo` directly.
pub use geo::{LineString, MultiPolygon, Polygon};

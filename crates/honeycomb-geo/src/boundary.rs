//! Boundary regions: the planar area a grid is allowed to cover.
//!
//! A region is either bounded by the union of selected district outlines,
//! or falls back to the extent of the data itself. The fallback is a
//! distinct variant so every consumer handles both cases.

use std::collections::BTreeSet;

use geo::{BooleanOps, BoundingRect, Contains, LineString, MapCoords, MultiPolygon, Point, Polygon};
use honeycomb_topology::{PlanarBounds, PlanarPoint};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::{GeoPoint, Projection};

/// Outward margin added to the region's bounding box (meters).
pub const DEFAULT_MARGIN_METERS: f64 = 5_000.0;

/// A named boundary outline in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryFeature {
    pub fn new(name: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
        }
    }
}

/// Allow-list of district names. An empty filter accepts every feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistrictFilter {
    names: BTreeSet<String>,
}

impl DistrictFilter {
    /// Accept every feature.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// How a region decides which hexagon centers to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionMode {
    /// Centers must fall inside the boundary outline.
    Bounded,
    /// No boundary: the box comes from the data and every center is kept.
    DataExtent,
}

impl std::fmt::Display for RegionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionMode::Bounded => write!(f, "bounded"),
            RegionMode::DataExtent => write!(f, "data-extent"),
        }
    }
}

/// The planar area to tile.
#[derive(Debug, Clone)]
pub enum BoundaryRegion {
    /// Union of the selected outlines, projected to the plane.
    Bounded {
        outline: MultiPolygon<f64>,
        /// Outline bounding box, already expanded by the margin.
        bounds: PlanarBounds,
    },
    /// Extent of the input points expanded by the margin; `None` when there
    /// were no points to measure.
    DataExtent { bounds: Option<PlanarBounds> },
}

impl BoundaryRegion {
    /// Resolve a bounded region from named features.
    ///
    /// Every ring of every accepted feature (exterior and interior alike) is
    /// taken as a filled outline, and the outlines are unioned. Rings that
    /// fail projection are skipped. Fails with
    /// [`Error::BoundaryUnavailable`] when nothing usable remains.
    pub fn from_features<P>(
        features: &[BoundaryFeature],
        filter: &DistrictFilter,
        projection: &P,
        margin: f64,
    ) -> Result<Self>
    where
        P: Projection + ?Sized,
    {
        if features.is_empty() {
            return Err(Error::BoundaryUnavailable("no boundary features supplied".into()));
        }

        let selected: Vec<&BoundaryFeature> = features.iter().filter(|f| filter.accepts(&f.name)).collect();
        if selected.is_empty() {
            return Err(Error::BoundaryUnavailable(format!(
                "none of {} features matches the district filter",
                features.len()
            )));
        }

        let mut outlines = Vec::new();
        let mut skipped = 0usize;
        for feature in &selected {
            for polygon in &feature.geometry {
                for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                    if ring.0.len() < 4 {
                        skipped += 1;
                        continue;
                    }
                    match project_ring(ring, projection) {
                        Ok(planar) => outlines.push(Polygon::new(planar, Vec::new())),
                        Err(e) => {
                            debug!(district = %feature.name, error = %e, "skipping boundary ring");
                            skipped += 1;
                        }
                    }
                }
            }
        }

        let outline = outlines
            .into_iter()
            .fold(MultiPolygon::new(Vec::new()), |acc, p| acc.union(&MultiPolygon::new(vec![p])));

        let rect = outline
            .bounding_rect()
            .ok_or_else(|| Error::BoundaryUnavailable("no projectable boundary ring".into()))?;
        let bounds = PlanarBounds::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y).expand(margin);

        info!(
            features = selected.len(),
            polygons = outline.0.len(),
            skipped_rings = skipped,
            "resolved boundary region"
        );

        Ok(Self::Bounded { outline, bounds })
    }

    /// Fallback region: bounding box of `points` expanded by `margin`.
    pub fn from_extent<I>(points: I, margin: f64) -> Self
    where
        I: IntoIterator<Item = PlanarPoint>,
    {
        Self::DataExtent {
            bounds: PlanarBounds::enclosing(points).map(|b| b.expand(margin)),
        }
    }

    pub fn mode(&self) -> RegionMode {
        match self {
            Self::Bounded { .. } => RegionMode::Bounded,
            Self::DataExtent { .. } => RegionMode::DataExtent,
        }
    }

    /// The rectangle the lattice must cover, if any.
    pub fn grid_bounds(&self) -> Option<PlanarBounds> {
        match self {
            Self::Bounded { bounds, .. } => Some(*bounds),
            Self::DataExtent { bounds } => *bounds,
        }
    }

    /// Whether a hexagon centered at `center` belongs to the region.
    ///
    /// Bounded regions test the unexpanded outline, interior only.
    pub fn accepts(&self, center: PlanarPoint) -> bool {
        match self {
            Self::Bounded { outline, .. } => outline.contains(&Point::new(center.x, center.y)),
            Self::DataExtent { .. } => true,
        }
    }

    pub fn outline(&self) -> Option<&MultiPolygon<f64>> {
        match self {
            Self::Bounded { outline, .. } => Some(outline),
            Self::DataExtent { .. } => None,
        }
    }
}

fn project_ring<P>(ring: &LineString<f64>, projection: &P) -> Result<LineString<f64>>
where
    P: Projection + ?Sized,
{
    ring.try_map_coords(|c| {
        let p = projection.to_planar(GeoPoint::from(c))?;
        Ok(geo::Coord { x: p.x, y: p.y })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UtmProjector;
    use geo::{polygon, Area};

    fn square(lon: f64, lat: f64, half: f64) -> Polygon<f64> {
        polygon![
            (x: lon - half, y: lat - half),
            (x: lon + half, y: lat - half),
            (x: lon + half, y: lat + half),
            (x: lon - half, y: lat + half),
        ]
    }

    fn features() -> Vec<BoundaryFeature> {
        vec![
            BoundaryFeature::new("海淀区", square(116.30, 39.95, 0.05)),
            BoundaryFeature::new("朝阳区", square(116.40, 39.95, 0.05)),
            BoundaryFeature::new("延庆区", square(116.00, 40.45, 0.05)),
        ]
    }

    #[test]
    fn filter_selects_named_districts() {
        let filter = DistrictFilter::new(["海淀区"]);
        assert!(filter.accepts("海淀区"));
        assert!(!filter.accepts("朝阳区"));
        assert!(DistrictFilter::all().accepts("anything"));
    }

    #[test]
    fn bounded_region_from_features() {
        let proj = UtmProjector::default();
        let filter = DistrictFilter::new(["海淀区", "朝阳区"]);
        let region = BoundaryRegion::from_features(&features(), &filter, &proj, DEFAULT_MARGIN_METERS).unwrap();
        assert_eq!(region.mode(), RegionMode::Bounded);

        let inside = proj.to_planar(GeoPoint::new(116.30, 39.95)).unwrap();
        let excluded = proj.to_planar(GeoPoint::new(116.00, 40.45)).unwrap();
        assert!(region.accepts(inside));
        assert!(!region.accepts(excluded));

        // The margin grows the box, not the outline
        let bounds = region.grid_bounds().unwrap();
        let outline_box = region.outline().unwrap().bounding_rect().unwrap();
        assert!((outline_box.min().x - bounds.min_x - DEFAULT_MARGIN_METERS).abs() < 1e-6);
        assert!((bounds.max_y - outline_box.max().y - DEFAULT_MARGIN_METERS).abs() < 1e-6);
        let just_outside = PlanarPoint::new(outline_box.min().x - 10.0, inside.y);
        assert!(!region.accepts(just_outside));
    }

    #[test]
    fn adjacent_districts_are_unioned() {
        let proj = UtmProjector::default();
        let filter = DistrictFilter::new(["海淀区", "朝阳区"]);
        let region = BoundaryRegion::from_features(&features(), &filter, &proj, 0.0).unwrap();
        // The two squares share an edge and merge into one polygon
        assert_eq!(region.outline().unwrap().0.len(), 1);
        assert!(region.outline().unwrap().unsigned_area() > 0.0);
    }

    #[test]
    fn unavailable_boundaries() {
        let proj = UtmProjector::default();
        let none = BoundaryRegion::from_features(&[], &DistrictFilter::all(), &proj, 0.0);
        assert!(matches!(none, Err(Error::BoundaryUnavailable(_))));

        let unmatched =
            BoundaryRegion::from_features(&features(), &DistrictFilter::new(["西城区"]), &proj, 0.0);
        assert!(matches!(unmatched, Err(Error::BoundaryUnavailable(_))));

        // A district on the far side of the globe cannot be projected into zone 50
        let far = vec![BoundaryFeature::new("far", square(-60.0, 10.0, 1.0))];
        let unprojectable = BoundaryRegion::from_features(&far, &DistrictFilter::all(), &proj, 0.0);
        assert!(matches!(unprojectable, Err(Error::BoundaryUnavailable(_))));
    }

    #[test]
    fn data_extent_accepts_everything() {
        let region = BoundaryRegion::from_extent(
            vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(100.0, 50.0)],
            DEFAULT_MARGIN_METERS,
        );
        assert_eq!(region.mode(), RegionMode::DataExtent);
        assert_eq!(
            region.grid_bounds(),
            Some(PlanarBounds::new(-5_000.0, -5_000.0, 5_100.0, 5_050.0))
        );
        assert!(region.accepts(PlanarPoint::new(1.0e9, -1.0e9)));
        assert!(region.outline().is_none());
    }

    #[test]
    fn empty_data_extent_has_no_bounds() {
        let region = BoundaryRegion::from_extent(Vec::new(), DEFAULT_MARGIN_METERS);
        assert_eq!(region.grid_bounds(), None);
    }
}

//! Grid assembly: the full pipeline from events to a rated hexagon grid.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use honeycomb_geo::{BoundaryFeature, BoundaryRegion, Projection, RegionMode, UtmProjector};
use honeycomb_topology::OffsetCoord;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::{aggregate, Aggregation};
use crate::classify::classify_all;
use crate::config::GridConfig;
use crate::error::{Error, Result};
use crate::event::{slice_by_day, DateRange, Event};
use crate::hexagon::{Hexagon, StarRating};
use crate::lattice::HexLattice;
use crate::propagate::{propagate, Propagation};

/// Number of hexagons at each star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarHistogram([usize; StarRating::LEVELS]);

impl StarHistogram {
    pub fn from_ratings<'a, I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = &'a StarRating>,
    {
        let mut counts = [0usize; StarRating::LEVELS];
        for rating in ratings {
            counts[rating.value() as usize] += 1;
        }
        Self(counts)
    }

    pub fn count(&self, rating: StarRating) -> usize {
        self.0[rating.value() as usize]
    }

    pub fn counts(&self) -> &[usize; StarRating::LEVELS] {
        &self.0
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl std::fmt::Display for StarHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (stars, count) in self.0.iter().enumerate() {
            if stars > 0 {
                write!(f, " ")?;
            }
            write!(f, "{stars}★={count}")?;
        }
        Ok(())
    }
}

/// Headline numbers of a built grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSummary {
    pub total: usize,
    pub histogram: StarHistogram,
    pub mode: RegionMode,
}

/// What happened during a build, including non-fatal problems.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildReport {
    pub mode: RegionMode,
    /// Lattice candidates examined before region filtering
    pub candidate_cells: usize,
    /// Accepted cells dropped because their outline could not be projected
    pub skipped_cells: usize,
    /// Events that could not be projected
    pub skipped_events: usize,
    /// Events outside every hexagon
    pub unmatched_events: usize,
    pub boosted_hexagons: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub issues: Vec<Error>,
}

/// The rated hexagons of one temporal slice. Read-only once built.
#[derive(Debug, Clone)]
pub struct HexGrid {
    hexagons: Vec<Hexagon>,
    index: HashMap<OffsetCoord, usize>,
    neighbors: Vec<Vec<usize>>,
    summary: GridSummary,
    report: BuildReport,
}

impl HexGrid {
    fn assemble(lattice: HexLattice, aggregation: Aggregation, propagation: Propagation, report: BuildReport) -> Self {
        let hexagons: Vec<Hexagon> = lattice
            .cells()
            .iter()
            .zip(aggregation.stats)
            .zip(&propagation.ratings)
            .enumerate()
            .map(|(id, ((cell, stats), &star_rating))| Hexagon {
                id: id as u32,
                row: cell.coord.row,
                col: cell.coord.col,
                center: cell.center,
                boundary: cell.boundary,
                stats,
                star_rating,
            })
            .collect();

        let summary = GridSummary {
            total: hexagons.len(),
            histogram: StarHistogram::from_ratings(&propagation.ratings),
            mode: report.mode,
        };
        let (index, neighbors) = lattice.into_adjacency();

        Self {
            hexagons,
            index,
            neighbors,
            summary,
            report,
        }
    }

    /// Hexagons in id order.
    pub fn hexagons(&self) -> &[Hexagon] {
        &self.hexagons
    }

    pub fn len(&self) -> usize {
        self.hexagons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexagons.is_empty()
    }

    pub fn hexagon(&self, id: u32) -> Option<&Hexagon> {
        self.hexagons.get(id as usize)
    }

    /// Look up a hexagon by offset coordinates.
    pub fn get(&self, row: i32, col: i32) -> Option<&Hexagon> {
        self.index
            .get(&OffsetCoord::new(row, col))
            .map(|&i| &self.hexagons[i])
    }

    /// Retained neighbors of hexagon `id`; empty for unknown ids.
    pub fn neighbors(&self, id: u32) -> impl Iterator<Item = &Hexagon> + '_ {
        self.neighbors
            .get(id as usize)
            .into_iter()
            .flatten()
            .map(|&i| &self.hexagons[i])
    }

    pub fn summary(&self) -> &GridSummary {
        &self.summary
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn mode(&self) -> RegionMode {
        self.summary.mode
    }
}

/// Builds [`HexGrid`]s from events.
///
/// A boundary, when supplied, is resolved once and shared by every build.
/// Without a usable boundary each build tiles the extent of its own events.
///
/// # Example
///
/// ```no_run
/// use honeycomb_grid::{GridBuilder, GridConfig};
///
/// let builder = GridBuilder::new(GridConfig::default())?;
/// let grid = builder.build(&[]);
/// assert!(grid.is_empty());
/// # Ok::<(), honeycomb_grid::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridBuilder<P = UtmProjector> {
    config: GridConfig,
    projection: P,
    boundary: honeycomb_geo::Result<BoundaryRegion>,
}

impl GridBuilder<UtmProjector> {
    /// Builder using the UTM zone from `config`.
    pub fn new(config: GridConfig) -> Result<Self> {
        let projection = UtmProjector::new(config.zone);
        Self::with_projection(config, projection)
    }
}

impl<P: Projection> GridBuilder<P> {
    /// Builder using a custom projection.
    pub fn with_projection(config: GridConfig, projection: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            projection,
            boundary: Err(honeycomb_geo::Error::BoundaryUnavailable(
                "no boundary features supplied".into(),
            )),
        })
    }

    /// Resolve the tiled region from boundary features, filtered by the
    /// configured districts.
    ///
    /// Failure is not fatal: builds fall back to the data extent and record
    /// the reason in their report.
    pub fn with_boundary(mut self, features: &[BoundaryFeature]) -> Self {
        self.boundary = BoundaryRegion::from_features(
            features,
            &self.config.district_filter(),
            &self.projection,
            self.config.margin_meters,
        );
        if let Err(e) = &self.boundary {
            warn!(error = %e, "boundary unavailable, grids will cover the data extent");
        }
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// The resolved bounded region, if any.
    pub fn region(&self) -> Option<&BoundaryRegion> {
        self.boundary.as_ref().ok()
    }

    /// Build one grid from `events`.
    pub fn build(&self, events: &[Event]) -> HexGrid {
        let mut issues = Vec::new();
        if events.is_empty() {
            warn!("no events in slice, every hexagon stays at zero");
            issues.push(Error::EmptyInput);
        }

        let fallback;
        let region = match &self.boundary {
            Ok(region) => region,
            Err(e) => {
                warn!(mode = %RegionMode::DataExtent, reason = %e, "tiling the data extent");
                issues.push(Error::from(e.clone()));
                fallback = BoundaryRegion::from_extent(
                    events
                        .iter()
                        .filter_map(|event| self.projection.to_planar(event.position()).ok()),
                    self.config.margin_meters,
                );
                &fallback
            }
        };

        info!(
            events = events.len(),
            mode = %region.mode(),
            hex_size = self.config.hex_size_meters,
            "building hexagon grid"
        );

        let lattice = match HexLattice::generate(
            region,
            self.config.hex_size_meters,
            self.config.max_cells,
            &self.projection,
        ) {
            Ok(lattice) => lattice,
            Err(e) => {
                warn!(error = %e, "lattice refused, grid will be empty");
                issues.push(e);
                HexLattice::default()
            }
        };
        let aggregation = aggregate(&lattice, &self.projection, events);
        let ratings = classify_all(&aggregation.stats);
        let propagation = propagate(&ratings, &lattice);

        let report = BuildReport {
            mode: region.mode(),
            candidate_cells: lattice.candidate_count(),
            skipped_cells: lattice.skipped_count(),
            skipped_events: aggregation.skipped,
            unmatched_events: aggregation.unmatched,
            boosted_hexagons: propagation.boosted,
            issues,
        };
        let grid = HexGrid::assemble(lattice, aggregation, propagation, report);

        let summary = grid.summary();
        info!(
            total = summary.total,
            mode = %summary.mode,
            boosted = grid.report().boosted_hexagons,
            histogram = %summary.histogram,
            "hexagon grid built"
        );
        grid
    }

    /// Build one grid per calendar day of the events inside `range`.
    ///
    /// Days are built in parallel. Days with no events produce no entry.
    pub fn build_daily(&self, events: &[Event], range: DateRange) -> BTreeMap<NaiveDate, HexGrid> {
        let days = slice_by_day(events.iter().filter(|e| range.contains(e.date())));
        info!(days = days.len(), "building daily grids");

        days.par_iter()
            .map(|(date, slice)| (*date, self.build(slice)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use crate::config::DEFAULT_MAX_CELLS;
    use geo::polygon;
    use honeycomb_geo::GeoPoint;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn district(name: &str, lon: f64, lat: f64) -> BoundaryFeature {
        BoundaryFeature::new(
            name,
            polygon![
                (x: lon - 0.03, y: lat - 0.03),
                (x: lon + 0.03, y: lat - 0.03),
                (x: lon + 0.03, y: lat + 0.03),
                (x: lon - 0.03, y: lat + 0.03),
            ],
        )
    }

    fn events_around(center: GeoPoint, day: u32) -> Vec<Event> {
        (0..12)
            .map(|k| {
                let d = 0.002 * (k % 4) as f64;
                Event::new(center.lon + d, center.lat - d, (k % 4) as u8, at(day, k))
            })
            .collect()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GridConfig {
            hex_size_meters: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(GridBuilder::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn bounded_build_end_to_end() {
        let builder = GridBuilder::new(GridConfig::default())
            .unwrap()
            .with_boundary(&[district("东城区", 116.41, 39.92), district("延庆区", 115.97, 40.46)]);
        assert!(builder.region().is_some());

        let events = events_around(GeoPoint::new(116.41, 39.92), 1);
        let grid = builder.build(&events);

        assert_eq!(grid.mode(), RegionMode::Bounded);
        assert!(!grid.is_empty());
        assert!(grid.report().issues.is_empty());

        let counted: u32 = grid.hexagons().iter().map(|h| h.stats.count).sum();
        assert_eq!(counted as usize, events.len() - grid.report().unmatched_events);
        assert_eq!(grid.summary().histogram.total(), grid.len());

        // 延庆区 is not a target district, so nothing is tiled up there
        assert!(grid.hexagons().iter().all(|h| h.center.lat < 40.2));
    }

    #[test]
    fn missing_boundary_falls_back_to_extent() {
        let builder = GridBuilder::new(GridConfig::default())
            .unwrap()
            .with_boundary(&[district("延庆区", 115.97, 40.46)]);
        assert!(builder.region().is_none());

        let events = events_around(GeoPoint::new(116.30, 39.90), 1);
        let grid = builder.build(&events);

        assert_eq!(grid.mode(), RegionMode::DataExtent);
        assert_eq!(grid.report().unmatched_events, 0);
        assert!(matches!(
            grid.report().issues.as_slice(),
            [Error::Geo(honeycomb_geo::Error::BoundaryUnavailable(_))]
        ));
        let counted: u32 = grid.hexagons().iter().map(|h| h.stats.count).sum();
        assert_eq!(counted as usize, events.len());
    }

    #[test]
    fn empty_input_gives_zero_grid() {
        let builder = GridBuilder::new(GridConfig::default())
            .unwrap()
            .with_boundary(&[district("西城区", 116.36, 39.91)]);
        let grid = builder.build(&[]);

        assert!(!grid.is_empty());
        assert!(grid.report().issues.contains(&Error::EmptyInput));
        assert!(grid.hexagons().iter().all(|h| h.stats.is_empty() && h.star_rating == StarRating::ZERO));
        assert_eq!(grid.summary().histogram.count(StarRating::ZERO), grid.len());
    }

    #[test]
    fn empty_input_without_boundary_is_empty_grid() {
        let grid = GridBuilder::new(GridConfig::default()).unwrap().build(&[]);
        assert!(grid.is_empty());
        assert_eq!(grid.report().issues.len(), 2);
    }

    #[test]
    fn lookups_agree_with_ids() {
        let builder = GridBuilder::new(GridConfig::default()).unwrap();
        let grid = builder.build(&events_around(GeoPoint::new(116.30, 39.90), 1));

        for hex in grid.hexagons() {
            assert_eq!(grid.get(hex.row, hex.col).map(|h| h.id), Some(hex.id));
            assert_eq!(grid.hexagon(hex.id), Some(hex));
            for n in grid.neighbors(hex.id) {
                assert!(grid.neighbors(n.id).any(|m| m.id == hex.id));
            }
        }
        assert!(grid.get(-1, 0).is_none());
        assert_eq!(grid.neighbors(u32::MAX).count(), 0);
    }

    #[test]
    fn dense_cell_is_four_stars_and_boosts_neighbors() {
        let builder = GridBuilder::new(GridConfig::default()).unwrap();
        let spot = GeoPoint::new(116.30, 39.90);
        let events: Vec<Event> = (0..6).map(|k| Event::new(spot.lon, spot.lat, 3, at(1, k))).collect();
        let grid = builder.build(&events);

        let hot = grid.hexagons().iter().find(|h| h.stats.count == 6).unwrap();
        assert_eq!(hot.star_rating, StarRating::FOUR);
        assert!(grid.neighbors(hot.id).all(|n| n.star_rating == StarRating::TWO));
        assert_eq!(grid.report().boosted_hexagons, grid.neighbors(hot.id).count());
        assert_eq!(grid.summary().histogram.count(StarRating::FOUR), 1);
    }

    #[test]
    fn daily_builds_respect_range() {
        let builder = GridBuilder::new(GridConfig::default())
            .unwrap()
            .with_boundary(&[district("东城区", 116.41, 39.92)]);
        let mut events = events_around(GeoPoint::new(116.41, 39.92), 1);
        events.extend(events_around(GeoPoint::new(116.42, 39.93), 2));
        events.extend(events_around(GeoPoint::new(116.40, 39.91), 5));

        let range = DateRange::new(None, NaiveDate::from_ymd_opt(2024, 3, 2));
        let grids = builder.build_daily(&events, range);

        let days: Vec<u32> = grids.keys().map(|d| chrono::Datelike::day(d)).collect();
        assert_eq!(days, vec![1, 2]);
        let sizes: Vec<usize> = grids.values().map(HexGrid::len).collect();
        assert_eq!(sizes[0], sizes[1]);
        for grid in grids.values() {
            let counted: u32 = grid.hexagons().iter().map(|h| h.stats.count).sum();
            assert_eq!(counted, 12);
        }
    }

    #[test]
    fn far_outlier_yields_reported_empty_grid() {
        let builder = GridBuilder::new(GridConfig::default()).unwrap();
        let mut events = events_around(GeoPoint::new(116.40, 39.90), 1);
        // Projects fine in zone 50 but stretches the extent across ~40 degrees
        events.push(Event::new(160.0, 0.5, 1, at(1, 13)));
        let grid = builder.build(&events);

        assert!(grid.is_empty());
        assert!(grid
            .report()
            .issues
            .iter()
            .any(|e| matches!(e, Error::LatticeTooLarge { limit, .. } if *limit == DEFAULT_MAX_CELLS)));
        assert_eq!(grid.report().unmatched_events, events.len());
        assert_eq!(grid.report().skipped_events, 0);
    }

    #[test]
    fn histogram_display() {
        let ratings = [StarRating::ZERO, StarRating::ZERO, StarRating::THREE];
        let histogram = StarHistogram::from_ratings(&ratings);
        assert_eq!(histogram.to_string(), "0★=2 1★=0 2★=0 3★=1 4★=0");
        assert_eq!(histogram.total(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn records_serialize() {
        let builder = GridBuilder::new(GridConfig::default()).unwrap();
        let grid = builder.build(&events_around(GeoPoint::new(116.30, 39.90), 1));
        let json = serde_json::to_string(&grid.hexagons()[0]).unwrap();
        let back: Hexagon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid.hexagons()[0]);
        assert!(serde_json::to_string(grid.summary()).unwrap().contains("DataExtent"));
    }
}

//! Spatial join of events against lattice cells.
//!
//! Each event is projected to the plane to find its 3x3 neighborhood of
//! candidate cells, then tested against each candidate's geographic outline
//! (boundary inclusive). The lowest-id containing cell wins, so an event on
//! a shared edge is counted exactly once.

use geo::{Intersects, Point};
use honeycomb_geo::Projection;
use rayon::prelude::*;
use tracing::debug;

use crate::event::Event;
use crate::hexagon::HexStats;
use crate::lattice::HexLattice;

/// Where an event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Inside the cell with this index.
    Cell(usize),
    /// Projected fine but no retained cell contains it.
    Outside,
    /// Projection failed.
    Unprojectable,
}

/// Per-cell statistics plus the join's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Indexed by cell id
    pub stats: Vec<HexStats>,
    /// Events inside some cell
    pub matched: usize,
    /// Events outside every retained cell
    pub unmatched: usize,
    /// Events that could not be projected
    pub skipped: usize,
}

/// Find the cell an event falls in.
pub fn locate<P>(lattice: &HexLattice, projection: &P, event: &Event) -> Placement
where
    P: Projection + ?Sized,
{
    let planar = match projection.to_planar(event.position()) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "skipping event");
            return Placement::Unprojectable;
        }
    };
    let Some(layout) = lattice.layout() else {
        return Placement::Outside;
    };

    let point = Point::new(event.longitude, event.latitude);
    layout
        .candidates_near(planar)
        .into_iter()
        .filter_map(|coord| lattice.index_of(coord))
        .filter(|&i| lattice.cells()[i].outline.intersects(&point))
        .min()
        .map_or(Placement::Outside, Placement::Cell)
}

/// Join `events` against `lattice` and compute per-cell statistics.
///
/// Matching runs in parallel; accumulation into the fixed per-cell records
/// happens afterwards in event order.
pub fn aggregate<P>(lattice: &HexLattice, projection: &P, events: &[Event]) -> Aggregation
where
    P: Projection + ?Sized,
{
    let placements: Vec<Placement> = events.par_iter().map(|e| locate(lattice, projection, e)).collect();

    let mut out = Aggregation {
        stats: vec![HexStats::default(); lattice.len()],
        ..Aggregation::default()
    };
    for (event, placement) in events.iter().zip(placements) {
        match placement {
            Placement::Cell(i) => {
                out.stats[i].record(event.severity);
                out.matched += 1;
            }
            Placement::Outside => out.unmatched += 1,
            Placement::Unprojectable => out.skipped += 1,
        }
    }

    debug!(
        matched = out.matched,
        unmatched = out.unmatched,
        skipped = out.skipped,
        "events aggregated"
    );
    out
}

//! Hexagon lattice generation over a boundary region.
//!
//! Candidates are laid out in the plane over the region's (expanded)
//! bounding box, filtered by the region's containment test on each center,
//! and their outlines reprojected to geographic coordinates. Candidacy is
//! evaluated in parallel; ids follow column-major order over the retained
//! cells regardless of scheduling.

use std::collections::HashMap;

use geo::{Centroid, Polygon};
use honeycomb_geo::{BoundaryRegion, GeoPoint, Projection};
use honeycomb_topology::{LatticeLayout, Neighbors, OffsetCoord, PlanarPoint};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::hexagon::outline_polygon;

/// A retained lattice cell with its geometry in both coordinate systems.
#[derive(Debug, Clone)]
pub struct LatticeCell {
    pub coord: OffsetCoord,
    pub planar_center: PlanarPoint,
    /// Centroid of the geographic outline
    pub center: GeoPoint,
    pub boundary: [GeoPoint; 6],
    /// Closed geographic outline used for point tests
    pub outline: Polygon<f64>,
}

/// The retained cells of one grid build plus their adjacency.
///
/// Cell `i` has id `i`. The `(row, col) → index` map and the neighbor
/// lists are built once here and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct HexLattice {
    layout: Option<LatticeLayout>,
    cells: Vec<LatticeCell>,
    index: HashMap<OffsetCoord, usize>,
    neighbors: Vec<Vec<usize>>,
    candidates: usize,
    skipped: usize,
}

impl HexLattice {
    /// Generate the lattice covering `region` with cells of edge `hex_size`.
    ///
    /// Cells whose outline cannot be projected back are skipped and counted.
    /// A region without bounds yields an empty lattice. A covering of more
    /// than `max_cells` candidates is refused before anything is allocated.
    pub fn generate<P>(region: &BoundaryRegion, hex_size: f64, max_cells: usize, projection: &P) -> Result<Self>
    where
        P: Projection + ?Sized,
    {
        let Some(bounds) = region.grid_bounds() else {
            info!(mode = %region.mode(), "region has no extent, lattice is empty");
            return Ok(Self::default());
        };

        let layout = LatticeLayout::covering(&bounds, hex_size);
        let candidates = layout.candidate_count();
        if candidates > max_cells {
            return Err(Error::LatticeTooLarge {
                candidates,
                limit: max_cells,
            });
        }
        info!(
            min_x = bounds.min_x,
            max_x = bounds.max_x,
            min_y = bounds.min_y,
            max_y = bounds.max_y,
            cols = layout.num_cols(),
            rows = layout.num_rows(),
            hex_size,
            "generating hexagon lattice"
        );

        // Only accepted cells are ever materialised
        let rows = layout.num_rows();
        let built: Vec<Result<LatticeCell>> = (0..layout.num_cols())
            .into_par_iter()
            .flat_map_iter(|col| {
                (0..rows).filter_map(move |row| {
                    let coord = OffsetCoord::new(row as i32, col as i32);
                    region
                        .accepts(layout.center(coord))
                        .then(|| build_cell(&layout, coord, projection))
                })
            })
            .collect();

        let mut cells = Vec::with_capacity(built.len());
        let mut skipped = 0usize;
        for result in built {
            match result {
                Ok(cell) => cells.push(cell),
                Err(e) => {
                    debug!(error = %e, "skipping hexagon");
                    skipped += 1;
                }
            }
        }

        let index: HashMap<OffsetCoord, usize> = cells.iter().enumerate().map(|(i, c)| (c.coord, i)).collect();
        let neighbors = cells
            .iter()
            .map(|c| Neighbors::of(c.coord).filter_map(|n| index.get(&n).copied()).collect())
            .collect();

        info!(retained = cells.len(), skipped, candidates, "lattice generated");

        Ok(Self {
            layout: Some(layout),
            cells,
            index,
            neighbors,
            candidates,
            skipped,
        })
    }

    pub fn layout(&self) -> Option<&LatticeLayout> {
        self.layout.as_ref()
    }

    pub fn cells(&self) -> &[LatticeCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index (= id) of the cell at `coord`, if it was retained.
    pub fn index_of(&self, coord: OffsetCoord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    /// Indices of the retained neighbors of cell `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate cells examined before region filtering.
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    /// Retained-by-region cells dropped because projection failed.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Give up the cell geometry, keeping only the adjacency structure.
    pub(crate) fn into_adjacency(self) -> (HashMap<OffsetCoord, usize>, Vec<Vec<usize>>) {
        (self.index, self.neighbors)
    }
}

fn build_cell<P>(layout: &LatticeLayout, coord: OffsetCoord, projection: &P) -> Result<LatticeCell>
where
    P: Projection + ?Sized,
{
    let planar_center = layout.center(coord);
    let mut boundary = [GeoPoint::default(); 6];
    for (slot, vertex) in boundary.iter_mut().zip(layout.vertices(coord)) {
        *slot = projection.to_geo(vertex)?;
    }

    let outline = outline_polygon(&boundary);
    let center = match outline.centroid() {
        Some(c) => GeoPoint::from(c),
        None => projection.to_geo(planar_center)?,
    };

    Ok(LatticeCell {
        coord,
        planar_center,
        center,
        boundary,
        outline,
    })
}

//! Six-neighbor computation on the column-offset lattice.
//!
//! Neighbors are enumerated in cube space and converted back to offset
//! coordinates. The lattice only exists over non-negative rows and columns,
//! so any neighbor that lands outside that quadrant is dropped.

use crate::{CubeCoord, OffsetCoord, NEIGHBOR_COUNT};

/// Neighbor enumeration for lattice cells.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors;

impl Neighbors {
    /// All six neighbors of a cell in cube-direction order, including
    /// positions outside the lattice.
    pub fn unbounded(coord: OffsetCoord) -> [OffsetCoord; NEIGHBOR_COUNT] {
        coord.to_cube().neighbors().map(CubeCoord::to_offset)
    }

    /// Neighbors of a cell that lie inside the lattice quadrant.
    pub fn of(coord: OffsetCoord) -> impl Iterator<Item = OffsetCoord> {
        Self::unbounded(coord).into_iter().filter(OffsetCoord::in_lattice)
    }
}

/// Check if two cells are adjacent.
pub fn are_neighbors(a: OffsetCoord, b: OffsetCoord) -> bool {
    a.to_cube().distance(&b.to_cube()) == 1
}

/// Count how many of a cell's in-lattice neighbors are present in a set.
pub fn count_present_neighbors<F>(coord: OffsetCoord, is_present: F) -> usize
where
    F: Fn(OffsetCoord) -> bool,
{
    Neighbors::of(coord).filter(|&n| is_present(n)).count()
}

//! Honeycomb Lattice Topology
//!
//! Column-offset hexagonal lattice used to tile a planar region.
//!
//! # Coordinate Systems
//!
//! Cells are addressed with offset coordinates `(row, col)` over the
//! non-negative quadrant. Odd columns sit half a row higher than even ones,
//! which gives the honeycomb layout. Adjacency is computed in cube
//! coordinates `(q, r, s)`, `q + r + s = 0`:
//!
//! ```text
//! q = col
//! r = row - (col - (col & 1)) / 2
//! s = -q - r
//! ```
//!
//! # Neighbors
//!
//! Every interior cell has exactly 6 neighbors, one per cube direction.
//! Cells on the lattice edge lose the neighbors that would fall at a
//! negative row or column.
//!
//! # Layout
//!
//! [`LatticeLayout`] maps cells to planar centers and vertices and
//! enumerates the candidate cells covering a bounding rectangle.

mod hex;
mod layout;
mod neighbors;

pub use hex::{CubeCoord, OffsetCoord};
pub use layout::{
    column_shift, hexagon_vertices, horizontal_spacing, vertical_spacing, LatticeLayout, PlanarBounds, PlanarPoint,
    OVERPROVISION,
};
pub use neighbors::{are_neighbors, count_present_neighbors, Neighbors};

/// Neighbors of an interior cell (invariant: always 6)
pub const NEIGHBOR_COUNT: usize = 6;

/// Vertices of a cell outline
pub const VERTEX_COUNT: usize = 6;

// Compile-time assertion: one neighbor across each edge
const _: () = assert!(NEIGHBOR_COUNT == VERTEX_COUNT);

//! Planar layout of the column-offset lattice.
//!
//! Cells are regular hexagons with circumradius `hex_size` (equal to the
//! edge length) and vertices at 0°, 60°, ... 300°. Columns are spaced
//! `1.5 * hex_size` apart along x, rows `√3 * hex_size` apart along y, and
//! odd columns are shifted by half a row along +y.
//!
//! The layout over-provisions five extra rows and columns beyond what the
//! bounds strictly require, so the rectangle is always fully covered; cells
//! outside the region of interest are discarded by the caller.

use crate::OffsetCoord;

/// Extra rows/columns added on top of the covering count.
pub const OVERPROVISION: usize = 5;

/// A point in the planar (metric) coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned planar rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PlanarBounds {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Smallest rectangle containing every point, `None` for an empty input.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = PlanarPoint>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p.x, p.y, p.x, p.y),
                Some(b) => Self::new(b.min_x.min(p.x), b.min_y.min(p.y), b.max_x.max(p.x), b.max_y.max(p.y)),
            })
        })
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Lattice geometry anchored at the lower-left corner of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeLayout {
    hex_size: f64,
    origin: PlanarPoint,
    num_cols: usize,
    num_rows: usize,
}

impl LatticeLayout {
    /// Lay out a lattice covering `bounds` with hexagons of edge `hex_size`.
    ///
    /// `hex_size` must be finite and positive; callers validate it.
    pub fn covering(bounds: &PlanarBounds, hex_size: f64) -> Self {
        let h = horizontal_spacing(hex_size);
        let v = vertical_spacing(hex_size);
        let num_cols = ((bounds.width() / h).floor().max(0.0) as usize).saturating_add(OVERPROVISION);
        let num_rows = ((bounds.height() / v).floor().max(0.0) as usize).saturating_add(OVERPROVISION);
        Self {
            hex_size,
            origin: PlanarPoint::new(bounds.min_x, bounds.min_y),
            num_cols,
            num_rows,
        }
    }

    pub fn hex_size(&self) -> f64 {
        self.hex_size
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Total number of candidate cells before any region filtering.
    pub fn candidate_count(&self) -> usize {
        self.num_cols.saturating_mul(self.num_rows)
    }

    /// Whether a coordinate lies inside the generated rectangle of cells.
    pub fn contains(&self, coord: OffsetCoord) -> bool {
        coord.in_lattice() && (coord.col as usize) < self.num_cols && (coord.row as usize) < self.num_rows
    }

    /// Candidate cells in column-major ascending order.
    pub fn cells(&self) -> impl Iterator<Item = OffsetCoord> + '_ {
        (0..self.num_cols).flat_map(move |col| {
            (0..self.num_rows).map(move |row| OffsetCoord::new(row as i32, col as i32))
        })
    }

    /// Center of a cell in planar coordinates.
    pub fn center(&self, coord: OffsetCoord) -> PlanarPoint {
        let x = self.origin.x + coord.col as f64 * horizontal_spacing(self.hex_size);
        let mut y = self.origin.y + coord.row as f64 * vertical_spacing(self.hex_size);
        if coord.is_odd_col() {
            y += column_shift(self.hex_size);
        }
        PlanarPoint::new(x, y)
    }

    /// The six vertices of a cell, counter-clockwise from angle 0.
    pub fn vertices(&self, coord: OffsetCoord) -> [PlanarPoint; 6] {
        hexagon_vertices(self.center(coord), self.hex_size)
    }

    /// The 3x3 block of in-layout cells around the one nearest to `point`.
    ///
    /// A point inside any cell of the lattice is always inside one of these
    /// candidates. The nearest cell comes first.
    pub fn candidates_near(&self, point: PlanarPoint) -> Vec<OffsetCoord> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Vec::new();
        }
        let h = horizontal_spacing(self.hex_size);
        let v = vertical_spacing(self.hex_size);
        let col_guess = ((point.x - self.origin.x) / h).round() as i64;

        let mut out = Vec::with_capacity(9);
        for col in (col_guess - 1)..=(col_guess + 1) {
            let Ok(col) = i32::try_from(col) else { continue };
            let shift = if col & 1 == 1 { column_shift(self.hex_size) } else { 0.0 };
            let row_guess = ((point.y - self.origin.y - shift) / v).round() as i64;
            for row in (row_guess - 1)..=(row_guess + 1) {
                let Ok(row) = i32::try_from(row) else { continue };
                let coord = OffsetCoord::new(row, col);
                if self.contains(coord) {
                    out.push(coord);
                }
            }
        }

        out.sort_by(|a, b| {
            let da = distance_sq(self.center(*a), point);
            let db = distance_sq(self.center(*b), point);
            da.total_cmp(&db)
        });
        out
    }
}

/// Distance between adjacent column centers along x.
#[inline]
pub fn horizontal_spacing(hex_size: f64) -> f64 {
    1.5 * hex_size
}

/// Distance between adjacent row centers along y.
#[inline]
pub fn vertical_spacing(hex_size: f64) -> f64 {
    3f64.sqrt() * hex_size
}

/// Offset applied to odd columns along +y.
#[inline]
pub fn column_shift(hex_size: f64) -> f64 {
    vertical_spacing(hex_size) / 2.0
}

/// Regular hexagon around `center` with circumradius `size`.
pub fn hexagon_vertices(center: PlanarPoint, size: f64) -> [PlanarPoint; 6] {
    std::array::from_fn(|k| {
        let angle = (60.0 * k as f64).to_radians();
        PlanarPoint::new(center.x + size * angle.cos(), center.y + size * angle.sin())
    })
}

fn distance_sq(a: PlanarPoint, b: PlanarPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

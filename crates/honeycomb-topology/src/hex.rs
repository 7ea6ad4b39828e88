//! Hexagonal coordinate systems for the column-offset lattice.
//!
//! Cells are addressed by offset coordinates `(row, col)`: odd columns are
//! shifted half a row "up" relative to even columns. Neighbor arithmetic is
//! done in cube coordinates `(q, r, s)` with the constraint `q + r + s = 0`,
//! where every one of the six directions is a uniform unit step.

use std::ops::{Add, Neg, Sub};

/// A position in cube hexagonal space.
///
/// `s` is stored explicitly so that direction vectors read the same way
/// they are usually written down; every constructor keeps `q + r + s = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeCoord {
    /// Column axis
    pub q: i32,
    /// Row axis (skewed)
    pub r: i32,
    /// Implicit third axis, always `-q - r`
    pub s: i32,
}

impl CubeCoord {
    /// Origin of the coordinate system.
    pub const ORIGIN: Self = Self { q: 0, r: 0, s: 0 };

    /// Create a cube coordinate from its two independent axes.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// The six unit steps, in the order neighbors are enumerated.
    pub const DIRECTIONS: [Self; 6] = [
        Self { q: 1, r: -1, s: 0 },
        Self { q: 1, r: 0, s: -1 },
        Self { q: 0, r: 1, s: -1 },
        Self { q: -1, r: 1, s: 0 },
        Self { q: -1, r: 0, s: 1 },
        Self { q: 0, r: -1, s: 1 },
    ];

    /// Hexagonal distance between two cells.
    ///
    /// max(|dq|, |dr|, |ds|)
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s - other.s).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// The six cube neighbors, without any lattice bounds applied.
    pub fn neighbors(&self) -> [Self; 6] {
        Self::DIRECTIONS.map(|d| *self + d)
    }

    /// Convert back to column-offset coordinates.
    pub fn to_offset(self) -> OffsetCoord {
        let col = self.q;
        let row = self.r + (self.q - (self.q & 1)).div_euclid(2);
        OffsetCoord { row, col }
    }
}

impl Add for CubeCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            q: self.q + other.q,
            r: self.r + other.r,
            s: self.s + other.s,
        }
    }
}

impl Sub for CubeCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            q: self.q - other.q,
            r: self.r - other.r,
            s: self.s - other.s,
        }
    }
}

impl Neg for CubeCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            q: -self.q,
            r: -self.r,
            s: -self.s,
        }
    }
}

impl std::fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

/// A lattice cell address: `row` grows along +y, `col` along +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetCoord {
    pub row: i32,
    pub col: i32,
}

impl OffsetCoord {
    /// Create an offset coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this cell sits in a shifted (odd) column.
    #[inline]
    pub const fn is_odd_col(&self) -> bool {
        self.col & 1 == 1
    }

    /// Whether the cell lies in the non-negative quadrant the lattice is defined on.
    #[inline]
    pub const fn in_lattice(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    /// Convert to cube coordinates: `q = col`, `r = row - (col - (col & 1)) / 2`.
    pub fn to_cube(self) -> CubeCoord {
        let q = self.col;
        let r = self.row - (self.col - (self.col & 1)).div_euclid(2);
        CubeCoord::new(q, r)
    }
}

impl From<OffsetCoord> for CubeCoord {
    fn from(value: OffsetCoord) -> Self {
        value.to_cube()
    }
}

impl From<CubeCoord> for OffsetCoord {
    fn from(value: CubeCoord) -> Self {
        value.to_offset()
    }
}

impl std::fmt::Display for OffsetCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

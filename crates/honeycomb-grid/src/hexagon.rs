//! Hexagon records and their per-cell values.

use geo::{LineString, Polygon};
use honeycomb_geo::GeoPoint;
use honeycomb_topology::OffsetCoord;

use crate::error::{Error, Result};

/// Severity tier of a hexagon, 0 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct StarRating(u8);

impl StarRating {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    /// Highest rating.
    pub const MAX: Self = Self::FOUR;

    /// Number of distinct ratings.
    pub const LEVELS: usize = 5;

    /// Create a rating, `None` above 4.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamp any value into range.
    #[inline]
    pub const fn saturating(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<StarRating> for u8 {
    fn from(value: StarRating) -> Self {
        value.0
    }
}

impl TryFrom<u8> for StarRating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value).ok_or(Error::InvalidRating(value))
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}★", self.0)
    }
}

/// Aggregated event statistics of one hexagon. All zero when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexStats {
    pub max_severity: u8,
    pub count: u32,
    pub count_sev2: u32,
    pub count_sev3: u32,
    pub count_sev2_plus_sev3: u32,
}

impl HexStats {
    /// Fold one matched event into the statistics.
    pub fn record(&mut self, severity: u8) {
        self.count += 1;
        self.max_severity = self.max_severity.max(severity);
        match severity {
            2 => self.count_sev2 += 1,
            3 => self.count_sev3 += 1,
            _ => return,
        }
        self.count_sev2_plus_sev3 = self.count_sev2 + self.count_sev3;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One cell of a built grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hexagon {
    /// Dense id in generation order, stable within one build only
    pub id: u32,
    pub row: i32,
    pub col: i32,
    /// Centroid of the geographic outline
    pub center: GeoPoint,
    /// Outline vertices in geographic coordinates
    pub boundary: [GeoPoint; 6],
    pub stats: HexStats,
    pub star_rating: StarRating,
}

impl Hexagon {
    pub fn coord(&self) -> OffsetCoord {
        OffsetCoord::new(self.row, self.col)
    }

    /// Outline as a closed polygon.
    pub fn polygon(&self) -> Polygon<f64> {
        outline_polygon(&self.boundary)
    }
}

pub(crate) fn outline_polygon(boundary: &[GeoPoint; 6]) -> Polygon<f64> {
    Polygon::new(LineString::from(boundary.map(geo::Coord::from).to_vec()), Vec::new())
}

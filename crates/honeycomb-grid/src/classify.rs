//! Star rating from per-hexagon statistics.

use rayon::prelude::*;

use crate::hexagon::{HexStats, StarRating};

/// More than this many severity-2/3 events puts a hexagon at four stars.
pub const DENSITY_THRESHOLD: u32 = 5;

/// Rate a single hexagon.
#[inline]
pub fn classify(stats: &HexStats) -> StarRating {
    if stats.count_sev2_plus_sev3 > DENSITY_THRESHOLD {
        StarRating::FOUR
    } else {
        StarRating::saturating(stats.max_severity.min(StarRating::THREE.value()))
    }
}

/// Rate every hexagon, preserving order.
pub fn classify_all(stats: &[HexStats]) -> Vec<StarRating> {
    stats.par_iter().map(classify).collect()
}

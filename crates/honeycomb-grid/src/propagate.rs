//! One round of neighbor influence between star ratings.
//!
//! Every hexagon reads the ratings as they were after classification and
//! proposes raises for its neighbors. Proposals are gathered for the whole
//! grid first, merged per target in hexagon order, and only then applied,
//! so a raise never feeds another raise within the same round.

use rayon::prelude::*;
use tracing::debug;

use crate::hexagon::StarRating;
use crate::lattice::HexLattice;

/// A proposed change to one neighbor's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    /// Raise to at least this rating; merged by maximum.
    AtLeast(StarRating),
    /// Set exactly this rating, replacing earlier proposals.
    Exactly(StarRating),
}

impl Proposal {
    /// Fold this proposal into the pending update of its target.
    fn merge_into(self, pending: &mut Option<StarRating>) {
        *pending = match (self, *pending) {
            (Self::AtLeast(r), Some(prev)) => Some(prev.max(r)),
            (Self::AtLeast(r), None) => Some(r),
            (Self::Exactly(r), _) => Some(r),
        };
    }
}

/// What a hexagon rated `source` proposes for a neighbor rated `target`.
pub fn propose(source: StarRating, target: StarRating) -> Option<Proposal> {
    match (source.value(), target.value()) {
        (4, 0 | 1) => Some(Proposal::AtLeast(StarRating::TWO)),
        (4, 2) => Some(Proposal::Exactly(StarRating::THREE)),
        (3, 0) => Some(Proposal::AtLeast(StarRating::ONE)),
        (3, 1) => Some(Proposal::AtLeast(StarRating::TWO)),
        _ => None,
    }
}

/// Ratings after one propagation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    pub ratings: Vec<StarRating>,
    /// Hexagons whose rating changed
    pub boosted: usize,
}

/// Run one propagation round over `ratings`, indexed like `lattice`.
///
/// # Panics
///
/// If `ratings` does not hold exactly one rating per lattice cell.
pub fn propagate(ratings: &[StarRating], lattice: &HexLattice) -> Propagation {
    assert_eq!(
        ratings.len(),
        lattice.len(),
        "one rating per lattice cell required"
    );

    // Read phase against the unmodified snapshot
    let proposals: Vec<Vec<(usize, Proposal)>> = (0..ratings.len())
        .into_par_iter()
        .map(|i| {
            lattice
                .neighbors(i)
                .iter()
                .filter_map(|&n| propose(ratings[i], ratings[n]).map(|p| (n, p)))
                .collect()
        })
        .collect();

    let mut pending: Vec<Option<StarRating>> = vec![None; ratings.len()];
    for (target, proposal) in proposals.into_iter().flatten() {
        proposal.merge_into(&mut pending[target]);
    }

    let mut boosted = 0usize;
    let ratings: Vec<StarRating> = ratings
        .iter()
        .zip(pending)
        .map(|(&old, update)| match update {
            Some(new) if new != old => {
                boosted += 1;
                new
            }
            _ => old,
        })
        .collect();

    debug!(boosted, "propagation round applied");
    Propagation { ratings, boosted }
}

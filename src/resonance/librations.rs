use std::collections::BTreeSet;
use std::path::Path;

use ndarray::{Array1, ArrayView2};

use super::table::INTEGERS_LEN;
use crate::data::loader::load_integers;
use crate::error::Result;

/// Prefix of libration membership file names.
pub const LIBRATIONS_PREFIX: &str = "JUPITER-SATURN";

/// `JUPITER-SATURN_{i1}_{i2}_{i3}`
pub fn librations_file_name(integers: &[i64; INTEGERS_LEN]) -> String {
    let ids = integers
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("_");
    format!("{LIBRATIONS_PREFIX}_{ids}")
}

// ---------------------------------------------------------------------------
// LibrationSet
// ---------------------------------------------------------------------------

/// Asteroids known to librate in one resonance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrationSet {
    members: BTreeSet<i64>,
    /// Entries as listed in the source, duplicates included.
    listed: usize,
}

impl LibrationSet {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_ids(load_integers(path)?))
    }

    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut listed = 0;
        let members = ids.into_iter().inspect(|_| listed += 1).collect();
        Self { members, listed }
    }

    pub fn contains(&self, asteroid: i64) -> bool {
        self.members.contains(&asteroid)
    }

    /// Number of entries the source listed.
    pub fn listed(&self) -> usize {
        self.listed
    }

    /// Number of distinct asteroids.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Target vector
// ---------------------------------------------------------------------------

/// Decides the label of each `(asteroid, resonance)` row.
///
/// `features` holds the matched catalog rows cast to integers; column 0 is the
/// asteroid number. The returned vector must have one entry per row.
pub trait TargetVector {
    fn target_vector(&self, librating: &LibrationSet, features: ArrayView2<'_, i64>) -> Array1<i64>;
}

impl<F> TargetVector for F
where
    F: Fn(&LibrationSet, ArrayView2<'_, i64>) -> Array1<i64>,
{
    fn target_vector(&self, librating: &LibrationSet, features: ArrayView2<'_, i64>) -> Array1<i64> {
        self(librating, features)
    }
}

/// Labels a row `1` when its asteroid is in the libration set, `0` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipLabels;

impl TargetVector for MembershipLabels {
    fn target_vector(&self, librating: &LibrationSet, features: ArrayView2<'_, i64>) -> Array1<i64> {
        if features.ncols() == 0 {
            return Array1::zeros(features.nrows());
        }
        features
            .column(0)
            .mapv(|id| i64::from(librating.contains(id)))
    }
}

/// Resonance join: the step that turns a catalog matrix into a labeled dataset.
///
/// ```text
///   resonance table ──┐
///                     ▼
///   catalog ──► window by axis ──► libration file ──► integers + axis diff + label
///                                                              │
///                                                              ▼
///                                              sorted by asteroid, cached on disk
/// ```
pub mod cache;
pub mod join;
pub mod librations;
pub mod report;
pub mod table;

pub use cache::{CacheKey, CacheKeyParts, CachedDataset, DatasetCache};
pub use join::{JoinOutcome, ResonanceJoin, DEFAULT_AXIS_TOLERANCE, DEFAULT_MIN_LIBRATIONS};
pub use librations::{librations_file_name, LibrationSet, MembershipLabels, TargetVector};
pub use report::JoinReport;
pub use table::{Resonance, ResonanceTable};

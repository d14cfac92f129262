/// Data layer: matrix types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  catalog / resonance table / libration list (.txt)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse text → FeatureMatrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FeatureMatrix │  Array2<f64>, typed by a DatasetSchema
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  axis window → retained rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  labeled dataset → .parquet
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

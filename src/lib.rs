//! Resonance Dataset
//!
//! Builds labeled feature matrices for classifiers that detect asteroids
//! librating in mean-motion resonances.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Resonance Dataset                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  data/       - matrix types, text loading, axis filter, export  │
//! │  injection/  - composable matrix transforms (Kepler, filters)   │
//! │  resonance/  - resonance table, librations, join and cache      │
//! │  catalog     - per-family layouts and feature index groups      │
//! │  config      - run settings                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use resonance_dataset::{build_dataset, BuildOptions, Catalog, Settings};
//!
//! let settings = Settings::load("settings.json".as_ref())?;
//! let dataset = build_dataset(&settings, Catalog::Syn, &BuildOptions::default())?;
//! println!("{}", dataset.report);
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod injection;
pub mod resonance;

pub use builder::{build_dataset, BuildOptions, BuiltDataset};
pub use catalog::{Catalog, DatasetParameters, Task};
pub use config::Settings;
pub use data::filter::AxisFilter;
pub use data::model::{ColumnKind, ColumnSpec, DatasetSchema, FeatureMatrix};
pub use error::{DatasetError, Result};
pub use injection::{FilteredInjection, Injection, KeplerInjection, Pipeline};
pub use resonance::{
    JoinOutcome, JoinReport, LibrationSet, MembershipLabels, ResonanceJoin, ResonanceTable,
    TargetVector,
};

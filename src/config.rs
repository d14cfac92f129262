//! Run settings: where the catalogs, resonance table, libration files and the
//! dataset cache live, plus the join tunables.
//!
//! Settings are read from a JSON file; any field left out keeps its default.
//!
//! ```json
//! {
//!   "syn_catalog": "catalogs/all.syn",
//!   "resonance_table": "resonances/jupiter_saturn.txt",
//!   "librations_folder": "librations",
//!   "axis_tolerance": 0.01
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{DatasetError, Result};
use crate::resonance::{DEFAULT_AXIS_TOLERANCE, DEFAULT_MIN_LIBRATIONS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub syn_catalog: PathBuf,
    pub cat_catalog: PathBuf,
    pub pro_catalog: PathBuf,
    pub resonance_table: PathBuf,
    pub librations_folder: PathBuf,
    pub cache_dir: PathBuf,
    pub axis_tolerance: f64,
    pub min_librations: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            syn_catalog: PathBuf::from("catalogs/all.syn"),
            cat_catalog: PathBuf::from("catalogs/allnum.cat"),
            pro_catalog: PathBuf::from("catalogs/all.pro"),
            resonance_table: PathBuf::from("resonances.txt"),
            librations_folder: PathBuf::from("librations"),
            cache_dir: std::env::temp_dir(),
            axis_tolerance: DEFAULT_AXIS_TOLERANCE,
            min_librations: DEFAULT_MIN_LIBRATIONS,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        let settings: Settings = serde_json::from_str(&text).map_err(|e| {
            DatasetError::Configuration(format!("{}: {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.axis_tolerance.is_finite() && self.axis_tolerance >= 0.0) {
            return Err(DatasetError::Configuration(format!(
                "axis_tolerance must be a non-negative number, got {}",
                self.axis_tolerance
            )));
        }
        Ok(())
    }

    pub fn catalog_path(&self, catalog: Catalog) -> &Path {
        match catalog {
            Catalog::Syn => &self.syn_catalog,
            Catalog::Cat => &self.cat_catalog,
            Catalog::Pro => &self.pro_catalog,
        }
    }
}

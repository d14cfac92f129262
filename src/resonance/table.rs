use std::path::Path;

use sha2::{Digest, Sha256};

use crate::data::loader::parse_table;
use crate::error::{DatasetError, Result};

/// Number of leading integer identifiers in a resonance record.
pub const INTEGERS_LEN: usize = 3;

/// Position of the semi-major axis used to select candidate asteroids.
pub const AXIS_POSITION: usize = 6;

/// One known resonance.
///
/// A record carries the resonance integers first, the selection axis at
/// [`AXIS_POSITION`] and the reference axis as its final entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Resonance {
    integers: [i64; INTEGERS_LEN],
    axis: f64,
    reference_axis: f64,
    record: Vec<f64>,
}

impl Resonance {
    /// Returns `None` when the record is too short to hold an axis.
    pub fn from_record(record: Vec<f64>) -> Option<Self> {
        if record.len() <= AXIS_POSITION {
            return None;
        }
        let integers = [record[0] as i64, record[1] as i64, record[2] as i64];
        Some(Self {
            integers,
            axis: record[AXIS_POSITION],
            reference_axis: record[record.len() - 1],
            record,
        })
    }

    pub fn integers(&self) -> &[i64; INTEGERS_LEN] {
        &self.integers
    }

    /// Axis the asteroid window is centred on.
    pub fn axis(&self) -> f64 {
        self.axis
    }

    /// Axis the squared-difference feature is measured against.
    pub fn reference_axis(&self) -> f64 {
        self.reference_axis
    }

    pub fn record(&self) -> &[f64] {
        &self.record
    }
}

// ---------------------------------------------------------------------------
// ResonanceTable
// ---------------------------------------------------------------------------

/// Ordered resonance records plus a digest identifying their source.
#[derive(Debug, Clone)]
pub struct ResonanceTable {
    resonances: Vec<Resonance>,
    digest: String,
}

impl ResonanceTable {
    /// Load a whitespace-delimited resonance table.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let digest = hex_digest(&bytes);
        let text = String::from_utf8_lossy(&bytes);
        let matrix = parse_table(path, &text, None)?;

        if matrix.nrows() > 0 && matrix.ncols() <= AXIS_POSITION {
            return Err(DatasetError::parse(
                path,
                1,
                format!(
                    "resonance records need at least {} columns, found {}",
                    AXIS_POSITION + 1,
                    matrix.ncols()
                ),
            ));
        }

        let resonances = matrix
            .rows()
            .into_iter()
            .filter_map(|row| Resonance::from_record(row.to_vec()))
            .collect::<Vec<_>>();
        log::info!(
            "Loaded {} resonances from {}",
            resonances.len(),
            path.display()
        );
        Ok(Self { resonances, digest })
    }

    /// Build a table from in-memory records. The digest covers the values.
    pub fn from_records(records: Vec<Vec<f64>>) -> Result<Self> {
        let mut hasher = Sha256::new();
        let mut resonances = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            for v in &record {
                hasher.update(v.to_le_bytes());
            }
            hasher.update(b"\n");
            let found = record.len();
            let resonance = Resonance::from_record(record).ok_or_else(|| {
                DatasetError::parse(
                    "<memory>",
                    i + 1,
                    format!("resonance record has {found} entries"),
                )
            })?;
            resonances.push(resonance);
        }
        Ok(Self {
            resonances,
            digest: format!("{:x}", hasher.finalize()),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resonance> {
        self.resonances.iter()
    }

    pub fn len(&self) -> usize {
        self.resonances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resonances.is_empty()
    }

    /// SHA-256 of the source, lowercase hex.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use super::report::JoinReport;
use crate::data::loader::parse_table;
use crate::data::model::{DatasetSchema, FeatureMatrix};
use crate::error::{DatasetError, Result};

const SCHEMA_PREFIX: &str = "# schema: ";
const REPORT_PREFIX: &str = "# report: ";

// ---------------------------------------------------------------------------
// CacheKey
// ---------------------------------------------------------------------------

/// Everything a cached dataset depends on besides the catalog rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKeyParts<'a> {
    pub family: &'a str,
    pub table_digest: &'a str,
    pub axis_tolerance: f64,
    pub min_librations: usize,
    pub data_len: Option<usize>,
    pub axis_index: usize,
    pub schema: &'a DatasetSchema,
}

/// SHA-256 over [`CacheKeyParts`], lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(parts: &CacheKeyParts<'_>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(parts.family.as_bytes());
        hasher.update([0]);
        hasher.update(parts.table_digest.as_bytes());
        hasher.update([0]);
        hasher.update(parts.axis_tolerance.to_bits().to_le_bytes());
        hasher.update((parts.min_librations as u64).to_le_bytes());
        match parts.data_len {
            Some(n) => hasher.update((n as u64).to_le_bytes()),
            None => hasher.update(b"all"),
        }
        hasher.update((parts.axis_index as u64).to_le_bytes());
        hasher.update(parts.schema.signature().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `dataset-{first 16 hex digits}.txt`
    pub fn file_name(&self) -> String {
        format!("dataset-{}.txt", &self.0[..16])
    }
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// A dataset read back from the cache, with the resonance counts of the run
/// that wrote it when the entry recorded them.
#[derive(Debug, Clone)]
pub struct CachedDataset {
    pub matrix: FeatureMatrix,
    pub report: Option<JoinReport>,
}

/// A joined dataset persisted as text, headed by its schema signature and
/// the report of the run that built it.
#[derive(Debug, Clone)]
pub struct DatasetCache {
    dir: PathBuf,
    path: PathBuf,
}

impl DatasetCache {
    pub fn new(dir: impl Into<PathBuf>, key: &CacheKey) -> Self {
        let dir = dir.into();
        let path = dir.join(key.file_name());
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Remove the entry. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DatasetError::io(&self.path, e)),
        }
    }

    /// Load the entry, refusing it unless it was written with `schema`.
    pub fn load(&self, schema: &DatasetSchema) -> Result<CachedDataset> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| DatasetError::io(&self.path, e))?;
        let expected = schema.signature();
        let found = text
            .lines()
            .next()
            .and_then(|line| line.strip_prefix(SCHEMA_PREFIX))
            .unwrap_or("")
            .trim();
        if found != expected {
            return Err(DatasetError::CacheSchema {
                path: self.path.clone(),
                expected,
                found: found.to_string(),
            });
        }

        let report = text
            .lines()
            .nth(1)
            .and_then(|line| line.strip_prefix(REPORT_PREFIX))
            .and_then(JoinReport::from_header_fields);

        let matrix = parse_table(&self.path, &text, None)?;
        if matrix.nrows() == 0 {
            return Ok(CachedDataset {
                matrix: FeatureMatrix::zeros((0, schema.len())),
                report,
            });
        }
        if matrix.ncols() != schema.len() {
            return Err(DatasetError::CacheSchema {
                path: self.path.clone(),
                expected,
                found: format!("rows of {} columns", matrix.ncols()),
            });
        }
        Ok(CachedDataset { matrix, report })
    }

    /// Write the entry through a temporary file renamed into place, so a
    /// reader never observes a partially written table.
    pub fn store(
        &self,
        schema: &DatasetSchema,
        matrix: &FeatureMatrix,
        report: &JoinReport,
    ) -> Result<()> {
        schema.check_width(matrix)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| DatasetError::io(&self.dir, e))?;

        let tmp = NamedTempFile::new_in(&self.dir).map_err(|e| DatasetError::io(&self.dir, e))?;
        {
            let mut out = BufWriter::new(tmp.as_file());
            let write_err = |e| DatasetError::io(tmp.path(), e);
            writeln!(out, "{SCHEMA_PREFIX}{}", schema.signature()).map_err(write_err)?;
            writeln!(out, "{REPORT_PREFIX}{}", report.header_fields()).map_err(write_err)?;
            for row in matrix.rows() {
                let line = schema.format_row(&row.to_vec())?;
                writeln!(out, "{line}").map_err(write_err)?;
            }
            out.flush().map_err(write_err)?;
        }
        tmp.persist(&self.path)
            .map_err(|e| DatasetError::io(&self.path, e.error))?;

        log::info!(
            "Cached {} rows to {}",
            matrix.nrows(),
            self.path.display()
        );
        Ok(())
    }
}

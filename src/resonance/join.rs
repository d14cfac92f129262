use std::path::PathBuf;

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use super::cache::{CacheKey, CacheKeyParts, CachedDataset, DatasetCache};
use super::librations::{LibrationSet, MembershipLabels, TargetVector};
use super::report::JoinReport;
use super::table::{Resonance, ResonanceTable, INTEGERS_LEN};
use crate::data::filter::AxisFilter;
use crate::data::model::{coerce_identifiers, to_integer_matrix, ColumnKind, DatasetSchema, FeatureMatrix};
use crate::error::{DatasetError, Result};
use crate::injection::Injection;

/// Asteroids farther than this from a resonant axis are not joined.
pub const DEFAULT_AXIS_TOLERANCE: f64 = 0.01;

/// Resonances with fewer listed librators contribute no rows.
pub const DEFAULT_MIN_LIBRATIONS: usize = 50;

/// Columns appended per joined row: the resonance integers, the squared axis
/// difference and the label.
pub const APPENDED_COLUMNS: usize = INTEGERS_LEN + 2;

/// Result of [`ResonanceJoin::run`].
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub matrix: FeatureMatrix,
    pub report: JoinReport,
}

// ---------------------------------------------------------------------------
// ResonanceJoin
// ---------------------------------------------------------------------------

/// Duplicates every asteroid once per nearby resonance, attaching the
/// resonance integers, the squared distance to the resonant axis and a
/// libration label. The joined dataset is cached on disk under a key derived
/// from the configuration, and later runs with the same key read it back.
pub struct ResonanceJoin {
    resonances: ResonanceTable,
    axis_index: usize,
    librations_folder: PathBuf,
    cache_dir: PathBuf,
    clear_cache: bool,
    data_len: Option<usize>,
    family: String,
    axis_tolerance: f64,
    min_librations: usize,
    input_schema: DatasetSchema,
    output_schema: DatasetSchema,
    labeler: Box<dyn TargetVector>,
    headers: Vec<String>,
}

impl ResonanceJoin {
    pub fn new(
        resonances: ResonanceTable,
        input_schema: DatasetSchema,
        axis_index: usize,
        librations_folder: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        let output_schema = input_schema
            .clone()
            .with("i1", ColumnKind::Integer)
            .with("i2", ColumnKind::Integer)
            .with("i3", ColumnKind::Integer)
            .with("axis_diff", ColumnKind::Precise)
            .with("label", ColumnKind::Integer);
        let headers = output_schema.columns()[input_schema.len()..]
            .iter()
            .map(|c| c.name.clone())
            .collect();
        Self {
            resonances,
            axis_index,
            librations_folder: librations_folder.into(),
            cache_dir: cache_dir.into(),
            clear_cache: false,
            data_len: None,
            family: "custom".to_string(),
            axis_tolerance: DEFAULT_AXIS_TOLERANCE,
            min_librations: DEFAULT_MIN_LIBRATIONS,
            input_schema,
            output_schema,
            labeler: Box::new(MembershipLabels),
            headers,
        }
    }

    pub fn with_clear_cache(mut self, clear_cache: bool) -> Self {
        self.clear_cache = clear_cache;
        self
    }

    /// Catalog family tag mixed into the cache key.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_axis_tolerance(mut self, axis_tolerance: f64) -> Self {
        self.axis_tolerance = axis_tolerance;
        self
    }

    pub fn with_min_librations(mut self, min_librations: usize) -> Self {
        self.min_librations = min_librations;
        self
    }

    pub fn with_labeler(mut self, labeler: impl TargetVector + 'static) -> Self {
        self.labeler = Box::new(labeler);
        self
    }

    /// Cap the number of returned rows; `None` returns everything.
    pub fn set_data_len(&mut self, value: Option<usize>) {
        self.data_len = value;
    }

    pub fn output_schema(&self) -> &DatasetSchema {
        &self.output_schema
    }

    /// Cache entry for the current configuration.
    pub fn cache(&self) -> DatasetCache {
        let key = CacheKey::new(&CacheKeyParts {
            family: &self.family,
            table_digest: self.resonances.digest(),
            axis_tolerance: self.axis_tolerance,
            min_librations: self.min_librations,
            data_len: self.data_len,
            axis_index: self.axis_index,
            schema: &self.output_schema,
        });
        DatasetCache::new(&self.cache_dir, &key)
    }

    pub fn run(&self, mut matrix: FeatureMatrix) -> Result<JoinOutcome> {
        self.input_schema.check_width(&matrix)?;
        if self.axis_index >= matrix.ncols() {
            return Err(DatasetError::ColumnOutOfRange {
                index: self.axis_index,
                width: matrix.ncols(),
            });
        }
        coerce_identifiers(&mut matrix);

        let cache = self.cache();
        if self.clear_cache && cache.clear()? {
            log::info!("Removed cached dataset {}", cache.path().display());
        }
        if cache.exists() {
            let CachedDataset { matrix, report } = cache.load(&self.output_schema)?;
            log::info!("Dataset has been loaded from cache {}", cache.path().display());
            let report = JoinReport {
                rows: matrix.nrows(),
                from_cache: true,
                ..report.unwrap_or(JoinReport {
                    resonances: self.resonances.len(),
                    ..JoinReport::default()
                })
            };
            return Ok(JoinOutcome {
                matrix: self.truncate(matrix),
                report,
            });
        }

        let mut report = JoinReport {
            resonances: self.resonances.len(),
            ..JoinReport::default()
        };
        let mut blocks = Vec::new();

        for (i, resonance) in self.resonances.iter().enumerate() {
            log::debug!("Building dataset: resonance {}/{}", i + 1, report.resonances);

            let window = AxisFilter::new(resonance.axis(), self.axis_tolerance, self.axis_index);
            let matched = window.apply(&matrix)?;
            if matched.nrows() == 0 {
                report.skipped_no_match += 1;
                continue;
            }

            let path = self
                .librations_folder
                .join(super::librations_file_name(resonance.integers()));
            if !path.is_file() {
                log::debug!("No libration file {}", path.display());
                report.skipped_missing_file += 1;
                continue;
            }

            let librating = LibrationSet::load(&path)?;
            if librating.listed() < self.min_librations {
                log::debug!(
                    "{} lists {} librators, below {}",
                    path.display(),
                    librating.listed(),
                    self.min_librations
                );
                report.skipped_underpopulated += 1;
                continue;
            }

            blocks.push(self.resonance_block(matched, resonance, &librating)?);
            report.contributing += 1;
        }

        let joined = sort_by_identifier(&blocks, self.output_schema.len())?;
        report.rows = joined.nrows();
        cache.store(&self.output_schema, &joined, &report)?;

        Ok(JoinOutcome {
            matrix: self.truncate(joined),
            report,
        })
    }

    /// Rows of one resonance: matched catalog rows, the resonance integers,
    /// the squared axis difference and the label.
    fn resonance_block(
        &self,
        matched: FeatureMatrix,
        resonance: &Resonance,
        librating: &LibrationSet,
    ) -> Result<FeatureMatrix> {
        let (n, width) = matched.dim();
        let labels = self
            .labeler
            .target_vector(librating, to_integer_matrix(matched.view()).view());
        if labels.len() != n {
            return Err(DatasetError::SchemaMismatch {
                expected: n,
                found: labels.len(),
            });
        }

        let reference = resonance.reference_axis();
        let mut block = Array2::zeros((n, width + APPENDED_COLUMNS));
        block.slice_mut(s![.., ..width]).assign(&matched);
        for (k, &value) in resonance.integers().iter().enumerate() {
            block.column_mut(width + k).fill(value as f64);
        }
        block
            .column_mut(width + INTEGERS_LEN)
            .assign(&matched.column(self.axis_index).mapv(|a| (a - reference).powi(2)));
        block
            .column_mut(width + INTEGERS_LEN + 1)
            .assign(&labels.mapv(|l| l as f64));
        Ok(block)
    }

    fn truncate(&self, matrix: FeatureMatrix) -> FeatureMatrix {
        match self.data_len {
            Some(n) if n < matrix.nrows() => matrix.slice(s![..n, ..]).to_owned(),
            _ => matrix,
        }
    }
}

/// Stack the blocks and stable-sort the rows by asteroid identifier.
fn sort_by_identifier(blocks: &[FeatureMatrix], width: usize) -> Result<FeatureMatrix> {
    if blocks.is_empty() {
        return Ok(FeatureMatrix::zeros((0, width)));
    }
    let views: Vec<ArrayView2<'_, f64>> = blocks.iter().map(|b| b.view()).collect();
    let stacked = concatenate(Axis(0), &views)?;

    let ids = stacked.column(0);
    let mut order: Vec<usize> = (0..stacked.nrows()).collect();
    order.sort_by(|&a, &b| ids[a].total_cmp(&ids[b]));
    Ok(stacked.select(Axis(0), &order))
}

impl Injection for ResonanceJoin {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        let JoinOutcome { matrix, report } = self.run(matrix)?;
        report.log_summary();
        Ok(matrix)
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }
}

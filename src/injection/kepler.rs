use ndarray::{concatenate, Axis};

use super::Injection;
use crate::data::model::FeatureMatrix;
use crate::error::{DatasetError, Result};

/// Heliocentric gravitational parameter, AU³/day².
pub const GAUSS_MU: f64 = 0.0002959122082855911025;

/// Column holding the semi-major axis in catalog matrices.
pub const AXIS_COLUMN: usize = 2;

/// Appends the mean motion `n = sqrt(μ / a³)` derived from the semi-major axis.
///
/// The injection only accepts matrices of exactly `source_width` columns, so
/// feeding it its own output is rejected instead of growing a second
/// mean-motion column.
#[derive(Debug, Clone)]
pub struct KeplerInjection {
    source_width: usize,
    headers: Vec<String>,
}

impl KeplerInjection {
    pub fn new(source_width: usize) -> Self {
        Self {
            source_width,
            headers: vec!["n".to_string()],
        }
    }

    pub fn source_width(&self) -> usize {
        self.source_width
    }
}

/// Mean motion for a single semi-major axis.
pub fn mean_motion(axis: f64) -> f64 {
    (GAUSS_MU / axis.powi(3)).sqrt()
}

impl Injection for KeplerInjection {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        if matrix.ncols() != self.source_width {
            return Err(DatasetError::SchemaMismatch {
                expected: self.source_width,
                found: matrix.ncols(),
            });
        }
        if AXIS_COLUMN >= matrix.ncols() {
            return Err(DatasetError::ColumnOutOfRange {
                index: AXIS_COLUMN,
                width: matrix.ncols(),
            });
        }

        let axes = matrix.column(AXIS_COLUMN);
        if let Some((row, &value)) = axes
            .iter()
            .enumerate()
            .find(|(_, a)| !a.is_finite() || **a <= 0.0)
        {
            return Err(DatasetError::DataQuality { row, value });
        }

        let motions = axes.mapv(mean_motion).insert_axis(Axis(1));
        Ok(concatenate(Axis(1), &[matrix.view(), motions.view()])?)
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }
}

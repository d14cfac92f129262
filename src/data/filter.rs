use ndarray::Axis;

use super::model::FeatureMatrix;
use crate::error::{DatasetError, Result};
use crate::injection::Injection;

// ---------------------------------------------------------------------------
// Axis window: keep rows whose axis lies near a resonant axis
// ---------------------------------------------------------------------------

/// Keeps only the rows where `|m[i, axis_index] - resonant_axis| <= axis_swing`.
///
/// An empty result is a valid result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFilter {
    pub resonant_axis: f64,
    pub axis_swing: f64,
    pub axis_index: usize,
}

impl AxisFilter {
    pub fn new(resonant_axis: f64, axis_swing: f64, axis_index: usize) -> Self {
        Self {
            resonant_axis,
            axis_swing,
            axis_index,
        }
    }

    /// Whether a single axis value falls inside the window.
    pub fn accepts(&self, axis: f64) -> bool {
        (axis - self.resonant_axis).abs() <= self.axis_swing
    }

    /// Indices of rows passing the window.
    pub fn matching_rows(&self, matrix: &FeatureMatrix) -> Result<Vec<usize>> {
        if self.axis_index >= matrix.ncols() {
            return Err(DatasetError::ColumnOutOfRange {
                index: self.axis_index,
                width: matrix.ncols(),
            });
        }
        Ok(matrix
            .column(self.axis_index)
            .iter()
            .enumerate()
            .filter(|(_, &axis)| self.accepts(axis))
            .map(|(i, _)| i)
            .collect())
    }

    /// Copy out the rows passing the window.
    pub fn apply(&self, matrix: &FeatureMatrix) -> Result<FeatureMatrix> {
        let rows = self.matching_rows(matrix)?;
        Ok(matrix.select(Axis(0), &rows))
    }
}

impl Injection for AxisFilter {
    fn update_data(&self, matrix: FeatureMatrix) -> Result<FeatureMatrix> {
        self.apply(&matrix)
    }
}

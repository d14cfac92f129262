use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{DatasetError, Result};

/// Rows are observations (asteroid or asteroid × resonance), columns are
/// positional features. Column 0 is always the asteroid identifier.
pub type FeatureMatrix = Array2<f64>;

// ---------------------------------------------------------------------------
// ColumnKind – how a column is typed and written to text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Written as a truncated integer (`%d`).
    Integer,
    /// Written with six decimals (`%f`).
    Float,
    /// Written in scientific notation with 18 fractional digits (`%.18e`).
    Precise,
}

impl ColumnKind {
    /// Render a single cell according to the column kind.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            ColumnKind::Integer => format!("{}", value as i64),
            ColumnKind::Float => format!("{value:.6}"),
            ColumnKind::Precise => format!("{value:.18e}"),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "int"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Precise => write!(f, "precise"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetSchema – ordered, typed column list
// ---------------------------------------------------------------------------

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Positional schema of a feature matrix.
///
/// The schema is what gets persisted next to a cached dataset, so two
/// schemas are compatible exactly when their [`signature`](Self::signature)s
/// are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSchema {
    columns: Vec<ColumnSpec>,
}

impl DatasetSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Identifier column followed by `width - 1` precise columns named `c1..`.
    pub fn numeric(width: usize) -> Self {
        let mut columns = Vec::with_capacity(width);
        if width > 0 {
            columns.push(ColumnSpec::new("id", ColumnKind::Integer));
        }
        for i in 1..width {
            columns.push(ColumnSpec::new(format!("c{i}"), ColumnKind::Precise));
        }
        Self { columns }
    }

    /// Append a column, builder style.
    pub fn with(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec::new(name, kind));
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Space separated `name:kind` pairs.
    pub fn signature(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.kind))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Format one row with the per-column kinds.
    pub fn format_row(&self, row: &[f64]) -> Result<String> {
        if row.len() != self.columns.len() {
            return Err(DatasetError::SchemaMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        Ok(self
            .columns
            .iter()
            .zip(row)
            .map(|(col, v)| col.kind.format_value(*v))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Fail unless `matrix` has exactly as many columns as the schema.
    pub fn check_width(&self, matrix: &FeatureMatrix) -> Result<()> {
        if matrix.ncols() != self.columns.len() {
            return Err(DatasetError::SchemaMismatch {
                expected: self.columns.len(),
                found: matrix.ncols(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for DatasetSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

// ---------------------------------------------------------------------------
// Matrix helpers
// ---------------------------------------------------------------------------

/// Truncate the identifier column to integers in place.
pub fn coerce_identifiers(matrix: &mut FeatureMatrix) {
    if matrix.ncols() == 0 {
        return;
    }
    matrix.column_mut(0).mapv_inplace(f64::trunc);
}

/// Cast the whole matrix to integers, truncating toward zero.
pub fn to_integer_matrix(matrix: ArrayView2<'_, f64>) -> Array2<i64> {
    matrix.mapv(|v| v as i64)
}

/// Copy out the listed columns, in the listed order.
pub fn select_columns(matrix: &FeatureMatrix, indices: &[usize]) -> Result<FeatureMatrix> {
    if let Some(&index) = indices.iter().find(|&&i| i >= matrix.ncols()) {
        return Err(DatasetError::ColumnOutOfRange {
            index,
            width: matrix.ncols(),
        });
    }
    Ok(matrix.select(Axis(1), indices))
}

/// Split a labeled dataset into the selected feature columns and the
/// trailing label column.
pub fn split_features_target(
    matrix: &FeatureMatrix,
    indices: &[usize],
) -> Result<(FeatureMatrix, Array1<i64>)> {
    let width = matrix.ncols();
    if width == 0 {
        return Err(DatasetError::ColumnOutOfRange { index: 0, width });
    }
    let features = select_columns(matrix, indices)?;
    let target = matrix.column(width - 1).mapv(|v| v as i64);
    Ok((features, target))
}

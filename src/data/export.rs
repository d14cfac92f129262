use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{ColumnKind, DatasetSchema, FeatureMatrix};
use crate::error::{DatasetError, Result};

/// Arrow schema for a dataset schema: integer columns become `Int64`,
/// everything else `Float64`.
pub fn arrow_schema(schema: &DatasetSchema) -> Schema {
    Schema::new(
        schema
            .columns()
            .iter()
            .map(|c| {
                let data_type = match c.kind {
                    ColumnKind::Integer => DataType::Int64,
                    ColumnKind::Float | ColumnKind::Precise => DataType::Float64,
                };
                Field::new(&c.name, data_type, false)
            })
            .collect::<Vec<_>>(),
    )
}

/// Write a labeled dataset to a Parquet file, one column per schema entry.
pub fn write_parquet(path: &Path, schema: &DatasetSchema, matrix: &FeatureMatrix) -> Result<()> {
    schema.check_width(matrix)?;
    let arrow_schema = Arc::new(arrow_schema(schema));

    let columns: Vec<ArrayRef> = schema
        .columns()
        .iter()
        .zip(matrix.columns())
        .map(|(spec, values)| -> ArrayRef {
            match spec.kind {
                ColumnKind::Integer => {
                    Arc::new(Int64Array::from_iter_values(values.iter().map(|&v| v as i64)))
                }
                ColumnKind::Float | ColumnKind::Precise => {
                    Arc::new(Float64Array::from_iter_values(values.iter().copied()))
                }
            }
        })
        .collect();

    let batch = RecordBatch::try_new(arrow_schema.clone(), columns)?;
    let file = std::fs::File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, arrow_schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    log::info!("Wrote {} rows to {}", matrix.nrows(), path.display());
    Ok(())
}

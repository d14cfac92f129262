use std::path::Path;

use ndarray::Array2;

use super::model::FeatureMatrix;
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Catalog layout
// ---------------------------------------------------------------------------

/// How fields are separated on a catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Any run of whitespace.
    Whitespace,
    /// A single byte, read through the CSV reader.
    Byte(u8),
    /// Any of the listed characters; empty fields are dropped.
    AnyOf(&'static str),
}

/// Physical layout of a catalog text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLayout {
    /// Number of leading fields kept from each line.
    pub width: usize,
    pub delimiter: Delimiter,
    /// Header lines skipped before the first data row.
    pub skip_rows: usize,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a whitespace-delimited numeric table. Blank lines and lines starting
/// with `#` are ignored; every remaining row must have the same width.
pub fn load_table(path: &Path) -> Result<FeatureMatrix> {
    let text = read_text(path)?;
    parse_table(path, &text, None)
}

/// Parse whitespace-delimited rows from already-read text.
///
/// With `width` set, rows of any other width are rejected and an empty table
/// still comes back with that many columns.
pub fn parse_table(path: &Path, text: &str, width: Option<usize>) -> Result<FeatureMatrix> {
    let mut expected = width;
    let mut values = Vec::new();
    let mut rows = 0;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = parse_fields(path, line_no + 1, line.split_whitespace())?;
        match expected {
            Some(w) if w != row.len() => {
                return Err(DatasetError::parse(
                    path,
                    line_no + 1,
                    format!("expected {w} columns, found {}", row.len()),
                ));
            }
            Some(_) => {}
            None => expected = Some(row.len()),
        }
        values.extend(row);
        rows += 1;
    }

    Ok(Array2::from_shape_vec((rows, expected.unwrap_or(0)), values)?)
}

/// Load a whitespace-delimited list of integers, e.g. asteroid numbers.
pub fn load_integers(path: &Path) -> Result<Vec<i64>> {
    let text = read_text(path)?;
    let mut out = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for tok in line.split_whitespace() {
            let value = tok.parse::<i64>().map_err(|_| {
                DatasetError::parse(path, line_no + 1, format!("'{tok}' is not an integer"))
            })?;
            out.push(value);
        }
    }
    Ok(out)
}

/// Load a catalog file, keeping the first `layout.width` fields of each data
/// line and at most `dataset_end` rows.
pub fn load_catalog(
    path: &Path,
    layout: &CatalogLayout,
    dataset_end: Option<usize>,
) -> Result<FeatureMatrix> {
    let text = read_text(path)?;
    let limit = dataset_end.unwrap_or(usize::MAX);

    let rows = match layout.delimiter {
        Delimiter::Byte(byte) => read_delimited(path, &text, byte, layout, limit)?,
        Delimiter::Whitespace => split_lines(path, &text, layout, limit, |line| {
            line.split_whitespace().collect()
        })?,
        Delimiter::AnyOf(chars) => split_lines(path, &text, layout, limit, |line| {
            line.split(|c| chars.contains(c))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect()
        })?,
    };

    let n_rows = rows.len();
    let values: Vec<f64> = rows.into_iter().flatten().collect();
    log::debug!("Loaded {n_rows} rows from {}", path.display());
    Ok(Array2::from_shape_vec((n_rows, layout.width), values)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))
}

fn split_lines<'a, F>(
    path: &Path,
    text: &'a str,
    layout: &CatalogLayout,
    limit: usize,
    split: F,
) -> Result<Vec<Vec<f64>>>
where
    F: Fn(&'a str) -> Vec<&'a str>,
{
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate().skip(layout.skip_rows) {
        if rows.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let fields = split(line);
        rows.push(leading_fields(path, line_no + 1, fields, layout.width)?);
    }
    Ok(rows)
}

fn read_delimited(
    path: &Path,
    text: &str,
    byte: u8,
    layout: &CatalogLayout,
    limit: usize,
) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(byte)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (record_no, result) in reader.records().enumerate().skip(layout.skip_rows) {
        if rows.len() >= limit {
            break;
        }
        let record = result.map_err(|e| DatasetError::parse(path, record_no + 1, e.to_string()))?;
        let line_no = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(record_no + 1);
        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        rows.push(leading_fields(path, line_no, fields, layout.width)?);
    }
    Ok(rows)
}

fn leading_fields(path: &Path, line_no: usize, fields: Vec<&str>, width: usize) -> Result<Vec<f64>> {
    if fields.len() < width {
        return Err(DatasetError::parse(
            path,
            line_no,
            format!("expected at least {width} fields, found {}", fields.len()),
        ));
    }
    parse_fields(path, line_no, fields.into_iter().take(width))
}

fn parse_fields<'a>(
    path: &Path,
    line_no: usize,
    fields: impl Iterator<Item = &'a str>,
) -> Result<Vec<f64>> {
    fields
        .map(|tok| {
            let tok = tok.trim_matches(|c| c == '\'' || c == '"');
            tok.parse::<f64>().map_err(|_| {
                DatasetError::parse(path, line_no, format!("'{tok}' is not a number"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn table_skips_comments_and_blank_lines() {
        let file = write_temp("# header\n1 2.5 3\n\n4 5.5 6\n");
        let m = load_table(file.path()).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[1, 1]], 5.5);
    }

    #[test]
    fn table_rejects_ragged_rows() {
        let file = write_temp("1 2 3\n4 5\n");
        let err = load_table(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_table_keeps_requested_width() {
        let m = parse_table(Path::new("mem"), "# only a header\n", Some(15)).unwrap();
        assert_eq!(m.dim(), (0, 15));
    }

    #[test]
    fn integers_reject_non_integer_tokens() {
        let ok = write_temp("77 78\n79\n");
        assert_eq!(load_integers(ok.path()).unwrap(), vec![77, 78, 79]);

        let bad = write_temp("77 seven\n");
        assert!(matches!(
            load_integers(bad.path()),
            Err(DatasetError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn catalog_honours_skip_rows_width_and_end() {
        let file = write_temp(
            "title\ncolumns\n'1'  0.1  2.76  9.9\n'2'  0.2  2.50  9.9\n'3'  0.3  3.10  9.9\n",
        );
        let layout = CatalogLayout {
            width: 3,
            delimiter: Delimiter::Whitespace,
            skip_rows: 2,
        };
        let m = load_catalog(file.path(), &layout, Some(2)).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m.row(0).to_vec(), vec![1.0, 0.1, 2.76]);
        assert_eq!(m[[1, 2]], 2.5);
    }

    #[test]
    fn catalog_reads_byte_delimited_lines() {
        let file = write_temp("a;b\nc;d\ne;f\n1;2.1;0.05;9\n2;2.2;0.06;9\n");
        let layout = CatalogLayout {
            width: 3,
            delimiter: Delimiter::Byte(b';'),
            skip_rows: 3,
        };
        let m = load_catalog(file.path(), &layout, None).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[1, 1]], 2.2);
    }

    #[test]
    fn catalog_rejects_short_lines() {
        let file = write_temp("1 2\n");
        let layout = CatalogLayout {
            width: 3,
            delimiter: Delimiter::Whitespace,
            skip_rows: 0,
        };
        assert!(load_catalog(file.path(), &layout, None).is_err());
    }
}

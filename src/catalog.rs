use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::loader::{CatalogLayout, Delimiter};
use crate::data::model::{ColumnKind, ColumnSpec, DatasetSchema};
use crate::error::{DatasetError, Result};
use crate::injection::{Injection, KeplerInjection};

/// Rows kept from the synthetic catalog, counted from the top of the file.
pub const SYN_DATASET_END: usize = 406_253;

/// Columns read from the osculating-element catalog.
const CAT_WIDTH: usize = 10;

/// Index of the Kepler mean motion appended to the `cat` matrix.
pub const MEAN_MOTION_COLUMN: usize = CAT_WIDTH;

// ---------------------------------------------------------------------------
// Catalog families
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// Synthetic elements.
    Syn,
    /// Osculating elements from the asteroid catalog.
    Cat,
    /// Proper elements.
    Pro,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Syn, Catalog::Cat, Catalog::Pro];

    pub fn tag(&self) -> &'static str {
        match self {
            Catalog::Syn => "syn",
            Catalog::Cat => "cat",
            Catalog::Pro => "pro",
        }
    }

    /// Column holding the semi-major axis.
    pub fn axis_index(&self) -> usize {
        match self {
            Catalog::Syn | Catalog::Cat => 2,
            Catalog::Pro => 1,
        }
    }

    pub fn layout(&self) -> CatalogLayout {
        match self {
            Catalog::Syn => CatalogLayout {
                width: 10,
                delimiter: Delimiter::Whitespace,
                skip_rows: 2,
            },
            Catalog::Cat => CatalogLayout {
                width: CAT_WIDTH,
                delimiter: Delimiter::AnyOf(".,"),
                skip_rows: 6,
            },
            Catalog::Pro => CatalogLayout {
                width: 6,
                delimiter: Delimiter::Byte(b';'),
                skip_rows: 3,
            },
        }
    }

    /// Typed schema of the catalog matrix once its injection (if any) ran.
    pub fn input_schema(&self, with_injection: bool) -> DatasetSchema {
        let schema = match self {
            Catalog::Syn => {
                let mut columns = vec![ColumnSpec::new("id", ColumnKind::Integer)];
                columns.extend((1..=4).map(|i| ColumnSpec::new(format!("c{i}"), ColumnKind::Float)));
                columns.extend((5..=8).map(|i| ColumnSpec::new(format!("c{i}"), ColumnKind::Precise)));
                columns.push(ColumnSpec::new("c9", ColumnKind::Integer));
                DatasetSchema::new(columns)
            }
            Catalog::Cat | Catalog::Pro => DatasetSchema::numeric(self.layout().width),
        };
        if with_injection && *self == Catalog::Cat {
            schema.with("n", ColumnKind::Precise)
        } else {
            schema
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Catalog {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        Catalog::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| DatasetError::Configuration(format!("Unsupported catalog type: {s}")))
    }
}

/// What the assembled dataset is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Learn,
    Compare,
}

impl FromStr for Task {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "learn" => Ok(Task::Learn),
            "compare" => Ok(Task::Compare),
            other => Err(DatasetError::Configuration(format!("Unsupported task: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetParameters
// ---------------------------------------------------------------------------

/// How to read a catalog and which feature columns to hand downstream.
pub struct DatasetParameters {
    /// Each group is one feature selection, addressed by column index in the
    /// matrix produced after the injection.
    pub indices_cases: Vec<Vec<usize>>,
    pub layout: CatalogLayout,
    pub injection: Option<Box<dyn Injection>>,
    /// Data rows to load, already net of the skipped header rows.
    pub dataset_end: Option<usize>,
}

impl DatasetParameters {
    /// `dataset_end` counts from the top of the file, header rows included.
    pub fn new(
        indices_cases: Vec<Vec<usize>>,
        layout: CatalogLayout,
        injection: Option<Box<dyn Injection>>,
        dataset_end: Option<usize>,
    ) -> Result<Self> {
        let dataset_end = match dataset_end {
            Some(end) if end < layout.skip_rows => {
                return Err(DatasetError::Configuration(format!(
                    "dataset end {end} lies inside the {} header rows",
                    layout.skip_rows
                )));
            }
            Some(end) => Some(end - layout.skip_rows),
            None => None,
        };
        Ok(Self {
            indices_cases,
            layout,
            injection,
            dataset_end,
        })
    }

    /// Width of the matrix after the injection ran.
    pub fn output_width(&self) -> usize {
        self.layout.width
            + self
                .injection
                .as_ref()
                .map_or(0, |injection| injection.headers().len())
    }

    /// Every index group must address a column of a `width`-column matrix.
    pub fn validate_indices(&self, width: usize) -> Result<()> {
        match self.indices_cases.iter().flatten().find(|&&i| i >= width) {
            Some(&index) => Err(DatasetError::ColumnOutOfRange { index, width }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for DatasetParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetParameters")
            .field("indices_cases", &self.indices_cases)
            .field("layout", &self.layout)
            .field("injection", &self.injection.as_ref().map(|i| i.headers().to_vec()))
            .field("dataset_end", &self.dataset_end)
            .finish()
    }
}

/// Injection attached to a catalog family.
pub fn injection_for(catalog: Catalog) -> Result<Option<Box<dyn Injection>>> {
    match catalog {
        Catalog::Syn => Ok(None),
        Catalog::Cat => Ok(Some(Box::new(KeplerInjection::new(catalog.layout().width)))),
        Catalog::Pro => Err(DatasetError::Configuration(
            "no injection is defined for the pro catalog".to_string(),
        )),
    }
}

pub fn learn_parameters(
    catalog: Catalog,
    injection: Option<Box<dyn Injection>>,
    indices: Option<Vec<Vec<usize>>>,
) -> Result<DatasetParameters> {
    let (defaults, dataset_end) = match catalog {
        Catalog::Syn => (vec![vec![2, 3, 4, 5], vec![2, 3, 5]], Some(SYN_DATASET_END)),
        Catalog::Cat => (
            vec![vec![2, 3, MEAN_MOTION_COLUMN], vec![2, 3, 4, MEAN_MOTION_COLUMN]],
            None,
        ),
        Catalog::Pro => (vec![vec![1, 2], vec![1, 2, 3]], None),
    };
    let indices = indices.filter(|i| !i.is_empty()).unwrap_or(defaults);
    DatasetParameters::new(indices, catalog.layout(), injection, dataset_end)
}

pub fn compare_parameters(
    catalog: Catalog,
    injection: Option<Box<dyn Injection>>,
) -> Result<DatasetParameters> {
    let (indices, dataset_end) = match catalog {
        Catalog::Syn => (
            vec![vec![2, 3, 4], vec![2, 3, 5], vec![2, 4, 5], vec![3, 4, 5], vec![2, 5]],
            Some(SYN_DATASET_END),
        ),
        Catalog::Cat => {
            let n = MEAN_MOTION_COLUMN;
            (
                vec![vec![2, 3, 4], vec![2, 3, n], vec![2, 4, n], vec![3, 4, n], vec![2, n]],
                None,
            )
        }
        Catalog::Pro => {
            return Err(DatasetError::Configuration(
                "the pro catalog has no compare parameters".to_string(),
            ))
        }
    };
    DatasetParameters::new(indices, catalog.layout(), injection, dataset_end)
}

/// Parameters for `task`, with the family's own injection attached.
pub fn parameters_for(task: Task, catalog: Catalog) -> Result<DatasetParameters> {
    let injection = match catalog {
        Catalog::Pro => None,
        _ => injection_for(catalog)?,
    };
    match task {
        Task::Learn => learn_parameters(catalog, injection, None),
        Task::Compare => compare_parameters(catalog, injection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_is_a_configuration_error() {
        assert_eq!("syn".parse::<Catalog>().unwrap(), Catalog::Syn);
        let err = "mpc".parse::<Catalog>().unwrap_err();
        assert!(matches!(err, DatasetError::Configuration(msg) if msg.contains("mpc")));
    }

    #[test]
    fn axis_indices() {
        assert_eq!(Catalog::Syn.axis_index(), 2);
        assert_eq!(Catalog::Cat.axis_index(), 2);
        assert_eq!(Catalog::Pro.axis_index(), 1);
    }

    #[test]
    fn injections_per_family() {
        assert!(injection_for(Catalog::Syn).unwrap().is_none());
        let kepler = injection_for(Catalog::Cat).unwrap().unwrap();
        assert_eq!(kepler.headers().to_vec(), vec!["n".to_string()]);
        assert!(matches!(
            injection_for(Catalog::Pro),
            Err(DatasetError::Configuration(_))
        ));
    }

    #[test]
    fn dataset_end_is_net_of_header_rows() {
        let params = learn_parameters(Catalog::Syn, None, None).unwrap();
        assert_eq!(params.dataset_end, Some(SYN_DATASET_END - 2));
        assert_eq!(params.indices_cases, vec![vec![2, 3, 4, 5], vec![2, 3, 5]]);

        let layout = Catalog::Pro.layout();
        assert!(DatasetParameters::new(vec![], layout, None, Some(1)).is_err());
    }

    #[test]
    fn explicit_indices_override_defaults() {
        let params = learn_parameters(Catalog::Pro, None, Some(vec![vec![1, 4]])).unwrap();
        assert_eq!(params.indices_cases, vec![vec![1, 4]]);
    }

    #[test]
    fn compare_is_unsupported_for_proper_elements() {
        assert!(compare_parameters(Catalog::Syn, None).is_ok());
        assert!(matches!(
            compare_parameters(Catalog::Pro, None),
            Err(DatasetError::Configuration(_))
        ));
    }

    #[test]
    fn default_indices_fit_the_produced_width() {
        for task in [Task::Learn, Task::Compare] {
            for catalog in [Catalog::Syn, Catalog::Cat] {
                let params = parameters_for(task, catalog).unwrap();
                let width = params.output_width();
                assert_eq!(width, catalog.input_schema(params.injection.is_some()).len());
                params.validate_indices(width).unwrap();
            }
        }
        let params = parameters_for(Task::Learn, Catalog::Pro).unwrap();
        params.validate_indices(params.output_width()).unwrap();
    }

    #[test]
    fn cat_groups_address_the_mean_motion_column() {
        let schema = Catalog::Cat.input_schema(true);
        assert_eq!(schema.columns()[MEAN_MOTION_COLUMN].name, "n");

        let compare = parameters_for(Task::Compare, Catalog::Cat).unwrap();
        assert_eq!(
            compare.indices_cases,
            vec![vec![2, 3, 4], vec![2, 3, 10], vec![2, 4, 10], vec![3, 4, 10], vec![2, 10]]
        );
        let learn = parameters_for(Task::Learn, Catalog::Cat).unwrap();
        for group in compare.indices_cases.iter().chain(&learn.indices_cases).skip(1) {
            assert!(group.contains(&MEAN_MOTION_COLUMN), "{group:?}");
        }
    }

    #[test]
    fn out_of_range_indices_are_reported() {
        let params = learn_parameters(Catalog::Pro, None, Some(vec![vec![1, 9]])).unwrap();
        assert!(matches!(
            params.validate_indices(6),
            Err(DatasetError::ColumnOutOfRange { index: 9, width: 6 })
        ));
    }

    #[test]
    fn synthetic_schema_matches_the_fifteen_column_layout() {
        let kinds: Vec<ColumnKind> = Catalog::Syn
            .input_schema(false)
            .columns()
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds.len(), 10);
        assert_eq!(kinds[0], ColumnKind::Integer);
        assert_eq!(kinds[4], ColumnKind::Float);
        assert_eq!(kinds[5], ColumnKind::Precise);
        assert_eq!(kinds[9], ColumnKind::Integer);
    }
}

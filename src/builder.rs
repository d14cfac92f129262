use crate::catalog::{parameters_for, Catalog, DatasetParameters, Task};
use crate::config::Settings;
use crate::data::loader::load_catalog;
use crate::data::model::{DatasetSchema, FeatureMatrix};
use crate::error::Result;
use crate::resonance::{JoinReport, ResonanceJoin, ResonanceTable};

/// Per-run switches that are not part of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub task: Task,
    pub clear_cache: bool,
    /// Cap on returned rows.
    pub data_len: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            task: Task::Learn,
            clear_cache: false,
            data_len: None,
        }
    }
}

/// A labeled dataset together with what produced it.
#[derive(Debug)]
pub struct BuiltDataset {
    pub matrix: FeatureMatrix,
    pub schema: DatasetSchema,
    pub parameters: DatasetParameters,
    pub report: JoinReport,
}

/// Load a catalog, run its injection and join it against the resonance table.
pub fn build_dataset(
    settings: &Settings,
    catalog: Catalog,
    options: &BuildOptions,
) -> Result<BuiltDataset> {
    let parameters = parameters_for(options.task, catalog)?;
    parameters.validate_indices(parameters.output_width())?;

    let path = settings.catalog_path(catalog);
    log::info!("Loading {catalog} catalog from {}", path.display());
    let raw = load_catalog(path, &parameters.layout, parameters.dataset_end)?;
    let matrix = match &parameters.injection {
        Some(injection) => injection.update_data(raw)?,
        None => raw,
    };

    let table = ResonanceTable::load(&settings.resonance_table)?;
    let mut join = ResonanceJoin::new(
        table,
        catalog.input_schema(parameters.injection.is_some()),
        catalog.axis_index(),
        &settings.librations_folder,
        &settings.cache_dir,
    )
    .with_family(catalog.tag())
    .with_clear_cache(options.clear_cache)
    .with_axis_tolerance(settings.axis_tolerance)
    .with_min_librations(settings.min_librations);
    join.set_data_len(options.data_len);

    let outcome = join.run(matrix)?;
    outcome.report.log_summary();

    Ok(BuiltDataset {
        matrix: outcome.matrix,
        schema: join.output_schema().clone(),
        parameters,
        report: outcome.report,
    })
}

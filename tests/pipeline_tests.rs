//! End-to-end tests: catalog file → injections → resonance join → export.

use std::fmt::Write as _;
use std::path::Path;

use ndarray::array;
use resonance_dataset::data::model::split_features_target;
use resonance_dataset::resonance::librations_file_name;
use resonance_dataset::{
    build_dataset, AxisFilter, BuildOptions, Catalog, DatasetError, FeatureMatrix,
    FilteredInjection, Injection, KeplerInjection, Pipeline, Settings, Task,
};
use tempfile::TempDir;

/// Writes a `syn` catalog with two header lines and returns the settings
/// pointing at it. Asteroid `k` sits at `2.0 + 0.00021 k` AU.
fn syn_workspace(dir: &Path, asteroids: i64) -> Settings {
    let mut catalog = String::from("% synthetic\n% id H a e sini g s p q flag\n");
    for id in 1..=asteroids {
        let axis = 2.0 + 0.00021 * id as f64;
        writeln!(
            catalog,
            "{id}  15.2  {axis:.6}  0.120000  0.050000  1.5e1  -2.5e1  1.0e-3  2.0e-3  1"
        )
        .unwrap();
    }
    std::fs::write(dir.join("catalog.syn"), catalog).unwrap();

    std::fs::write(
        dir.join("resonances.txt"),
        "2 -5 -2 0 0 5 2.001 2.001\n4 -2 -1 0 0 -1 2.020 2.020\n9 -9 -1 0 0 1 2.010 2.010\n",
    )
    .unwrap();

    let librations = dir.join("librations");
    std::fs::create_dir(&librations).unwrap();
    let odd: Vec<String> = (1..200).step_by(2).map(|i: i64| i.to_string()).collect();
    std::fs::write(librations.join(librations_file_name(&[2, -5, -2])), odd.join("\n")).unwrap();
    // Too few librators to count.
    std::fs::write(librations.join(librations_file_name(&[4, -2, -1])), "1\n2\n3\n").unwrap();

    Settings {
        syn_catalog: dir.join("catalog.syn"),
        resonance_table: dir.join("resonances.txt"),
        librations_folder: librations,
        cache_dir: dir.join("cache"),
        ..Settings::default()
    }
}

#[test]
fn builds_labeled_synthetic_dataset() {
    let dir = TempDir::new().unwrap();
    let settings = syn_workspace(dir.path(), 100);

    let dataset = build_dataset(&settings, Catalog::Syn, &BuildOptions::default()).unwrap();

    // Axis window 2.001 ± 0.01 keeps asteroids 1..=52.
    assert_eq!(dataset.matrix.dim(), (52, 15));
    assert_eq!(dataset.schema.len(), 15);
    assert_eq!(dataset.report.contributing, 1);
    assert_eq!(dataset.report.skipped_underpopulated, 1);
    assert_eq!(dataset.report.skipped_missing_file, 1);

    let ids = dataset.matrix.column(0).to_vec();
    assert!(ids.windows(2).all(|w| w[0] <= w[1]));

    let (features, target) =
        split_features_target(&dataset.matrix, &dataset.parameters.indices_cases[0]).unwrap();
    assert_eq!(features.ncols(), 4);
    assert_eq!(target.iter().filter(|&&y| y == 1).count(), 26);
}

#[test]
fn rebuild_after_clearing_matches_cached_run() {
    let dir = TempDir::new().unwrap();
    let settings = syn_workspace(dir.path(), 100);

    let first = build_dataset(&settings, Catalog::Syn, &BuildOptions::default()).unwrap();
    let cached = build_dataset(&settings, Catalog::Syn, &BuildOptions::default()).unwrap();
    assert!(cached.report.from_cache);
    assert_eq!(first.matrix, cached.matrix);

    let options = BuildOptions {
        clear_cache: true,
        ..BuildOptions::default()
    };
    let rebuilt = build_dataset(&settings, Catalog::Syn, &options).unwrap();
    assert!(!rebuilt.report.from_cache);
    assert_eq!(first.matrix, rebuilt.matrix);
}

#[test]
fn compare_task_on_proper_elements_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let settings = syn_workspace(dir.path(), 10);
    let options = BuildOptions {
        task: Task::Compare,
        ..BuildOptions::default()
    };
    assert!(matches!(
        build_dataset(&settings, Catalog::Pro, &options),
        Err(DatasetError::Configuration(_))
    ));
}

#[test]
fn parquet_export_of_built_dataset() {
    use resonance_dataset::data::export::write_parquet;

    let dir = TempDir::new().unwrap();
    let settings = syn_workspace(dir.path(), 60);
    let dataset = build_dataset(&settings, Catalog::Syn, &BuildOptions::default()).unwrap();

    let path = dir.path().join("dataset.parquet");
    write_parquet(&path, &dataset.schema, &dataset.matrix).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

// ---------------------------------------------------------------------------
// Composition properties
// ---------------------------------------------------------------------------

fn elements() -> FeatureMatrix {
    array![
        [1.0, 0.1, 2.000, 0.01],
        [2.0, 0.2, 2.390, 0.02],
        [3.0, 0.3, 2.396, 0.03],
        [4.0, 0.4, 2.800, 0.04],
        [5.0, 0.5, 2.393, 0.05],
    ]
}

#[test]
fn filter_keeps_exactly_rows_inside_window() {
    let m = elements();
    for (axis, swing) in [(2.393, 0.003), (2.0, 0.5), (5.0, 0.1), (2.8, 0.0)] {
        let filter = AxisFilter::new(axis, swing, 2);
        let kept = filter.apply(&m).unwrap();
        let expected = m
            .column(2)
            .iter()
            .filter(|&&a| (a - axis).abs() <= swing)
            .count();
        assert_eq!(kept.nrows(), expected);
        assert!(kept.column(2).iter().all(|&a| (a - axis).abs() <= swing));
    }
}

#[test]
fn decorated_kepler_equals_filter_then_kepler() {
    let filter = AxisFilter::new(2.393, 0.004, 2);
    let decorated = FilteredInjection::new(KeplerInjection::new(4), filter);
    let explicit = Pipeline::new()
        .then(filter)
        .then(KeplerInjection::new(4));

    let a = decorated.update_data(elements()).unwrap();
    let b = explicit.update_data(elements()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.column(0).to_vec(), vec![2.0, 3.0, 5.0]);
    assert_eq!(a.ncols(), 5);
}

#[test]
fn kepler_twice_through_a_pipeline_fails() {
    let twice = Pipeline::new()
        .then(KeplerInjection::new(4))
        .then(KeplerInjection::new(4));
    assert!(matches!(
        twice.update_data(elements()),
        Err(DatasetError::SchemaMismatch { expected: 4, found: 5 })
    ));
}

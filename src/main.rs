use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use resonance_dataset::data::export::write_parquet;
use resonance_dataset::data::model::split_features_target;
use resonance_dataset::{build_dataset, BuildOptions, Catalog, Settings, Task};

/// Build a labeled resonance dataset from an asteroid catalog.
#[derive(Debug, Parser)]
#[command(name = "resonance-dataset", version, about)]
struct Args {
    /// Catalog family: syn, cat or pro.
    #[arg(short, long, default_value = "syn")]
    catalog: Catalog,

    /// learn or compare.
    #[arg(short, long, default_value = "learn")]
    task: Task,

    /// JSON settings file; defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Rebuild instead of reading a cached dataset.
    #[arg(long)]
    clear_cache: bool,

    /// Keep only the first N rows.
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Also write the dataset as Parquet.
    #[arg(long)]
    parquet: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let options = BuildOptions {
        task: args.task,
        clear_cache: args.clear_cache,
        data_len: args.limit,
    };
    let dataset = build_dataset(&settings, args.catalog, &options)
        .with_context(|| format!("building {} dataset", args.catalog))?;

    println!("{}", dataset.report);
    println!("schema: {}", dataset.schema);
    for indices in &dataset.parameters.indices_cases {
        let (features, target) = split_features_target(&dataset.matrix, indices)?;
        let positives = target.iter().filter(|&&y| y == 1).count();
        println!(
            "features {indices:?}: {} rows x {} columns, {positives} positive",
            features.nrows(),
            features.ncols()
        );
    }

    if let Some(path) = &args.parquet {
        write_parquet(path, &dataset.schema, &dataset.matrix)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

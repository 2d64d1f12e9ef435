pub mod fields;
pub mod render;

use anyhow::Result;
use choromap::{Config, Dataset};

use crate::cli::{Cli, InputArgs};

/// Config file (if any) with command-line overrides applied.
pub(crate) fn load_config(cli: &Cli, input: &InputArgs) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(column) = &input.geometry_column { config.load.geometry_column = column.clone() }
    if let Some(epsg) = input.source_epsg {
        config.load.source_epsg = epsg;
        config.load.source_proj4 = None;
    }

    Ok(config)
}

/// Load and validate the input table, reporting dropped rows.
pub(crate) fn load_dataset(input: &InputArgs, config: &Config) -> Result<Dataset> {
    println!("[load] reading {}", input.input.display());
    let dataset = Dataset::load_csv(&input.input, &config.load)?;

    let report = dataset.report();
    println!("[load] kept {} of {} rows", report.kept_rows, report.input_rows);
    for (reason, count) in &report.dropped {
        println!("[load]   dropped {count} ({reason})");
    }

    Ok(dataset)
}

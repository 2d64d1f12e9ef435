use std::path::PathBuf;

use anyhow::Result;
use choromap::{Choropleth, ZoomPolicy};
use tracing::info;

use crate::commands::{load_config, load_dataset};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let mut config = load_config(cli, &args.input)?;
    if args.fit_zoom { config.map.zoom = ZoomPolicy::FitExtent }
    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./map.svg"));

    let dataset = load_dataset(&args.input, &config)?;
    if dataset.is_empty() {
        println!("No data to display: no row has a usable geometry.");
        return Ok(());
    }

    let field = match &args.field {
        Some(name) => dataset.select_field(name, &config.fields)?,
        None => dataset.default_field(&config.fields)?,
    };

    let map = Choropleth::build(&dataset, &field, &config.map)?;
    let viewport = map.viewport();
    info!("[render] center ({:.4}, {:.4}) zoom {}", viewport.center.lat, viewport.center.lon, viewport.zoom);

    println!("Choropleth map of {field}");
    println!("Number of localities shown: {}", map.record_count());
    println!("Statistics for {field}:");
    print!("{}", map.summary());

    println!("[render] writing SVG to {}", out_path.display());
    map.to_svg_with_width(&out_path, args.width)?;

    if let Some(path) = &args.geojson {
        println!("[render] writing GeoJSON to {}", path.display());
        map.write_geojson(path)?;
    }

    Ok(())
}

use std::path::PathBuf;

/// Choropleth maps from locality tables (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "choromap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file; flags below override it
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the numeric fields that can color the map
    Fields(FieldsArgs),

    /// Render a choropleth map of one field
    Render(RenderArgs),
}

/// Options shared by every command that loads a table.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input CSV with a WKT geometry column
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Name of the WKT geometry column
    #[arg(long)]
    pub geometry_column: Option<String>,

    /// EPSG code of the input coordinates, e.g. 2039
    #[arg(long)]
    pub source_epsg: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Field to color by, defaults to pop_approx or the first numeric field
    #[arg(short, long)]
    pub field: Option<String>,

    /// Output SVG file, defaults to "./map.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the map as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(short, long, default_value_t = 1200)]
    pub width: u32,

    /// Derive zoom from the data extent instead of the fixed default
    #[arg(long)]
    pub fit_zoom: bool,
}

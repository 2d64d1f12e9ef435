#![doc = "Choromap public API"]
mod choropleth;
mod config;
mod dataset;
mod error;
mod geom;
mod io;

#[doc(inline)]
pub use choropleth::{Choropleth, ColorScale, LatLon, Region, Rgb, Viewport, ZoomPolicy};

#[doc(inline)]
pub use config::{Config, FieldOptions, LoadOptions, MapOptions};

#[doc(inline)]
pub use dataset::{Dataset, FieldSelection, LoadReport, Summary};

#[doc(inline)]
pub use error::{BuildError, LoadError, SelectionError};

#[doc(inline)]
pub use geom::{parse_geometry, total_bounds, Crs, DropReason, Parsed};

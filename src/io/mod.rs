//! Format-specific reading and writing.
//!
//! - `csv` - tabular input
//! - `geojson` - geometry encoding for GeoJSON export
//! - `svg` - static map rendering
//!
//! Choropleth exports live in `choropleth/io` as methods on `Choropleth`.

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod svg;

pub(crate) use csv::*;

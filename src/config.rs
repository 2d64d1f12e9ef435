//! Run configuration. Every field has a default matching the 2022 census
//! locality dataset, so an empty JSON object is a valid config file.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{choropleth::ZoomPolicy, geom::Crs};

pub(crate) const ENGLISH_NAME: &str = "SHEM_YISHUV_ENG";
pub(crate) const HEBREW_NAME: &str = "SHEM_YISHUV_HEB";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub load: LoadOptions,
    pub fields: FieldOptions,
    pub map: MapOptions,
}

impl Config {
    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("[config] Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[config] Failed to parse config from {}", path.display()))
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("[config] Failed to parse config string")
    }
}

/// How raw rows become a validated dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Column holding the WKT geometry.
    pub geometry_column: String,
    /// Columns that must exist for the load to succeed.
    pub required_columns: Vec<String>,
    /// EPSG code of the input coordinates.
    pub source_epsg: u32,
    /// PROJ.4 definition overriding the built-in one for `source_epsg`.
    pub source_proj4: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            geometry_column: "geometry".into(),
            required_columns: vec![ENGLISH_NAME.into(), HEBREW_NAME.into()],
            source_epsg: Crs::ISRAELI_TM_GRID,
            source_proj4: None,
        }
    }
}

impl LoadOptions {
    /// Resolve the source CRS, preferring an explicit PROJ.4 override.
    pub(crate) fn source_crs(&self) -> Option<Crs> {
        match &self.source_proj4 {
            Some(definition) => Some(Crs::custom(self.source_epsg, definition.clone())),
            None => Crs::from_epsg(self.source_epsg),
        }
    }
}

/// Which attributes may drive the color scale.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOptions {
    /// Exact column names never offered for color selection.
    pub excluded: Vec<String>,
    /// Preferred field when the caller does not pick one.
    pub default_field: String,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            excluded: ["geometry", "SEMEL_YISHUV", "Shape_Length", "Shape_Area"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_field: "pop_approx".into(),
        }
    }
}

/// Presentation parameters handed to the choropleth builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    pub zoom: ZoomPolicy,
    pub opacity: f64,
    pub map_style: String,
    /// Identifying attributes shown on hover, ahead of the selected field.
    pub hover_columns: Vec<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomPolicy::default(),
            opacity: 0.7,
            map_style: "carto-positron".into(),
            hover_columns: vec![ENGLISH_NAME.into(), HEBREW_NAME.into()],
        }
    }
}

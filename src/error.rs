//! Error taxonomy for loading, field selection and map construction.
//!
//! Row-level geometry problems never show up here: the parser absorbs them
//! and the loader only counts them (see [`crate::LoadReport`]).

use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

/// Structural failure of a dataset load. Fatal, nothing partial is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("[dataset::load] failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[dataset::load] failed to read tabular data from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("[dataset::load] required column {column:?} is missing")]
    MissingColumn { column: String },

    #[error("[dataset::load] column {column:?} has type {dtype}, expected text")]
    ColumnType { column: String, dtype: String },

    #[error("[dataset::load] invalid CRS definition {definition:?}: {reason}")]
    Crs { definition: String, reason: String },

    #[error("[dataset::load] reprojection failed for record {row}: {reason}")]
    Reproject { row: usize, reason: String },

    #[error(transparent)]
    Frame(#[from] PolarsError),
}

impl LoadError {
    /// Name of the missing resource (file path or column), if that is what failed.
    pub fn missing_resource(&self) -> Option<String> {
        match self {
            LoadError::Open { path, .. } => Some(path.display().to_string()),
            LoadError::MissingColumn { column } => Some(column.clone()),
            _ => None,
        }
    }
}

/// A color field that cannot drive the map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("[dataset::fields] no such field {field:?}")]
    UnknownField { field: String },

    #[error("[dataset::fields] field {field:?} has type {dtype}, expected a number")]
    NotNumeric { field: String, dtype: String },

    #[error("[dataset::fields] field {field:?} is excluded from color selection")]
    Excluded { field: String },

    #[error("[dataset::fields] dataset has no selectable numeric fields")]
    NoNumericFields,
}

/// Failure to build a choropleth from a validated dataset.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("[choropleth] dataset is empty, nothing to draw")]
    Empty,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Frame(#[from] PolarsError),
}

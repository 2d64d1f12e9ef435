mod fields;
mod load;

use std::collections::BTreeMap;

use geo::{MultiPolygon, Rect};
use polars::frame::DataFrame;

use crate::{error::LoadError, geom::{self, Crs, DropReason}};

pub use fields::{FieldSelection, Summary};

/// Row accounting for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub input_rows: usize,
    pub kept_rows: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl LoadReport {
    #[inline] pub fn dropped_rows(&self) -> usize { self.dropped.values().sum() }
}

/// A validated collection: attribute rows paired one-to-one with non-empty
/// shapes, all in one CRS. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    data: DataFrame, // attributes, geometry column removed
    shapes: Vec<MultiPolygon<f64>>, // shapes[i] belongs to data row i
    crs: Crs,
    report: LoadReport,
}

impl Dataset {
    /// Number of validated records.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Attribute columns, one row per shape.
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    #[inline] pub fn report(&self) -> &LoadReport { &self.report }

    /// Bounding extent over every shape, recomputed on each call.
    #[inline]
    pub fn total_bounds(&self) -> Option<Rect<f64>> { geom::total_bounds(&self.shapes) }

    /// A copy of this dataset in another CRS. Attributes are shared, not copied.
    pub fn reproject(&self, to: &Crs) -> Result<Self, LoadError> {
        Ok(Self {
            data: self.data.clone(),
            shapes: geom::reproject_shapes(&self.shapes, &self.crs, to)?,
            crs: to.clone(),
            report: self.report.clone(),
        })
    }
}

//! Map construction: viewport, color scale, and one colored region per record.

mod io;
mod scale;
mod viewport;

use geo::MultiPolygon;
use polars::prelude::{AnyValue, Column, PolarsResult};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    config::MapOptions,
    dataset::{Dataset, FieldSelection, Summary},
    error::BuildError,
};

pub use scale::{ColorScale, Rgb};
pub use viewport::{LatLon, Viewport, ZoomPolicy};

/// One drawn region, tied to a single validated record.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<'a> {
    /// Row of the record in the dataset.
    pub index: usize,
    pub shape: &'a MultiPolygon<f64>,
    /// Selected field value; `None` draws the region without fill.
    pub value: Option<f64>,
    /// Place on the color ramp in [0, 1].
    pub position: Option<f64>,
    pub fill: Option<Rgb>,
    /// Hover attributes in display order, selected field last.
    pub hover: Vec<(String, Value)>,
}

/// A renderable choropleth over a borrowed dataset.
#[derive(Debug, Clone)]
pub struct Choropleth<'a> {
    field: FieldSelection,
    regions: Vec<Region<'a>>,
    scale: Option<ColorScale>, // None when the field has no finite values
    viewport: Viewport,
    summary: Summary,
    opacity: f64,
    map_style: String,
}

impl<'a> Choropleth<'a> {
    /// Color every record of `dataset` by `field`.
    /// The dataset must not be empty; callers show an empty state instead.
    pub fn build(dataset: &'a Dataset, field: &FieldSelection, options: &MapOptions) -> Result<Self, BuildError> {
        let viewport = Viewport::from_dataset(dataset, options.zoom).ok_or(BuildError::Empty)?;
        dataset.require_numeric(field.name())?;

        let values = dataset.field_values(field)?;
        let scale = ColorScale::from_values(&values);

        let mut hover_columns = options.hover_columns.iter()
            .filter(|name| name.as_str() != field.name())
            .filter_map(|name| dataset.data().column(name).ok())
            .collect::<Vec<_>>();
        hover_columns.push(dataset.data().column(field.name())?);

        let regions = dataset.shapes().iter().zip(values).enumerate()
            .map(|(index, (shape, value))| {
                let position = value.zip(scale).and_then(|(v, scale)| scale.position(v));
                let hover = hover_columns.iter()
                    .map(|column| Ok((column.name().to_string(), cell_to_json(column, index)?)))
                    .collect::<PolarsResult<Vec<_>>>()?;
                Ok(Region { index, shape, value, position, fill: position.map(ColorScale::color_at), hover })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        debug!("[choropleth] built {} regions colored by {field}", regions.len());

        Ok(Self {
            field: field.clone(),
            summary: Summary::from_values(&regions.iter().map(|r| r.value).collect::<Vec<_>>()),
            regions,
            scale,
            viewport,
            opacity: options.opacity,
            map_style: options.map_style.clone(),
        })
    }

    #[inline] pub fn field(&self) -> &FieldSelection { &self.field }

    #[inline] pub fn regions(&self) -> &[Region<'a>] { &self.regions }

    #[inline] pub fn scale(&self) -> Option<ColorScale> { self.scale }

    #[inline] pub fn viewport(&self) -> Viewport { self.viewport }

    /// Statistics of the selected field, for display next to the map.
    #[inline] pub fn summary(&self) -> &Summary { &self.summary }

    /// Number of rendered regions, equal to the number of records.
    #[inline] pub fn record_count(&self) -> usize { self.regions.len() }

    #[inline] pub fn opacity(&self) -> f64 { self.opacity }

    #[inline] pub fn map_style(&self) -> &str { &self.map_style }
}

/// A single cell as JSON, keeping integers as integers.
fn cell_to_json(column: &Column, idx: usize) -> PolarsResult<Value> {
    Ok(match column.get(idx)? {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => json!(v),
        AnyValue::String(v) => json!(v),
        AnyValue::StringOwned(v) => json!(v.as_str()),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        other => json!(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::{FieldOptions, LoadOptions}, error::SelectionError};

    fn square(x: f64) -> String {
        format!("POLYGON (({x} 660000, {} 660000, {} 661000, {x} 661000, {x} 660000))", x + 1000.0, x + 1000.0)
    }

    fn dataset() -> Dataset {
        let raw = polars::df!(
            "SHEM_YISHUV_ENG" => ["Alpha", "Beta", "Gamma", "Delta"],
            "SHEM_YISHUV_HEB" => ["אלפא", "בטא", "גמא", "דלתא"],
            "pop_approx" => [Some(300i64), Some(100), None, Some(200)],
            "label" => ["x", "y", "z", "w"],
            "geometry" => [square(170_000.0), square(175_000.0), square(180_000.0), square(185_000.0)],
        ).unwrap();
        Dataset::load(raw, &LoadOptions::default()).unwrap()
    }

    fn build(dataset: &Dataset) -> Choropleth<'_> {
        let field = dataset.select_field("pop_approx", &FieldOptions::default()).unwrap();
        Choropleth::build(dataset, &field, &MapOptions::default()).unwrap()
    }

    #[test]
    fn one_region_per_record_in_order() {
        let dataset = dataset();
        let map = build(&dataset);
        assert_eq!(map.record_count(), dataset.len());
        for (i, region) in map.regions().iter().enumerate() {
            assert_eq!(region.index, i);
            assert!(std::ptr::eq(region.shape, &dataset.shapes()[i]));
        }
    }

    #[test]
    fn null_values_are_drawn_without_fill() {
        let dataset = dataset();
        let map = build(&dataset);
        let gamma = &map.regions()[2];
        assert_eq!(gamma.value, None);
        assert_eq!(gamma.fill, None);
        assert_eq!(gamma.hover.last(), Some(&("pop_approx".to_string(), Value::Null)));
    }

    #[test]
    fn colors_follow_values() {
        let dataset = dataset();
        let map = build(&dataset);
        let scale = map.scale().unwrap();
        assert_eq!((scale.min, scale.max), (100.0, 300.0));

        let position = |i: usize| map.regions()[i].position.unwrap();
        assert_eq!(position(1), 0.0);
        assert_eq!(position(3), 0.5);
        assert_eq!(position(0), 1.0);
        assert!(map.regions()[1].fill.unwrap().g < map.regions()[0].fill.unwrap().g);
    }

    #[test]
    fn hover_carries_both_names_and_value() {
        let dataset = dataset();
        let map = build(&dataset);
        let hover = &map.regions()[1].hover;
        assert_eq!(hover[0], ("SHEM_YISHUV_ENG".to_string(), json!("Beta")));
        assert_eq!(hover[1], ("SHEM_YISHUV_HEB".to_string(), json!("בטא")));
        assert_eq!(hover[2], ("pop_approx".to_string(), json!(100)));
    }

    #[test]
    fn summary_and_viewport_are_exposed() {
        let dataset = dataset();
        let map = build(&dataset);
        assert_eq!(map.summary().count, 3);
        assert_eq!(map.summary().nulls, 1);
        assert_eq!(map.viewport().zoom, 7.0);
        let bounds = dataset.total_bounds().unwrap();
        assert!((map.viewport().center.lon - bounds.center().x).abs() < 1e-12);
        assert_eq!(map.opacity(), 0.7);
        assert_eq!(map.map_style(), "carto-positron");
    }

    #[test]
    fn text_field_is_refused() {
        let dataset = dataset();
        let forged = dataset.select_field("pop_approx", &FieldOptions::default()).unwrap();
        let other = polars::df!("SHEM_YISHUV_ENG" => ["a"], "SHEM_YISHUV_HEB" => ["b"], "pop_approx" => ["text"], "geometry" => [square(0.0)]).unwrap();
        let other = Dataset::load(other, &LoadOptions::default()).unwrap();
        let err = Choropleth::build(&other, &forged, &MapOptions::default()).unwrap_err();
        assert!(matches!(err, BuildError::Selection(SelectionError::NotNumeric { .. })));
    }

    #[test]
    fn empty_dataset_is_refused() {
        let raw = polars::df!(
            "SHEM_YISHUV_ENG" => ["a"], "SHEM_YISHUV_HEB" => ["b"], "pop_approx" => [1i64], "geometry" => ["junk"],
        ).unwrap();
        let empty = Dataset::load(raw, &LoadOptions::default()).unwrap();
        let field = dataset().select_field("pop_approx", &FieldOptions::default()).unwrap();
        assert!(matches!(Choropleth::build(&empty, &field, &MapOptions::default()), Err(BuildError::Empty)));
    }
}

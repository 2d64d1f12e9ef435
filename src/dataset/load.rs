use std::{collections::BTreeMap, path::Path};

use polars::prelude::{BooleanChunked, DataFrame, DataType};
use tracing::{debug, info, warn};

use crate::{
    config::LoadOptions,
    dataset::{Dataset, LoadReport},
    error::LoadError,
    geom::{parse_geometry, Crs, DropReason, Parsed, Reprojector},
    io,
};

impl Dataset {
    /// Read a CSV file and validate it.
    pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<Self, LoadError> {
        debug!("[dataset::load] reading {}", path.display());
        Self::load(io::read_csv(path)?, options)
    }

    /// Validate CSV text held in memory.
    pub fn load_csv_str(csv: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        Self::load(io::read_csv_string(csv)?, options)
    }

    /// Validate raw rows: parse each geometry cell, keep rows that yield a shape,
    /// and reproject the survivors to WGS84 lon/lat.
    ///
    /// Bad geometry only drops its row. A missing column or unusable CRS fails
    /// the whole load. Zero surviving rows is a valid, empty dataset.
    pub fn load(raw: DataFrame, options: &LoadOptions) -> Result<Self, LoadError> {
        let column = &options.geometry_column;
        let geometry = raw.column(column)
            .map_err(|_| LoadError::MissingColumn { column: column.clone() })?;

        for required in &options.required_columns {
            if raw.get_column_index(required).is_none() {
                return Err(LoadError::MissingColumn { column: required.clone() });
            }
        }

        let source = options.source_crs().ok_or_else(|| LoadError::Crs {
            definition: format!("EPSG:{}", options.source_epsg),
            reason: "unknown EPSG code and no PROJ.4 definition given".into(),
        })?;

        let target = Crs::wgs84();
        let reprojector = Reprojector::new(&source, &target)?;
        debug!("[dataset::load] reprojecting from {source} to {target}");

        let parsed: Vec<Parsed> = match geometry.dtype() {
            DataType::String => geometry.str()?.into_iter().map(parse_geometry).collect(),
            // A column with no values at all is read back untyped.
            DataType::Null => (0..raw.height()).map(|_| parse_geometry(None)).collect(),
            other => return Err(LoadError::ColumnType { column: column.clone(), dtype: other.to_string() }),
        };

        // A shape the transform rejects only drops its own row.
        let parsed = parsed.into_iter().enumerate()
            .map(|(row, parsed)| match parsed {
                Parsed::Shape(shape) => match reprojector.project(&shape) {
                    Ok(shape) => Parsed::Shape(shape),
                    Err(reason) => {
                        debug!(row, %reason, "[dataset::load] dropping unprojectable geometry");
                        Parsed::NoGeometry(DropReason::Unprojectable)
                    }
                },
                other => other,
            })
            .collect::<Vec<_>>();

        let mut report = LoadReport { input_rows: parsed.len(), ..Default::default() };
        let mut dropped = BTreeMap::new();
        for reason in parsed.iter().filter_map(Parsed::drop_reason) {
            *dropped.entry(reason).or_insert(0) += 1;
        }
        report.dropped = dropped;

        // Rows and shapes are filtered by the same mask, in row order.
        let mask: BooleanChunked = parsed.iter().map(Parsed::is_shape).collect();
        let data = raw.filter(&mask)?.drop(column)?;
        let shapes = parsed.into_iter().filter_map(Parsed::into_shape).collect::<Vec<_>>();
        debug_assert_eq!(data.height(), shapes.len());
        report.kept_rows = shapes.len();

        info!(
            input = report.input_rows,
            kept = report.kept_rows,
            dropped = report.dropped_rows(),
            "[dataset::load] validated geometries"
        );
        if shapes.is_empty() {
            warn!("[dataset::load] no usable geometry in {} rows", report.input_rows);
        }

        Ok(Self { data, shapes, crs: target, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> LoadOptions {
        LoadOptions { required_columns: Vec::new(), ..Default::default() }
    }

    fn itm_square(x: f64, y: f64) -> String {
        format!("POLYGON (({x} {y}, {} {y}, {} {}, {x} {}, {x} {y}))", x + 1000.0, x + 1000.0, y + 1000.0, y + 1000.0)
    }

    #[test]
    fn invalid_rows_are_dropped_and_counted() {
        let good = itm_square(180_000.0, 660_000.0);
        let raw = polars::df!(
            "name" => ["a", "b", "c", "d", "e"],
            "geometry" => [Some(good.as_str()), None, Some(""), Some("POLYGON EMPTY"), Some("junk")],
        ).unwrap();

        let dataset = Dataset::load(raw, &options()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.data().height(), 1);
        assert!(dataset.data().column("geometry").is_err());

        let report = dataset.report();
        assert_eq!(report.input_rows, 5);
        assert_eq!(report.kept_rows, 1);
        assert_eq!(report.dropped_rows(), 4);
        assert_eq!(report.dropped.get(&DropReason::Missing), Some(&1));
        assert!(report.dropped.contains_key(&DropReason::Malformed));
    }

    #[test]
    fn attributes_stay_aligned_with_shapes() {
        let raw = polars::df!(
            "name" => ["west", "bad", "east"],
            "geometry" => [
                itm_square(150_000.0, 600_000.0),
                "POLYGON ((".to_string(),
                itm_square(250_000.0, 600_000.0),
            ],
        ).unwrap();

        let dataset = Dataset::load(raw, &options()).unwrap();
        let names = dataset.data().column("name").unwrap().str().unwrap()
            .into_iter().flatten().map(str::to_string).collect::<Vec<_>>();
        assert_eq!(names, ["west", "east"]);

        let x = |i: usize| dataset.shapes()[i].0[0].exterior().0[0].x;
        assert!(x(0) < x(1));
    }

    #[test]
    fn output_is_wgs84() {
        let raw = polars::df!("geometry" => [itm_square(180_000.0, 660_000.0)]).unwrap();
        let dataset = Dataset::load(raw, &options()).unwrap();
        assert_eq!(dataset.crs(), &Crs::wgs84());
        let bounds = dataset.total_bounds().unwrap();
        assert!((34.0..36.0).contains(&bounds.min().x));
        assert!((31.0..33.5).contains(&bounds.min().y));
    }

    #[test]
    fn geometry_outside_the_grid_drops_only_its_row() {
        let raw = polars::df!(
            "name" => ["inside", "far"],
            "geometry" => [
                itm_square(180_000.0, 660_000.0),
                "POLYGON ((1e300 1e300, 1e300 1e301, 1e301 1e301, 1e300 1e300))".to_string(),
            ],
        ).unwrap();

        let dataset = Dataset::load(raw, &options()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.data().height(), 1);
        assert_eq!(dataset.report().dropped.get(&DropReason::Unprojectable), Some(&1));
        let name = dataset.data().column("name").unwrap().str().unwrap().get(0).map(str::to_string);
        assert_eq!(name.as_deref(), Some("inside"));
    }

    #[test]
    fn trailing_text_after_geometry_drops_the_row() {
        let good = itm_square(180_000.0, 660_000.0);
        let raw = polars::df!("geometry" => [good.clone(), format!("{good} trailing")]).unwrap();
        let dataset = Dataset::load(raw, &options()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.report().dropped.get(&DropReason::Malformed), Some(&1));
    }

    #[test]
    fn missing_geometry_column_fails_fast() {
        let raw = polars::df!("name" => ["a"]).unwrap();
        let err = Dataset::load(raw, &options()).unwrap_err();
        assert!(matches!(&err, LoadError::MissingColumn { column } if column == "geometry"));
        assert_eq!(err.missing_resource().as_deref(), Some("geometry"));
    }

    #[test]
    fn missing_name_column_fails_when_required() {
        let raw = polars::df!(
            "SHEM_YISHUV_ENG" => ["Tel Aviv"],
            "geometry" => [itm_square(180_000.0, 660_000.0)],
        ).unwrap();
        let err = Dataset::load(raw, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column } if column == "SHEM_YISHUV_HEB"));
    }

    #[test]
    fn numeric_geometry_column_is_a_type_error() {
        let raw = polars::df!("geometry" => [1i64, 2]).unwrap();
        assert!(matches!(Dataset::load(raw, &options()).unwrap_err(), LoadError::ColumnType { .. }));
    }

    #[test]
    fn unknown_source_epsg_is_a_crs_error() {
        let raw = polars::df!("geometry" => [itm_square(0.0, 0.0)]).unwrap();
        let options = LoadOptions { source_epsg: 1, ..options() };
        assert!(matches!(Dataset::load(raw, &options).unwrap_err(), LoadError::Crs { .. }));
    }

    #[test]
    fn zero_rows_load_as_empty() {
        let raw = polars::df!("geometry" => Vec::<String>::new()).unwrap();
        let dataset = Dataset::load(raw, &options()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.total_bounds().is_none());
    }
}

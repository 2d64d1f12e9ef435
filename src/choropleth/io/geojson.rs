use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::{choropleth::Choropleth, io::geojson::multipolygon_to_geojson};

impl Choropleth<'_> {
    /// Export the map as a GeoJSON FeatureCollection.
    /// Each feature carries its hover attributes plus `_value` and `_fill`
    /// (null for records without a value). Scale, viewport and styling ride
    /// along as foreign members of the collection.
    pub fn to_geojson(&self) -> Value {
        let features = self.regions.iter()
            .map(|region| {
                let mut properties = region.hover.iter()
                    .cloned()
                    .collect::<Map<String, Value>>();
                properties.insert("_value".to_string(), json!(region.value));
                properties.insert("_fill".to_string(), json!(region.fill));

                json!({
                    "type": "Feature",
                    "id": region.index,
                    "geometry": multipolygon_to_geojson(region.shape),
                    "properties": properties,
                })
            })
            .collect::<Vec<_>>();

        json!({
            "type": "FeatureCollection",
            "features": features,
            "field": self.field.name(),
            "scale": self.scale,
            "viewport": self.viewport,
            "opacity": self.opacity,
            "map_style": self.map_style,
        })
    }

    /// Write the GeoJSON export to `path`.
    pub fn write_geojson(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("[choropleth::geojson] Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.to_geojson())
            .with_context(|| format!("[choropleth::geojson] Failed to write {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Choropleth, Dataset, FieldOptions, LoadOptions, MapOptions};

    #[test]
    fn features_mirror_regions() {
        let square = |x: f64| format!("POLYGON (({x} 660000, {} 660000, {} 661000, {x} 661000, {x} 660000))", x + 500.0, x + 500.0);
        let raw = polars::df!(
            "SHEM_YISHUV_ENG" => ["A", "B"],
            "SHEM_YISHUV_HEB" => ["א", "ב"],
            "pop_approx" => [Some(10i64), None],
            "geometry" => [square(180_000.0), square(181_000.0)],
        ).unwrap();
        let dataset = Dataset::load(raw, &LoadOptions::default()).unwrap();
        let field = dataset.select_field("pop_approx", &FieldOptions::default()).unwrap();
        let map = Choropleth::build(&dataset, &field, &MapOptions::default()).unwrap();

        let value = map.to_geojson();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["field"], "pop_approx");
        assert_eq!(value["viewport"]["zoom"], json!(7.0));

        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["id"], 0);
        assert_eq!(features[0]["properties"]["SHEM_YISHUV_HEB"], "א");
        assert_eq!(features[0]["properties"]["_fill"], json!(map.regions()[0].fill.unwrap().to_string()));
        assert_eq!(features[1]["properties"]["_fill"], json!(null));
        assert_eq!(features[1]["properties"]["pop_approx"], json!(null));
        assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
    }

    #[test]
    fn written_file_parses_back() {
        let raw = polars::df!(
            "SHEM_YISHUV_ENG" => ["A"],
            "SHEM_YISHUV_HEB" => ["א"],
            "pop_approx" => [5i64],
            "geometry" => ["POLYGON ((180000 660000, 181000 660000, 181000 661000, 180000 660000))"],
        ).unwrap();
        let dataset = Dataset::load(raw, &LoadOptions::default()).unwrap();
        let field = dataset.select_field("pop_approx", &FieldOptions::default()).unwrap();
        let map = Choropleth::build(&dataset, &field, &MapOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.geojson");
        map.write_geojson(&path).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value, map.to_geojson());
    }
}

use geo::{LineString, MultiPolygon};
use serde_json::{json, Value};

/// GeoJSON geometry object for a MultiPolygon: each polygon is
/// `[exterior, hole, hole, ...]`, each ring a list of `[x, y]`.
pub(crate) fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    }

    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};
    use serde_json::json;

    use super::*;

    #[test]
    fn holes_follow_their_exterior() {
        let mp = MultiPolygon(vec![polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 0.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 1.0)]]
        )]);
        let value = multipolygon_to_geojson(&mp);
        assert_eq!(value["type"], "MultiPolygon");
        let rings = value["coordinates"][0].as_array().unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], json!([4.0, 0.0]));
        assert_eq!(rings[1][0], json!([1.0, 1.0]));
    }
}

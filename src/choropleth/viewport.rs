use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Zoom used for a national-scale view.
pub(crate) const DEFAULT_ZOOM: f64 = 7.0;

const MAX_ZOOM: f64 = 18.0;

/// How the initial zoom level is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomPolicy {
    /// Always the same zoom, whatever the extent.
    Fixed(f64),
    /// Fit the larger side of the bounding extent.
    FitExtent,
}

impl Default for ZoomPolicy {
    fn default() -> Self { ZoomPolicy::Fixed(DEFAULT_ZOOM) }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Initial map view: center of the bounding extent plus a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: f64,
}

impl Viewport {
    /// Viewport over a lon/lat extent.
    pub fn from_bounds(bounds: &Rect<f64>, policy: ZoomPolicy) -> Self {
        let center = bounds.center();
        let zoom = match policy {
            ZoomPolicy::Fixed(zoom) => zoom,
            ZoomPolicy::FitExtent => {
                let span = bounds.width().max(bounds.height());
                if span > 0.0 { (360.0 / span).log2().clamp(0.0, MAX_ZOOM) } else { MAX_ZOOM }
            }
        };
        Self { center: LatLon { lat: center.y, lon: center.x }, zoom }
    }

    /// Viewport over a whole dataset. `None` when the dataset is empty,
    /// in which case there is no map to show.
    pub fn from_dataset(dataset: &Dataset, policy: ZoomPolicy) -> Option<Self> {
        dataset.total_bounds().map(|bounds| Self::from_bounds(&bounds, policy))
    }
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 })
    }

    #[test]
    fn center_is_extent_midpoint() {
        let viewport = Viewport::from_bounds(&rect(34.0, 29.0, 36.0, 33.0), ZoomPolicy::default());
        assert_eq!(viewport.center, LatLon { lat: 31.0, lon: 35.0 });
        assert_eq!(viewport.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn fit_extent_zooms_in_on_smaller_areas() {
        let country = Viewport::from_bounds(&rect(34.0, 29.0, 36.0, 33.0), ZoomPolicy::FitExtent);
        let city = Viewport::from_bounds(&rect(34.7, 32.0, 34.9, 32.1), ZoomPolicy::FitExtent);
        assert!(city.zoom > country.zoom);
        assert!((country.zoom - (360.0f64 / 4.0).log2()).abs() < 1e-12);
    }

    #[test]
    fn point_extent_clamps_to_max_zoom() {
        let viewport = Viewport::from_bounds(&rect(35.0, 31.0, 35.0, 31.0), ZoomPolicy::FitExtent);
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }
}

use std::fmt;

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::LoadError;

/// A named coordinate reference system backed by a PROJ.4 definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    epsg: u32,
    definition: String,
}

impl Crs {
    /// Israeli Transverse Mercator grid (ITM).
    pub const ISRAELI_TM_GRID: u32 = 2039;
    /// Unprojected WGS84 longitude/latitude.
    pub const WGS84: u32 = 4326;

    /// Look up a built-in CRS by EPSG code.
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        let definition = match epsg {
            Self::ISRAELI_TM_GRID => concat!(
                "+proj=tmerc +lat_0=31.7343936111111 +lon_0=35.2045169444444 +k=1.0000067 ",
                "+x_0=219529.584 +y_0=626907.39 +ellps=GRS80 ",
                "+towgs84=23.772,17.49,17.859,-0.3132,-1.85274,1.67299,-5.4262 ",
                "+units=m +no_defs +type=crs",
            ),
            Self::WGS84 => "+proj=longlat +datum=WGS84 +no_defs +type=crs",
            _ => return None,
        };
        Some(Self { epsg, definition: definition.to_string() })
    }

    /// Display CRS: WGS84 lon/lat in degrees.
    pub fn wgs84() -> Self {
        Self { epsg: Self::WGS84, definition: "+proj=longlat +datum=WGS84 +no_defs +type=crs".into() }
    }

    /// A CRS not in the built-in table.
    pub fn custom(epsg: u32, definition: impl Into<String>) -> Self {
        Self { epsg, definition: definition.into() }
    }

    #[inline] pub fn epsg(&self) -> u32 { self.epsg }

    #[inline] pub fn definition(&self) -> &str { &self.definition }

    /// True for lon/lat systems, whose coordinates are degrees.
    #[inline]
    pub fn is_geographic(&self) -> bool {
        self.definition.split_whitespace()
            .any(|token| token == "+proj=longlat" || token == "+proj=latlong")
    }

    fn to_proj4(&self) -> Result<Proj4, LoadError> {
        Proj4::from_proj_string(&self.definition)
            .map_err(|e| LoadError::Crs { definition: self.definition.clone(), reason: e.to_string() })
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Coordinate transform between two systems, built once and applied per shape.
pub(crate) struct Reprojector {
    // None when source and target are the same system.
    systems: Option<(Proj4, Proj4)>,
    from_degrees: bool,
    to_degrees: bool,
}

impl Reprojector {
    pub(crate) fn new(from: &Crs, to: &Crs) -> Result<Self, LoadError> {
        let systems = if from == to { None } else { Some((from.to_proj4()?, to.to_proj4()?)) };
        Ok(Self { systems, from_degrees: from.is_geographic(), to_degrees: to.is_geographic() })
    }

    fn project_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, String> {
        let Some((source, target)) = &self.systems else { return Ok(coord) };

        let mut point = if self.from_degrees {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(source, target, &mut point).map_err(|e| e.to_string())?;

        let (x, y) = if self.to_degrees { (point.0.to_degrees(), point.1.to_degrees()) } else { (point.0, point.1) };
        if !(x.is_finite() && y.is_finite()) {
            return Err(format!("non-finite result for ({}, {})", coord.x, coord.y))
        }
        Ok(Coord { x, y })
    }

    /// Transform one shape, keeping ring order and point count.
    /// Fails if any coordinate falls outside the projection's domain.
    pub(crate) fn project(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, String> {
        if self.systems.is_none() { return Ok(shape.clone()) }
        shape.try_map_coords(|coord| self.project_coord(coord))
    }
}

/// Reproject every shape from `from` to `to`, keeping ring order and point count.
/// Degrees in/out for geographic systems; proj4rs itself works in radians.
pub(crate) fn reproject_shapes(shapes: &[MultiPolygon<f64>], from: &Crs, to: &Crs) -> Result<Vec<MultiPolygon<f64>>, LoadError> {
    let reprojector = Reprojector::new(from, to)?;
    shapes.iter().enumerate()
        .map(|(row, shape)| reprojector.project(shape)
            .map_err(|reason| LoadError::Reproject { row, reason }))
        .collect()
}

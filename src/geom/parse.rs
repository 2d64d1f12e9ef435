//! WKT → polygon parsing that never fails the caller.

use std::fmt;

use geo::{CoordsIter, Geometry, LineString, MultiPolygon, Polygon};
use wkt::TryFromWkt;

/// Why a geometry value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    /// Null cell.
    Missing,
    /// Empty or whitespace-only text, or an `EMPTY` geometry.
    Empty,
    /// Text that is not valid WKT.
    Malformed,
    /// Valid WKT, but not a polygon or multipolygon.
    Unsupported,
    /// Ring too short to enclose anything, or non-finite coordinates.
    Degenerate,
    /// Parsed, but the coordinates fall outside the source projection.
    Unprojectable,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DropReason::Missing => "missing",
            DropReason::Empty => "empty",
            DropReason::Malformed => "malformed",
            DropReason::Unsupported => "unsupported",
            DropReason::Degenerate => "degenerate",
            DropReason::Unprojectable => "unprojectable",
        };
        f.write_str(name)
    }
}

/// Outcome of parsing one geometry cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Shape(MultiPolygon<f64>),
    NoGeometry(DropReason),
}

impl Parsed {
    #[inline] pub fn is_shape(&self) -> bool { matches!(self, Parsed::Shape(_)) }

    #[inline]
    pub fn into_shape(self) -> Option<MultiPolygon<f64>> {
        match self {
            Parsed::Shape(shape) => Some(shape),
            Parsed::NoGeometry(_) => None,
        }
    }

    #[inline]
    pub fn drop_reason(&self) -> Option<DropReason> {
        match self {
            Parsed::Shape(_) => None,
            Parsed::NoGeometry(reason) => Some(*reason),
        }
    }
}

/// Smallest closed ring: three distinct corners plus the closing point.
const MIN_RING_LEN: usize = 4;

/// Parse a single WKT cell into a (multi)polygon.
/// `None` is the missing marker. Polygons are normalised to MultiPolygon.
pub fn parse_geometry(text: Option<&str>) -> Parsed {
    let Some(text) = text else { return Parsed::NoGeometry(DropReason::Missing) };

    let text = text.trim();
    if text.is_empty() { return Parsed::NoGeometry(DropReason::Empty) }

    if has_residue(text) { return Parsed::NoGeometry(DropReason::Malformed) }
    let Ok(geometry) = Geometry::<f64>::try_from_wkt_str(text) else {
        return Parsed::NoGeometry(DropReason::Malformed)
    };

    let polygons = match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(MultiPolygon(polygons)) => polygons,
        _ => return Parsed::NoGeometry(DropReason::Unsupported),
    };

    // Drop EMPTY members of a multipolygon, then reject if nothing is left.
    let polygons = polygons.into_iter()
        .filter(|polygon| polygon.coords_count() > 0)
        .collect::<Vec<_>>();
    if polygons.is_empty() { return Parsed::NoGeometry(DropReason::Empty) }

    if !polygons.iter().all(is_well_formed) {
        return Parsed::NoGeometry(DropReason::Degenerate)
    }

    Parsed::Shape(MultiPolygon(polygons))
}

/// True if anything follows the geometry text.
/// The WKT reader stops at the end of the first geometry and ignores the rest.
fn has_residue(text: &str) -> bool {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return true,
            ')' => {
                depth -= 1;
                if depth == 0 { return !text[i + 1..].trim().is_empty() }
            }
            _ => {}
        }
    }
    // Unbalanced text is left for the reader to reject.
    if depth > 0 { return false }

    // No coordinates at all: only `<TYPE> [Z|M|ZM] EMPTY` is well-formed.
    !text.split_whitespace().last().is_some_and(|word| word.eq_ignore_ascii_case("EMPTY"))
}

/// Every ring is closed, long enough, and has finite coordinates.
fn is_well_formed(polygon: &Polygon<f64>) -> bool {
    fn ring_ok(ring: &LineString<f64>) -> bool {
        ring.0.len() >= MIN_RING_LEN
            && ring.is_closed()
            && ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    ring_ok(polygon.exterior()) && polygon.interiors().iter().all(ring_ok)
}

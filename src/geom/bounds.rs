use geo::{BoundingRect, Coord, MultiPolygon, Rect};

/// Bounding extent of all shapes, `None` when there is nothing to bound.
pub fn total_bounds(shapes: &[MultiPolygon<f64>]) -> Option<Rect<f64>> {
    union_bounds(shapes.iter().filter_map(|shape| shape.bounding_rect()))
}

/// Smallest rectangle covering every rectangle in `rects`.
pub(crate) fn union_bounds(rects: impl Iterator<Item = Rect<f64>>) -> Option<Rect<f64>> {
    rects.reduce(|a, b| Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        }
    ))
}

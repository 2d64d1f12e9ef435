mod bounds;
mod parse;
mod proj;

pub use bounds::total_bounds;
pub use parse::{parse_geometry, DropReason, Parsed};
pub use proj::Crs;
pub(crate) use bounds::union_bounds;
pub(crate) use proj::{reproject_shapes, Reprojector};

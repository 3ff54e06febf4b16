//! Primitive types shared by the stressmap crates: geographic points, coordinate reference
//! systems, extents, colors and a couple of geometry helpers working on `geo-types` values.

mod color;
mod crs;
pub mod extent;
pub mod geometry;
mod point;

pub use color::Color;
pub use crs::{Crs, CrsParseError};
pub use extent::Extent;
pub use point::GeoPoint;

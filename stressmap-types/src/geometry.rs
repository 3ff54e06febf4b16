//! Helpers over `geo-types` geometries: bounding extents and point hit-testing.

use geo::{BoundingRect, Intersects, Point};
use geo_types::Geometry;

use crate::{Extent, GeoPoint};

/// Bounding extent of the geometry, `None` for empty geometries.
pub fn bounding_extent(geometry: &Geometry<f64>) -> Option<Extent> {
    geometry.bounding_rect().map(Extent::from)
}

/// Whether the point touches the geometry. A point on a polygon boundary counts as a hit,
/// whichever side of the polygon it is on.
pub fn contains_point(geometry: &Geometry<f64>, point: &GeoPoint) -> bool {
    geometry.intersects(&Point::new(point.lon(), point.lat()))
}

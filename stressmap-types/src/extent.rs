//! Axis-aligned bounding rectangles and the checks deciding whether one can be used to fit a
//! map view.
//!
//! An extent is "fittable" when it has a positive span on both axes and lies entirely inside
//! the geographic range `[-180, 180] x [-90, 90]`. Anything else (missing extent, a single point,
//! non-finite values, or coordinates that are obviously still in a projected system) must not be
//! handed to the view.

use geo_types::Rect;
use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Longitude range accepted by [`is_plausible_geographic`].
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);
/// Latitude range accepted by [`is_plausible_geographic`].
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Bounding rectangle `[x_min, y_min, x_max, y_max]`.
///
/// The constructor does not reorder the coordinates, so an extent with `x_min > x_max` can be
/// created; such an extent is [empty](Extent::is_empty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Extent {
    /// Creates a new extent from its bounds.
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Minimum x (longitude).
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Minimum y (latitude).
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum x (longitude).
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Maximum y (latitude).
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Horizontal span.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical span.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Smallest extent containing both `self` and `other`.
    pub fn merge(self, other: Self) -> Self {
        Self::new(
            self.x_min.min(other.x_min),
            self.y_min.min(other.y_min),
            self.x_max.max(other.x_max),
            self.y_max.max(other.y_max),
        )
    }

    /// Whether the point lies inside the rectangle (bounds inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lon() >= self.x_min
            && point.lon() <= self.x_max
            && point.lat() >= self.y_min
            && point.lat() <= self.y_max
    }

    /// True if the extent has zero or negative span on either axis, or contains non-finite
    /// values.
    pub fn is_empty(&self) -> bool {
        // Written with `!(.. > 0)` so that NaN spans count as empty.
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// True iff the whole rectangle lies inside `[-180, 180] x [-90, 90]`.
    pub fn is_plausible_geographic(&self) -> bool {
        self.x_min >= LON_RANGE.0
            && self.x_max <= LON_RANGE.1
            && self.y_min >= LAT_RANGE.0
            && self.y_max <= LAT_RANGE.1
            && self.x_min <= LON_RANGE.1
            && self.x_max >= LON_RANGE.0
            && self.y_min <= LAT_RANGE.1
            && self.y_max >= LAT_RANGE.0
    }

    /// Whether a view can be fit to this extent.
    pub fn is_fittable(&self) -> bool {
        !self.is_empty() && self.is_plausible_geographic()
    }

    /// Bounds as `[x_min, y_min, x_max, y_max]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

impl From<[f64; 4]> for Extent {
    fn from(value: [f64; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl From<Extent> for [f64; 4] {
    fn from(value: Extent) -> Self {
        value.to_array()
    }
}

/// True if the extent is absent or has no area.
pub fn is_empty(extent: Option<&Extent>) -> bool {
    extent.map_or(true, Extent::is_empty)
}

/// True if the extent is present and lies inside the geographic range.
pub fn is_plausible_geographic(extent: Option<&Extent>) -> bool {
    extent.is_some_and(Extent::is_plausible_geographic)
}

/// `!is_empty(extent) && is_plausible_geographic(extent)`.
pub fn fittable(extent: Option<&Extent>) -> bool {
    !is_empty(extent) && is_plausible_geographic(extent)
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self::new(min.x, min.y, max.x, max.y)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use geo_types::Coord;

    use super::*;

    #[test]
    fn absent_extent_is_not_fittable() {
        assert!(is_empty(None));
        assert!(!is_plausible_geographic(None));
        assert!(!fittable(None));
    }

    #[test]
    fn zero_and_negative_spans_are_empty() {
        assert!(Extent::new(10.0, 10.0, 10.0, 20.0).is_empty());
        assert!(Extent::new(10.0, 10.0, 20.0, 10.0).is_empty());
        assert!(Extent::new(20.0, 10.0, 10.0, 20.0).is_empty());
        assert!(!Extent::new(10.0, 10.0, 20.0, 20.0).is_empty());
    }

    #[test]
    fn non_finite_extent_is_empty_and_implausible() {
        let nan = Extent::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(nan.is_empty());
        assert!(!nan.is_plausible_geographic());

        let inf = Extent::new(0.0, 0.0, f64::INFINITY, 1.0);
        assert!(!inf.is_fittable());
    }

    #[test]
    fn geographic_range_is_inclusive() {
        assert!(fittable(Some(&Extent::new(-180.0, -90.0, 180.0, 90.0))));
        assert!(fittable(Some(&Extent::new(10.0, 10.0, 20.0, 20.0))));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        for extent in [
            Extent::new(-200.0, -37.0, -199.0, -36.0),
            Extent::new(170.0, 10.0, 181.0, 20.0),
            Extent::new(10.0, -91.0, 20.0, 20.0),
            Extent::new(10.0, 10.0, 20.0, 90.5),
            // UTM zone 42N meters, what a non-reprojected tile grid looks like.
            Extent::new(330_000.0, 4_170_000.0, 331_000.0, 4_171_000.0),
        ] {
            assert!(!extent.is_plausible_geographic(), "{extent:?}");
            assert!(!fittable(Some(&extent)), "{extent:?}");
        }
    }

    #[test]
    fn from_rect_normalizes_corners() {
        let rect = Rect::new(Coord { x: 3.0, y: -1.0 }, Coord { x: -2.0, y: 4.0 });
        assert_eq!(Extent::from(rect).to_array(), [-2.0, -1.0, 3.0, 4.0]);
    }

    #[test]
    fn merge_and_center() {
        let merged = Extent::new(0.0, 0.0, 1.0, 1.0).merge(Extent::new(2.0, -1.0, 3.0, 0.5));
        assert_eq!(merged.to_array(), [0.0, -1.0, 3.0, 1.0]);
        assert_abs_diff_eq!(merged.center().lon(), 1.5);
        assert_abs_diff_eq!(merged.center().lat(), 0.0);
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Extent::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
    }
}

//! NDVI color ramp and vector feature styling.

use stressmap_types::Color;

use crate::overlay::Feature;

/// Opacity of the stroke drawn around every feature fill.
pub const STROKE_OPACITY: f32 = 0.2;
/// Width of the feature stroke in pixels.
pub const STROKE_WIDTH: f32 = 1.0;

/// Maps an NDVI value to a fill color.
///
/// Red at `0` and below, green at `1` and above, linear in between with blue fixed at `0`, so the
/// midpoint is a dark yellow `(128, 128, 0)`. Absent (and NaN) values are treated as `0`.
pub fn color_for(value: Option<f64>) -> Color {
    let value = value.filter(|v| !v.is_nan()).unwrap_or(0.0);
    if value <= 0.0 {
        Color::RED
    } else if value >= 1.0 {
        Color::GREEN
    } else {
        let r = (255.0 * (1.0 - value)).round() as u8;
        let g = (255.0 * value).round() as u8;
        Color::rgb(r, g, 0)
    }
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f32,
}

/// Style of a single polygon feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    /// Fill color.
    pub fill: Color,
    /// Outline.
    pub stroke: Stroke,
}

/// Style for the feature, computed from its current `value`.
///
/// This is called by the renderer for every feature on every frame; nothing is cached.
pub fn feature_style(feature: &Feature) -> FeatureStyle {
    FeatureStyle {
        fill: color_for(feature.value()),
        stroke: Stroke {
            color: Color::BLACK.with_opacity(STROKE_OPACITY),
            width: STROKE_WIDTH,
        },
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{point, Geometry};

    use super::*;

    #[test]
    fn ramp_end_points() {
        assert_eq!(color_for(Some(0.0)), Color::rgb(255, 0, 0));
        assert_eq!(color_for(Some(1.0)), Color::rgb(0, 255, 0));
        assert_eq!(color_for(Some(0.5)), Color::rgb(128, 128, 0));
    }

    #[test]
    fn ramp_clamps_outside_unit_interval() {
        assert_eq!(color_for(Some(-0.3)), Color::RED);
        assert_eq!(color_for(Some(7.0)), Color::GREEN);
    }

    #[test]
    fn absent_value_is_zero() {
        assert_eq!(color_for(None), color_for(Some(0.0)));
        assert_eq!(color_for(Some(f64::NAN)), color_for(Some(0.0)));
    }

    #[test]
    fn ramp_rounds_channels() {
        // 255 * 0.73 = 186.15, 255 * 0.27 = 68.85
        assert_eq!(color_for(Some(0.73)), Color::rgb(69, 186, 0));
        assert!(color_for(Some(0.73)).is_opaque());
    }

    #[test]
    fn feature_style_uses_translucent_black_stroke() {
        let feature = Feature::new(Geometry::Point(point!(x: 0.0, y: 0.0)), Some(0.25));
        let style = feature_style(&feature);
        assert_eq!(style.fill, color_for(Some(0.25)));
        assert_eq!(style.stroke.color, Color::rgba(0, 0, 0, 51));
        assert_eq!(style.stroke.width, 1.0);
    }
}

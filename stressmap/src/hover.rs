//! Hover tooltip showing the NDVI value of the feature under the pointer.

use std::fmt::{Display, Formatter};

use stressmap_types::GeoPoint;

use crate::map::{MapEngine, PointerEvent};

/// Tooltip offset from the pointer in pixels; the tooltip sits above the cursor, bottom-centered.
pub const TOOLTIP_OFFSET: [f64; 2] = [0.0, -10.0];

/// Text shown for features without a value.
pub const MISSING_VALUE_TEXT: &str = "N/A";

/// Content and position of the hover tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverLabel {
    value_text: String,
    position: GeoPoint,
}

impl HoverLabel {
    /// The value as displayed: the number, or `N/A`.
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    /// Map coordinate the tooltip is anchored to.
    pub fn position(&self) -> GeoPoint {
        self.position
    }
}

impl Display for HoverLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NDVI: {}", self.value_text)
    }
}

/// Formats a feature value for the tooltip. Absent values are `N/A`, a present `0` is `0`.
pub fn value_text(value: Option<f64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => MISSING_VALUE_TEXT.to_owned(),
    }
}

/// Tracks the pointer and keeps the tooltip in sync with the feature under it.
#[derive(Debug, Default)]
pub struct HoverProbe {
    label: Option<HoverLabel>,
}

impl HoverProbe {
    /// Creates a probe with a hidden tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluates the tooltip for a pointer movement. Returns the label if one is shown.
    pub fn on_pointer_move<M: MapEngine + ?Sized>(
        &mut self,
        map: &mut M,
        event: &PointerEvent,
    ) -> Option<&HoverLabel> {
        self.label = map.feature_at(event).map(|feature| HoverLabel {
            value_text: value_text(feature.value()),
            position: event.coordinate,
        });

        log::trace!("Pointer at {:?}: {:?}", event.pixel, self.label);
        map.set_tooltip(self.label.as_ref());
        self.label.as_ref()
    }

    /// Currently shown label.
    pub fn label(&self) -> Option<&HoverLabel> {
        self.label.as_ref()
    }

    /// Hides the tooltip and detaches it from the map.
    pub fn release<M: MapEngine + ?Sized>(&mut self, map: &mut M) {
        self.label = None;
        map.set_tooltip(None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo_types::{polygon, Geometry};

    use super::*;
    use crate::layer::{Layer, LayerPosition, VectorLayer};
    use crate::map::{HeadlessMap, MapViewState};
    use crate::overlay::Feature;

    fn map_with(features: Vec<Feature>) -> HeadlessMap {
        let mut map = HeadlessMap::new(
            400,
            400,
            MapViewState {
                center: GeoPoint::new(0.0, 0.0),
                zoom: 2.0,
            },
        );
        map.insert_layer(
            LayerPosition::Top,
            Layer::Vector(VectorLayer::new(Arc::new(features), 0.7)),
        );
        map
    }

    fn unit_square(value: Option<f64>) -> Feature {
        Feature::new(
            Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]),
            value,
        )
    }

    fn pointer(lon: f64, lat: f64) -> PointerEvent {
        PointerEvent {
            pixel: [10.0, 20.0],
            coordinate: GeoPoint::new(lon, lat),
        }
    }

    #[test]
    fn shows_value_of_hovered_feature() {
        let mut map = map_with(vec![unit_square(Some(0.73))]);
        let mut probe = HoverProbe::new();

        let label = probe.on_pointer_move(&mut map, &pointer(0.5, 0.5)).cloned().unwrap();
        assert_eq!(label.value_text(), "0.73");
        assert_eq!(label.to_string(), "NDVI: 0.73");
        assert_eq!(label.position(), GeoPoint::new(0.5, 0.5));
        assert_eq!(map.tooltip(), Some(&label));
    }

    #[test]
    fn absent_value_shows_not_available() {
        let mut map = map_with(vec![unit_square(None)]);
        let mut probe = HoverProbe::new();

        let label = probe.on_pointer_move(&mut map, &pointer(0.5, 0.5)).unwrap();
        assert_eq!(label.value_text(), "N/A");
    }

    #[test]
    fn zero_value_is_shown_as_number() {
        assert_eq!(value_text(Some(0.0)), "0");
        assert_eq!(value_text(Some(1.0)), "1");
    }

    #[test]
    fn moving_off_features_hides_the_tooltip() {
        let mut map = map_with(vec![unit_square(Some(0.2))]);
        let mut probe = HoverProbe::new();

        assert!(probe.on_pointer_move(&mut map, &pointer(0.5, 0.5)).is_some());
        assert!(probe.on_pointer_move(&mut map, &pointer(3.0, 3.0)).is_none());
        assert!(probe.label().is_none());
        assert!(map.tooltip().is_none());
    }
}

//! Fitting the view to overlay extents.

use stressmap_types::extent::fittable;
use stressmap_types::{Extent, GeoPoint};

use crate::config::ViewportConfig;
use crate::map::{FitOptions, MapEngine};

/// What [`ViewportController::apply_extent_or_fallback`] did to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewUpdate {
    /// The view was fit to this extent.
    Fitted(Extent),
    /// The fallback center and zoom were applied.
    Fallback,
}

/// Applies one rule for every overlay kind: fit to a usable extent, otherwise go to the
/// fallback center and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    fallback_center: GeoPoint,
    fallback_zoom: f64,
    fit_options: FitOptions,
}

impl ViewportController {
    /// Creates a controller from the viewport configuration.
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            fallback_center: config.fallback_center,
            fallback_zoom: config.fallback_zoom,
            fit_options: FitOptions {
                padding: [config.fit_padding; 4],
                max_zoom: config.max_fit_zoom,
            },
        }
    }

    /// Options used for every fit.
    pub fn fit_options(&self) -> FitOptions {
        self.fit_options
    }

    /// Fits the view to `extent` if it is [fittable](fittable), else applies the fallback.
    pub fn apply_extent_or_fallback<M: MapEngine + ?Sized>(
        &self,
        map: &mut M,
        extent: Option<Extent>,
    ) -> ViewUpdate {
        match extent {
            Some(extent) if fittable(Some(&extent)) => {
                map.fit_extent(extent, self.fit_options);
                log::info!("Fitted view to extent {:?}", extent.to_array());
                ViewUpdate::Fitted(extent)
            }
            other => {
                log::warn!(
                    "Extent {:?} is empty or outside the geographic range, using fallback view",
                    other.map(|e| e.to_array())
                );
                self.apply_fallback(map)
            }
        }
    }

    /// Applies the fallback center and zoom.
    pub fn apply_fallback<M: MapEngine + ?Sized>(&self, map: &mut M) -> ViewUpdate {
        map.set_center(self.fallback_center);
        map.set_zoom(self.fallback_zoom);
        ViewUpdate::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{HeadlessMap, MapViewState};

    fn map() -> HeadlessMap {
        HeadlessMap::new(
            800,
            600,
            MapViewState {
                center: GeoPoint::new(0.0, 0.0),
                zoom: 3.0,
            },
        )
    }

    #[test]
    fn fits_valid_extent_with_padding_and_zoom_cap() {
        let controller = ViewportController::new(&ViewportConfig::default());
        let mut map = map();
        let extent = Extent::new(10.0, 10.0, 20.0, 20.0);

        let update = controller.apply_extent_or_fallback(&mut map, Some(extent));
        assert_eq!(update, ViewUpdate::Fitted(extent));
        let (fitted, options) = map.last_fit().unwrap();
        assert_eq!(fitted, extent);
        assert_eq!(options.padding, [50.0; 4]);
        assert_eq!(options.max_zoom, 18.0);
    }

    #[test]
    fn falls_back_for_implausible_extent() {
        let controller = ViewportController::new(&ViewportConfig::default());
        let mut map = map();

        let update = controller
            .apply_extent_or_fallback(&mut map, Some(Extent::new(-200.0, -37.0, -199.0, -36.0)));
        assert_eq!(update, ViewUpdate::Fallback);
        assert!(map.last_fit().is_none());
        assert_eq!(map.view().center, GeoPoint::new(144.45695, -37.68685));
        assert_eq!(map.view().zoom, 18.0);
    }

    #[test]
    fn falls_back_for_missing_or_empty_extent() {
        let controller = ViewportController::new(&ViewportConfig::default());
        for extent in [None, Some(Extent::new(1.0, 1.0, 1.0, 1.0))] {
            let mut map = map();
            assert_eq!(
                controller.apply_extent_or_fallback(&mut map, extent),
                ViewUpdate::Fallback
            );
            assert_eq!(map.view().zoom, 18.0);
        }
    }
}

//! The map engine seam.
//!
//! Rendering, tile fetching and reprojection belong to a mapping engine outside this crate. The
//! lifecycle manager only talks to it through [`MapEngine`]: add and remove layers, move the
//! view, hit-test vector features and show the hover tooltip.

mod headless;

pub use headless::HeadlessMap;
use maybe_sync::MaybeSend;
use serde::{Deserialize, Serialize};
use stressmap_types::{Extent, GeoPoint};

use crate::hover::HoverLabel;
use crate::layer::{Layer, LayerId, LayerPosition};
use crate::overlay::Feature;

/// Center and zoom of the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewState {
    /// View center.
    pub center: GeoPoint,
    /// Zoom level.
    pub zoom: f64,
}

/// Options for fitting the view to an extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Padding in pixels: top, right, bottom, left.
    pub padding: [f64; 4],
    /// The fit never zooms in further than this.
    pub max_zoom: f64,
}

/// Pointer movement over the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position on the map surface in pixels.
    pub pixel: [f64; 2],
    /// Map coordinate under the pointer.
    pub coordinate: GeoPoint,
}

/// Rendering engine holding the layer stack and the view.
///
/// All methods are called from one event loop; implementations need no internal locking.
pub trait MapEngine: MaybeSend {
    /// Attaches a layer and returns its id.
    fn insert_layer(&mut self, position: LayerPosition, layer: Layer) -> LayerId;

    /// Detaches a layer. Returns `None` if it was not attached.
    fn remove_layer(&mut self, id: LayerId) -> Option<Layer>;

    /// Fits the view to the extent.
    fn fit_extent(&mut self, extent: Extent, options: FitOptions);

    /// Moves the view center.
    fn set_center(&mut self, center: GeoPoint);

    /// Sets the zoom level.
    fn set_zoom(&mut self, zoom: f64);

    /// Current view.
    fn view(&self) -> MapViewState;

    /// Topmost vector feature under the pointer. Raster and tile layers are not hit-tested.
    fn feature_at(&self, event: &PointerEvent) -> Option<Feature>;

    /// Shows the hover tooltip, or hides it when `label` is `None`.
    fn set_tooltip(&mut self, label: Option<&HoverLabel>);
}

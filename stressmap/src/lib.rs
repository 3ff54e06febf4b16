//! Layer lifecycle for an NDVI crop stress map viewer.
//!
//! The viewer shows a base map, a GeoTIFF raster overlay and a GeoJSON stress map colored by
//! the `value` property of each feature. [`LayerLifecycleManager`] owns those layers: it swaps
//! them when the user changes a selection, discards results of superseded loads and keeps the
//! view fit to whatever was loaded last, falling back to a fixed location when there is nothing
//! usable to fit to.
//!
//! Rendering is left to a [`MapEngine`] implementation. [`HeadlessMap`] keeps the layer stack and
//! the view in memory and is enough to drive the whole lifecycle without a window.

pub mod config;
pub mod error;
pub mod grayscale;
pub mod hover;
pub mod layer;
pub mod legend;
pub mod lifecycle;
pub mod loader;
pub mod map;
pub mod overlay;
pub mod style;
pub mod viewport;

pub use config::{Selection, ViewerConfig};
pub use error::{ConfigError, FetchError, OverlayError};
pub use hover::HoverLabel;
pub use lifecycle::LayerLifecycleManager;
pub use loader::ResourceLoader;
pub use map::{HeadlessMap, MapEngine, MapViewState, PointerEvent};
pub use stressmap_types::{Color, Crs, Extent, GeoPoint};

//! Overlay sources: georeferenced data that produces a renderable layer and an extent.
//!
//! There are two kinds of overlays:
//! * [`RasterOverlay`] wraps a remote grid resource whose readiness is reported by the resource
//!   itself through a stream of [`SourceState`] notifications.
//! * [`VectorOverlay`] is a set of [`Feature`]s parsed from a GeoJSON feature collection.

#[cfg(feature = "geotiff")]
pub mod geotiff;
mod raster;
mod vector;

pub use raster::{
    resolve_readiness, RasterOverlay, RasterReadiness, RasterSourceProvider, RasterState,
    SourceState, StateStream,
};
pub use vector::{Feature, VectorOverlay, VALUE_PROPERTY};

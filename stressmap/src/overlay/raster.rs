use futures::StreamExt;
use maybe_sync::{MaybeSend, MaybeSync};
use stressmap_types::{Crs, Extent};

use crate::layer::RasterLayer;

/// State reported by a raster resource.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState {
    /// Still loading.
    Loading,
    /// Loaded. `tile_grid_extent` is `None` when the resource has no tiling metadata.
    Ready {
        /// Extent of the resource tile grid.
        tile_grid_extent: Option<Extent>,
    },
    /// The resource failed to load.
    Error(String),
}

/// Stream of state changes of a single raster resource. Dropping it unsubscribes.
#[cfg(not(target_arch = "wasm32"))]
pub type StateStream = futures::stream::BoxStream<'static, SourceState>;
/// Stream of state changes of a single raster resource. Dropping it unsubscribes.
#[cfg(target_arch = "wasm32")]
pub type StateStream = futures::stream::LocalBoxStream<'static, SourceState>;

/// Opens raster resources. This is where the actual decoder (and any reprojection from the
/// source CRS) lives.
pub trait RasterSourceProvider: MaybeSend + MaybeSync {
    /// Starts loading the resource and returns its state notifications.
    ///
    /// Must not block: the returned stream is polled by the caller to drive the load.
    fn open(&self, url: &str, source_crs: Crs) -> StateStream;
}

/// Lifecycle state of a [`RasterOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterState {
    /// Waiting for the resource.
    Loading,
    /// The resource is loaded and renders.
    Ready,
    /// The resource failed.
    Error,
}

/// Terminal outcome of waiting for a raster resource.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterReadiness {
    /// Ready with an extent the view can be fit to.
    Ready(Extent),
    /// Ready, but the tiling metadata is missing or its extent is not fittable. The layer still
    /// renders, the view uses the fallback.
    Unusable(Option<Extent>),
    /// The resource failed.
    Error(String),
}

/// A georeferenced grid overlay.
///
/// Construction subscribes to the resource's state changes exactly once. The subscription is
/// handed out with [`RasterOverlay::take_state_changes`] so it can be awaited without holding
/// the overlay; dropping either the overlay or the taken stream ends the subscription.
pub struct RasterOverlay {
    url: String,
    source_crs: Crs,
    opacity: f32,
    state: RasterState,
    state_changes: Option<StateStream>,
}

impl RasterOverlay {
    /// Opens the resource through `provider`. Returns immediately in [`RasterState::Loading`].
    pub fn open(
        provider: &dyn RasterSourceProvider,
        url: &str,
        source_crs: Crs,
        opacity: f32,
    ) -> Self {
        log::debug!("Opening raster {url} in {source_crs}");
        Self {
            url: url.to_owned(),
            source_crs,
            opacity,
            state: RasterState::Loading,
            state_changes: Some(provider.open(url, source_crs)),
        }
    }

    /// Resource location.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// CRS the resource data is in.
    pub fn source_crs(&self) -> Crs {
        self.source_crs
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RasterState {
        self.state
    }

    /// Records the outcome of [`resolve_readiness`].
    pub fn set_readiness(&mut self, readiness: &RasterReadiness) {
        self.state = match readiness {
            RasterReadiness::Ready(_) | RasterReadiness::Unusable(_) => RasterState::Ready,
            RasterReadiness::Error(_) => RasterState::Error,
        };
    }

    /// Takes the state change subscription. Returns `None` if it was already taken.
    pub fn take_state_changes(&mut self) -> Option<StateStream> {
        self.state_changes.take()
    }

    /// Layer rendering the resource. Opacity is the same in every state.
    pub fn layer(&self) -> RasterLayer {
        RasterLayer {
            url: self.url.clone(),
            source_crs: self.source_crs,
            opacity: self.opacity,
        }
    }
}

impl std::fmt::Debug for RasterOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterOverlay")
            .field("url", &self.url)
            .field("source_crs", &self.source_crs)
            .field("opacity", &self.opacity)
            .field("state", &self.state)
            .field("subscribed", &self.state_changes.is_some())
            .finish()
    }
}

/// Waits for the first terminal state of the resource.
///
/// `Loading` notifications are skipped. A stream that ends without a terminal state is an error.
pub async fn resolve_readiness(mut state_changes: StateStream) -> RasterReadiness {
    while let Some(state) = state_changes.next().await {
        match state {
            SourceState::Loading => log::trace!("Raster source still loading"),
            SourceState::Ready { tile_grid_extent } => {
                return match tile_grid_extent {
                    Some(extent) if extent.is_fittable() => RasterReadiness::Ready(extent),
                    other => RasterReadiness::Unusable(other),
                }
            }
            SourceState::Error(reason) => return RasterReadiness::Error(reason),
        }
    }

    RasterReadiness::Error("source closed before reporting a state".into())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use futures::stream;

    use super::*;

    fn states(states: Vec<SourceState>) -> StateStream {
        stream::iter(states).boxed()
    }

    #[test]
    fn ready_with_geographic_extent() {
        let readiness = block_on(resolve_readiness(states(vec![
            SourceState::Loading,
            SourceState::Ready {
                tile_grid_extent: Some(Extent::new(144.0, -38.0, 145.0, -37.0)),
            },
        ])));
        assert_eq!(
            readiness,
            RasterReadiness::Ready(Extent::new(144.0, -38.0, 145.0, -37.0))
        );
    }

    #[test]
    fn out_of_range_extent_is_unusable() {
        let extent = Extent::new(-200.0, -37.0, -199.0, -36.0);
        let readiness = block_on(resolve_readiness(states(vec![SourceState::Ready {
            tile_grid_extent: Some(extent),
        }])));
        assert_eq!(readiness, RasterReadiness::Unusable(Some(extent)));
    }

    #[test]
    fn missing_tile_grid_is_unusable() {
        let readiness = block_on(resolve_readiness(states(vec![SourceState::Ready {
            tile_grid_extent: None,
        }])));
        assert_eq!(readiness, RasterReadiness::Unusable(None));
    }

    #[test]
    fn error_and_closed_streams_are_errors() {
        let readiness = block_on(resolve_readiness(states(vec![SourceState::Error(
            "404".into(),
        )])));
        assert_eq!(readiness, RasterReadiness::Error("404".into()));

        let readiness = block_on(resolve_readiness(states(vec![SourceState::Loading])));
        assert!(matches!(readiness, RasterReadiness::Error(_)));
    }

    #[test]
    fn readiness_sets_overlay_state() {
        struct Pending;
        impl RasterSourceProvider for Pending {
            fn open(&self, _url: &str, _source_crs: Crs) -> StateStream {
                stream::pending().boxed()
            }
        }

        let mut overlay = RasterOverlay::open(&Pending, "./assets/sample.tif", Crs::Epsg(32642), 0.5);
        assert_eq!(overlay.state(), RasterState::Loading);
        assert!(overlay.take_state_changes().is_some());
        assert!(overlay.take_state_changes().is_none());

        overlay.set_readiness(&RasterReadiness::Unusable(None));
        assert_eq!(overlay.state(), RasterState::Ready);
        overlay.set_readiness(&RasterReadiness::Error("boom".into()));
        assert_eq!(overlay.state(), RasterState::Error);
    }
}

//! Ownership of the layers shown on the map and the rules for swapping them.
//!
//! The manager owns three singleton slots: `base`, `raster` and `vector`. Every change to a slot
//! first detaches whatever occupies it. Overlays are constructed asynchronously; the futures
//! returned by [`LayerLifecycleManager::set_stress`] and [`LayerLifecycleManager::load_raster`]
//! must be driven by the caller (awaited or spawned on the UI executor).
//!
//! Each slot carries a request token. A new request bumps it, and a completing construction only
//! touches the map if its token is still the latest one. The last *selected* resource therefore
//! wins, whatever order the fetches resolve in.

use std::future::Future;
use std::sync::Arc;

use futures::future::join;
use parking_lot::Mutex;
use stressmap_types::{Crs, Extent};

use crate::config::{Selection, ViewerConfig};
use crate::error::{ConfigError, OverlayError};
use crate::hover::{HoverLabel, HoverProbe};
use crate::layer::{Layer, LayerId, LayerPosition};
use crate::loader::ResourceLoader;
use crate::map::{MapEngine, PointerEvent};
use crate::overlay::{
    resolve_readiness, RasterOverlay, RasterReadiness, RasterSourceProvider, RasterState,
    VectorOverlay,
};
use crate::viewport::ViewportController;

/// Identifies one construction request for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// An overlay together with the id of its layer on the map.
#[derive(Debug)]
struct Attached<T> {
    layer_id: LayerId,
    overlay: T,
}

#[derive(Debug)]
struct Slot<T> {
    active: Option<Attached<T>>,
    latest: RequestToken,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            active: None,
            latest: RequestToken(0),
        }
    }
}

impl<T> Slot<T> {
    fn next_token(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    fn is_current(&self, token: RequestToken) -> bool {
        self.latest == token
    }

    fn detach<M: MapEngine + ?Sized>(&mut self, map: &mut M) -> Option<T> {
        let attached = self.active.take()?;
        map.remove_layer(attached.layer_id);
        Some(attached.overlay)
    }
}

struct MapState<M> {
    map: Option<M>,
    base: Slot<String>,
    raster: Slot<RasterOverlay>,
    vector: Slot<VectorOverlay>,
    hover: HoverProbe,
}

/// Owns the map's base layer, raster overlay and vector overlay.
///
/// The manager is a cheap handle: clones share the same state, which is what the construction
/// futures hold on to.
pub struct LayerLifecycleManager<M> {
    state: Arc<Mutex<MapState<M>>>,
    config: Arc<ViewerConfig>,
    loader: Arc<dyn ResourceLoader>,
    raster_sources: Arc<dyn RasterSourceProvider>,
    viewport: ViewportController,
}

impl<M> Clone for LayerLifecycleManager<M> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            config: self.config.clone(),
            loader: self.loader.clone(),
            raster_sources: self.raster_sources.clone(),
            viewport: self.viewport,
        }
    }
}

impl<M: MapEngine + 'static> LayerLifecycleManager<M> {
    /// Takes over `map`. The view is reset to the configured initial center and zoom; no layers
    /// are attached until [`initialize`](Self::initialize) or a selection change.
    pub fn new(
        mut map: M,
        config: ViewerConfig,
        loader: Arc<dyn ResourceLoader>,
        raster_sources: Arc<dyn RasterSourceProvider>,
    ) -> Self {
        map.set_center(config.viewport.initial_center);
        map.set_zoom(config.viewport.initial_zoom);

        Self {
            state: Arc::new(Mutex::new(MapState {
                map: Some(map),
                base: Slot::default(),
                raster: Slot::default(),
                vector: Slot::default(),
                hover: HoverProbe::new(),
            })),
            viewport: ViewportController::new(&config.viewport),
            config: Arc::new(config),
            loader,
            raster_sources,
        }
    }

    /// Viewer configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Attaches the default base map and starts loading the default raster and stress map.
    ///
    /// The two overlays load independently and each fits the view when it resolves, so the one
    /// resolving last decides the final view.
    pub fn initialize(&self) -> Result<impl Future<Output = ()> + 'static, ConfigError> {
        log::info!("Initializing map layers");
        self.set_base(&self.config.default_base_map)?;

        let raster = self.load_raster(&self.config.raster.url, self.config.raster.source_crs);
        let vector = self.set_stress(&self.config.default_stress_map)?;

        Ok(async move {
            join(raster, vector).await;
        })
    }

    /// Switches the base map.
    ///
    /// The new base goes below every overlay. Afterwards the view is fit to the current stress
    /// map extent if there is one, else the fallback view is applied. The raster overlay is left
    /// alone.
    pub fn set_base(&self, selection: &Selection) -> Result<(), ConfigError> {
        let base = match selection {
            Selection::None => None,
            Selection::Named(name) => Some(self.config.base_map(name).ok_or_else(|| {
                ConfigError::UnknownSelection {
                    kind: "base map",
                    name: name.clone(),
                }
            })?),
        };

        let mut guard = self.state.lock();
        let MapState {
            map, base: slot, vector, ..
        } = &mut *guard;
        let Some(map) = map.as_mut() else {
            log::warn!("Base map change to '{selection}' after teardown ignored");
            return Ok(());
        };

        slot.next_token();
        if let Some(previous) = slot.detach(map) {
            log::info!("Detached base map '{previous}'");
        }

        if let Some(base) = base {
            let layer_id = map.insert_layer(LayerPosition::Bottom, Layer::Tile(base.layer()));
            slot.active = Some(Attached {
                layer_id,
                overlay: base.name.clone(),
            });
            log::info!("Attached base map '{}' as {layer_id}", base.name);
        }

        let extent = vector.active.as_ref().map(|attached| attached.overlay.extent());
        match extent {
            Some(extent) => self.viewport.apply_extent_or_fallback(map, extent),
            None => self.viewport.apply_fallback(map),
        };

        Ok(())
    }

    /// Switches the stress map.
    ///
    /// The current stress map is detached immediately. For [`Selection::None`] the fallback view
    /// is applied and the returned future does nothing. Otherwise the returned future fetches the
    /// new feature collection, attaches it and fits the view, unless another stress map was
    /// selected in the meantime.
    pub fn set_stress(
        &self,
        selection: &Selection,
    ) -> Result<impl Future<Output = ()> + 'static, ConfigError> {
        let url = match selection {
            Selection::None => None,
            Selection::Named(name) => Some(
                self.config
                    .stress_map(name)
                    .ok_or_else(|| ConfigError::UnknownSelection {
                        kind: "stress map",
                        name: name.clone(),
                    })?
                    .url
                    .clone(),
            ),
        };

        let request = {
            let mut guard = self.state.lock();
            let MapState { map, vector, .. } = &mut *guard;
            let token = vector.next_token();

            match map.as_mut() {
                Some(map) => {
                    if let Some(previous) = vector.detach(map) {
                        log::info!("Detached stress map {}", previous.url());
                    }
                    if url.is_none() {
                        self.viewport.apply_fallback(map);
                    }
                    url.map(|url| (token, url))
                }
                None => {
                    log::warn!("Stress map change to '{selection}' after teardown ignored");
                    None
                }
            }
        };

        let this = self.clone();
        Ok(async move {
            if let Some((token, url)) = request {
                this.construct_vector(token, url).await;
            }
        })
    }

    async fn construct_vector(self, token: RequestToken, url: String) {
        let result = VectorOverlay::load(self.loader.as_ref(), &url).await;

        let mut guard = self.state.lock();
        let MapState { map, vector, .. } = &mut *guard;
        if !vector.is_current(token) {
            log::debug!("Discarding stress map {url}: a newer selection was made");
            return;
        }
        let Some(map) = map.as_mut() else {
            return;
        };

        match result {
            Ok(overlay) => {
                vector.detach(map);
                let layer_id = map.insert_layer(
                    LayerPosition::Top,
                    Layer::Vector(overlay.layer(self.config.vector_opacity)),
                );
                log::info!(
                    "Attached stress map {url} as {layer_id} ({} features)",
                    overlay.features().len()
                );

                let extent = overlay.extent();
                vector.active = Some(Attached { layer_id, overlay });
                self.viewport.apply_extent_or_fallback(map, extent);
            }
            Err(err) => {
                log::error!("Error loading stress map: {err}");
                self.viewport.apply_fallback(map);
            }
        }
    }

    /// Replaces the raster overlay.
    ///
    /// The new raster layer is attached right away and renders while loading. The returned
    /// future waits for the resource: when ready the view is fit to its extent (or falls back if
    /// the extent is unusable); on error the layer is detached again and the view falls back.
    pub fn load_raster(&self, url: &str, source_crs: Crs) -> impl Future<Output = ()> + 'static {
        let request = {
            let mut guard = self.state.lock();
            let MapState { map, raster, .. } = &mut *guard;
            let token = raster.next_token();

            match map.as_mut() {
                Some(map) => {
                    if let Some(previous) = raster.detach(map) {
                        log::info!("Detached raster {}", previous.url());
                    }

                    let mut overlay = RasterOverlay::open(
                        self.raster_sources.as_ref(),
                        url,
                        source_crs,
                        self.config.raster.opacity,
                    );
                    let state_changes = overlay.take_state_changes();
                    let layer_id = map.insert_layer(LayerPosition::Top, Layer::Raster(overlay.layer()));
                    log::info!("Attached raster {url} as {layer_id}, waiting for source");
                    raster.active = Some(Attached { layer_id, overlay });

                    state_changes.map(|changes| (token, changes))
                }
                None => {
                    log::warn!("Raster load of {url} after teardown ignored");
                    None
                }
            }
        };

        let this = self.clone();
        async move {
            if let Some((token, state_changes)) = request {
                let readiness = resolve_readiness(state_changes).await;
                this.finish_raster(token, readiness);
            }
        }
    }

    fn finish_raster(&self, token: RequestToken, readiness: RasterReadiness) {
        let mut guard = self.state.lock();
        let MapState { map, raster, .. } = &mut *guard;
        if !raster.is_current(token) {
            log::debug!("Discarding raster readiness {readiness:?}: raster was replaced");
            return;
        }
        let (Some(map), Some(attached)) = (map.as_mut(), raster.active.as_mut()) else {
            return;
        };

        attached.overlay.set_readiness(&readiness);
        let url = attached.overlay.url().to_owned();
        match readiness {
            RasterReadiness::Ready(extent) => {
                log::info!("Raster {url} ready");
                self.viewport.apply_extent_or_fallback(map, Some(extent));
            }
            RasterReadiness::Unusable(extent) => {
                log::warn!("Raster {url}: {}", OverlayError::ExtentUnusable { extent });
                self.viewport.apply_fallback(map);
            }
            RasterReadiness::Error(reason) => {
                log::error!("{}", OverlayError::SourceState { url, reason });
                raster.detach(map);
                self.viewport.apply_fallback(map);
            }
        }
    }

    /// Updates the hover tooltip for a pointer movement. Returns the label if one is shown.
    pub fn pointer_moved(&self, event: &PointerEvent) -> Option<HoverLabel> {
        let mut guard = self.state.lock();
        let MapState { map, hover, .. } = &mut *guard;
        let map = map.as_mut()?;
        hover.on_pointer_move(map, event).cloned()
    }

    /// Name of the attached base map.
    pub fn active_base(&self) -> Option<String> {
        let state = self.state.lock();
        state.base.active.as_ref().map(|attached| attached.overlay.clone())
    }

    /// URL of the attached stress map.
    pub fn active_stress_url(&self) -> Option<String> {
        let state = self.state.lock();
        state
            .vector
            .active
            .as_ref()
            .map(|attached| attached.overlay.url().to_owned())
    }

    /// Extent of the attached stress map.
    pub fn stress_extent(&self) -> Option<Extent> {
        let state = self.state.lock();
        state
            .vector
            .active
            .as_ref()
            .and_then(|attached| attached.overlay.extent())
    }

    /// State of the attached raster overlay, `None` if the raster slot is empty.
    pub fn raster_state(&self) -> Option<RasterState> {
        let state = self.state.lock();
        state
            .raster
            .active
            .as_ref()
            .map(|attached| attached.overlay.state())
    }

    /// Runs `f` with the map. Returns `None` after teardown.
    pub fn with_map<R>(&self, f: impl FnOnce(&M) -> R) -> Option<R> {
        let state = self.state.lock();
        state.map.as_ref().map(f)
    }

    /// Detaches every layer, drops all overlays and their subscriptions, hides the tooltip and
    /// hands the map back.
    ///
    /// Constructions still in flight are invalidated and will not touch the map. Returns `None`
    /// if the map was already handed back through another handle.
    pub fn teardown(self) -> Option<M> {
        let mut guard = self.state.lock();
        let MapState {
            map,
            base,
            raster,
            vector,
            hover,
        } = &mut *guard;
        let mut map = map.take()?;

        base.next_token();
        raster.next_token();
        vector.next_token();
        base.detach(&mut map);
        raster.detach(&mut map);
        vector.detach(&mut map);
        hover.release(&mut map);

        log::info!("Map layers released");
        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_per_slot() {
        let mut slot: Slot<()> = Slot::default();
        let first = slot.next_token();
        let second = slot.next_token();
        assert!(second > first);
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }
}

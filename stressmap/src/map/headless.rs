use stressmap_types::geometry::contains_point;
use stressmap_types::{Extent, GeoPoint};

use super::{FitOptions, MapEngine, MapViewState, PointerEvent};
use crate::hover::HoverLabel;
use crate::layer::{Layer, LayerId, LayerPosition};
use crate::overlay::Feature;

const TILE_SIZE: f64 = 256.0;
/// Degrees per pixel at zoom 0 in an `EPSG:4326` view.
const TOP_RESOLUTION: f64 = 360.0 / TILE_SIZE;

/// Map engine keeping the layer stack and view in memory without rendering anything.
///
/// Useful for running the viewer logic in tests and tools. View fitting follows the usual
/// `EPSG:4326` zoom pyramid with 256 px tiles.
#[derive(Debug)]
pub struct HeadlessMap {
    size: [f64; 2],
    view: MapViewState,
    layers: Vec<(LayerId, Layer)>,
    next_id: u64,
    tooltip: Option<HoverLabel>,
    last_fit: Option<(Extent, FitOptions)>,
}

impl HeadlessMap {
    /// Creates an empty map of the given size in pixels.
    pub fn new(width: u32, height: u32, view: MapViewState) -> Self {
        Self {
            size: [width as f64, height as f64],
            view,
            layers: Vec::new(),
            next_id: 0,
            tooltip: None,
            last_fit: None,
        }
    }

    /// Attached layers from bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer))
    }

    /// Number of attached layers of the given kind (see [`Layer::kind`]).
    pub fn count_layers(&self, kind: &str) -> usize {
        self.layers
            .iter()
            .filter(|(_, layer)| layer.kind() == kind)
            .count()
    }

    /// Currently shown tooltip.
    pub fn tooltip(&self) -> Option<&HoverLabel> {
        self.tooltip.as_ref()
    }

    /// Extent and options of the last [`fit_extent`](MapEngine::fit_extent) call, cleared by
    /// any later explicit center or zoom change.
    pub fn last_fit(&self) -> Option<(Extent, FitOptions)> {
        self.last_fit
    }

    fn zoom_for(&self, extent: &Extent, options: &FitOptions) -> f64 {
        let [top, right, bottom, left] = options.padding;
        let width = (self.size[0] - left - right).max(1.0);
        let height = (self.size[1] - top - bottom).max(1.0);
        let resolution = (extent.width() / width).max(extent.height() / height);
        if resolution > 0.0 {
            (TOP_RESOLUTION / resolution).log2().clamp(0.0, options.max_zoom)
        } else {
            options.max_zoom
        }
    }
}

impl MapEngine for HeadlessMap {
    fn insert_layer(&mut self, position: LayerPosition, layer: Layer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        log::trace!("Inserting {} {id} at {position:?}", layer.kind());
        match position {
            LayerPosition::Bottom => self.layers.insert(0, (id, layer)),
            LayerPosition::Top => self.layers.push((id, layer)),
        }

        id
    }

    fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|(layer_id, _)| *layer_id == id)?;
        Some(self.layers.remove(index).1)
    }

    fn fit_extent(&mut self, extent: Extent, options: FitOptions) {
        self.view = MapViewState {
            center: extent.center(),
            zoom: self.zoom_for(&extent, &options),
        };
        self.last_fit = Some((extent, options));
    }

    fn set_center(&mut self, center: GeoPoint) {
        self.view.center = center;
        self.last_fit = None;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.view.zoom = zoom;
        self.last_fit = None;
    }

    fn view(&self) -> MapViewState {
        self.view
    }

    fn feature_at(&self, event: &PointerEvent) -> Option<Feature> {
        self.layers.iter().rev().find_map(|(_, layer)| match layer {
            Layer::Vector(vector) => vector
                .features()
                .iter()
                .rev()
                .find(|feature| contains_point(feature.geometry(), &event.coordinate))
                .cloned(),
            Layer::Tile(_) | Layer::Raster(_) => None,
        })
    }

    fn set_tooltip(&mut self, label: Option<&HoverLabel>) {
        self.tooltip = label.cloned();
    }
}

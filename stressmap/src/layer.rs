//! Layer descriptions handed to the [`MapEngine`](crate::map::MapEngine).

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stressmap_types::Crs;

use crate::overlay::Feature;
use crate::style::{feature_style, FeatureStyle};

/// Identifier of a layer attached to a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl Display for LayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Index of a tile in an XYZ tile service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Zoom level.
    pub z: u32,
}

impl TileIndex {
    /// Creates a new index.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// URL template of an XYZ tile service with `{x}`, `{y}` and `{z}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Wraps a template string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// The raw template.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL of the given tile.
    pub fn tile_url(&self, index: TileIndex) -> String {
        self.0
            .replace("{x}", &index.x.to_string())
            .replace("{y}", &index.y.to_string())
            .replace("{z}", &index.z.to_string())
    }
}

/// Base map served as XYZ image tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Name shown in the base map selector.
    pub name: String,
    /// Tile URL template.
    pub url_template: UrlTemplate,
    /// Highest zoom level the service provides.
    pub max_zoom: u32,
    /// Number of lower zoom levels to preload.
    pub preload: u32,
}

/// Georeferenced grid rendered translucently on top of the base map.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    /// Resource location.
    pub url: String,
    /// CRS of the resource; the engine reprojects it into the display projection.
    pub source_crs: Crs,
    /// Layer opacity.
    pub opacity: f32,
}

/// Vector features styled by their NDVI value.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    features: Arc<Vec<Feature>>,
    opacity: f32,
}

impl VectorLayer {
    /// Creates a layer over shared features.
    pub fn new(features: Arc<Vec<Feature>>, opacity: f32) -> Self {
        Self { features, opacity }
    }

    /// Features in drawing order (last is on top).
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Layer opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Style of a feature at render time.
    pub fn style(&self, feature: &Feature) -> FeatureStyle {
        feature_style(feature)
    }
}

/// Anything that can be attached to a map.
#[derive(Debug, Clone)]
pub enum Layer {
    /// Base map tiles.
    Tile(TileLayer),
    /// Raster overlay.
    Raster(RasterLayer),
    /// Vector overlay.
    Vector(VectorLayer),
}

impl Layer {
    /// Short name of the layer kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Tile(_) => "tile",
            Layer::Raster(_) => "raster",
            Layer::Vector(_) => "vector",
        }
    }
}

/// Where a new layer goes in the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerPosition {
    /// Below every other layer.
    Bottom,
    /// Above every other layer.
    Top,
}

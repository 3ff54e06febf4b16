//! Viewer configuration.
//!
//! [`ViewerConfig::default`] describes the stock viewer: a Google satellite base map, two stress
//! maps served from `/assets` and a sample GeoTIFF in UTM zone 42N.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stressmap_types::{Crs, GeoPoint};

use crate::error::ConfigError;
use crate::layer::{TileLayer, UrlTemplate};

/// Label of the selector entry that disables a layer.
pub const NONE_SELECTION: &str = "None";

/// Value of a base map or stress map selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    /// The explicit "None" entry.
    None,
    /// A configured entry, by name.
    Named(String),
}

impl Selection {
    /// Selection of the named entry.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == NONE_SELECTION {
            Selection::None
        } else {
            Selection::Named(s.to_owned())
        })
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::None => f.write_str(NONE_SELECTION),
            Selection::Named(name) => f.write_str(name),
        }
    }
}

/// A selectable base map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMapConfig {
    /// Name in the selector.
    pub name: String,
    /// XYZ tile URL template.
    pub url_template: UrlTemplate,
    /// Highest zoom level served.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u32,
    /// Lower zoom levels to preload.
    #[serde(default = "default_preload")]
    pub preload: u32,
}

fn default_max_zoom() -> u32 {
    23
}

fn default_preload() -> u32 {
    1
}

impl BaseMapConfig {
    /// Tile layer for this base map.
    pub fn layer(&self) -> TileLayer {
        TileLayer {
            name: self.name.clone(),
            url_template: self.url_template.clone(),
            max_zoom: self.max_zoom,
            preload: self.preload,
        }
    }
}

/// A selectable stress map (GeoJSON feature collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressMapConfig {
    /// Name in the selector.
    pub name: String,
    /// Location of the feature collection.
    pub url: String,
}

/// The raster overlay loaded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Location of the GeoTIFF.
    pub url: String,
    /// CRS the GeoTIFF is in.
    pub source_crs: Crs,
    /// Layer opacity.
    pub opacity: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            url: "./assets/sample.tif".into(),
            source_crs: Crs::Epsg(32642),
            opacity: 0.5,
        }
    }
}

/// View defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Center used whenever there is no usable extent.
    pub fallback_center: GeoPoint,
    /// Zoom used whenever there is no usable extent.
    pub fallback_zoom: f64,
    /// Padding in pixels on every side when fitting an extent.
    pub fit_padding: f64,
    /// Fits never zoom in past this level.
    pub max_fit_zoom: f64,
    /// View center before anything is loaded.
    pub initial_center: GeoPoint,
    /// View zoom before anything is loaded.
    pub initial_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fallback_center: GeoPoint::new(144.45695, -37.68685),
            fallback_zoom: 18.0,
            fit_padding: 50.0,
            max_fit_zoom: 18.0,
            initial_center: GeoPoint::new(0.0, 0.0),
            initial_zoom: 18.0,
        }
    }
}

/// Complete viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base maps in selector order. "None" is always offered after them.
    pub base_maps: Vec<BaseMapConfig>,
    /// Base map shown at startup.
    pub default_base_map: Selection,
    /// Stress maps in selector order. "None" is always offered before them.
    pub stress_maps: Vec<StressMapConfig>,
    /// Stress map loaded at startup.
    pub default_stress_map: Selection,
    /// Raster overlay loaded at startup.
    pub raster: RasterConfig,
    /// View defaults.
    pub viewport: ViewportConfig,
    /// Opacity of the stress map layer.
    pub vector_opacity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_maps: vec![BaseMapConfig {
                name: "Google Satellite".into(),
                url_template: UrlTemplate::new(
                    "http://mt0.google.com/vt/lyrs=s&hl=en&x={x}&y={y}&z={z}",
                ),
                max_zoom: default_max_zoom(),
                preload: default_preload(),
            }],
            default_base_map: Selection::named("Google Satellite"),
            stress_maps: vec![
                StressMapConfig {
                    name: "Stress Map 1".into(),
                    url: "/assets/stress_sample.json".into(),
                },
                StressMapConfig {
                    name: "Stress Map 2".into(),
                    url: "/assets/stress_sample_2.json".into(),
                },
            ],
            default_stress_map: Selection::named("Stress Map 1"),
            raster: RasterConfig::default(),
            viewport: ViewportConfig::default(),
            vector_opacity: 0.7,
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON configuration. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Replaces the stress map list.
    pub fn with_stress_maps(mut self, stress_maps: Vec<StressMapConfig>) -> Self {
        self.stress_maps = stress_maps;
        self
    }

    /// Sets the stress map loaded at startup.
    pub fn with_default_stress_map(mut self, selection: Selection) -> Self {
        self.default_stress_map = selection;
        self
    }

    /// Replaces the raster overlay.
    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    /// Replaces the view defaults.
    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }

    /// Configured base map by name.
    pub fn base_map(&self, name: &str) -> Option<&BaseMapConfig> {
        self.base_maps.iter().find(|base| base.name == name)
    }

    /// Configured stress map by name.
    pub fn stress_map(&self, name: &str) -> Option<&StressMapConfig> {
        self.stress_maps.iter().find(|stress| stress.name == name)
    }

    /// Entries of the `Base Map` selector.
    pub fn base_map_options(&self) -> Vec<Selection> {
        self.base_maps
            .iter()
            .map(|base| Selection::named(&base.name))
            .chain([Selection::None])
            .collect()
    }

    /// Entries of the `Stress Map` selector.
    pub fn stress_map_options(&self) -> Vec<Selection> {
        [Selection::None]
            .into_iter()
            .chain(
                self.stress_maps
                    .iter()
                    .map(|stress| Selection::named(&stress.name)),
            )
            .collect()
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.parse::<Selection>() {
            Ok(selection) => Ok(selection),
            Err(never) => match never {},
        }
    }
}

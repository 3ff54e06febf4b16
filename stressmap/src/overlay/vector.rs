use std::sync::Arc;

use geo_types::Geometry;
use geojson::GeoJson;
use stressmap_types::geometry::bounding_extent;
use stressmap_types::Extent;

use crate::error::OverlayError;
use crate::layer::VectorLayer;
use crate::loader::ResourceLoader;

/// Name of the feature property holding the NDVI value.
pub const VALUE_PROPERTY: &str = "value";

/// A vector feature with its NDVI value.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geometry<f64>,
    value: Option<f64>,
}

impl Feature {
    /// Creates a new feature.
    pub fn new(geometry: Geometry<f64>, value: Option<f64>) -> Self {
        Self { geometry, value }
    }

    /// Feature geometry in geographic coordinates.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// NDVI value, `None` if the feature has no numeric `value` property.
    ///
    /// Styling treats `None` as `0`, the hover label shows it as `N/A`.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Bounding extent of the geometry.
    pub fn extent(&self) -> Option<Extent> {
        bounding_extent(&self.geometry)
    }
}

/// A loaded feature collection.
#[derive(Debug, Clone)]
pub struct VectorOverlay {
    url: String,
    features: Arc<Vec<Feature>>,
    extent: Option<Extent>,
}

impl VectorOverlay {
    /// Fetches and parses the feature collection at `url`.
    ///
    /// Fetch failures, malformed JSON and geometries the decoder rejects all come back as an
    /// error; this never panics.
    pub async fn load(loader: &dyn ResourceLoader, url: &str) -> Result<Self, OverlayError> {
        log::debug!("Loading feature collection from {url}");
        let bytes = loader
            .load_bytes(url)
            .await
            .map_err(|source| OverlayError::ResourceFetch {
                url: url.to_owned(),
                source,
            })?;

        let text = std::str::from_utf8(&bytes).map_err(|err| OverlayError::Parse {
            url: url.to_owned(),
            reason: err.to_string(),
        })?;

        Self::from_geojson_str(url, text)
    }

    /// Parses a GeoJSON feature collection in `EPSG:4326`.
    ///
    /// A bare `Feature` or `Geometry` document is accepted too and treated as a collection of one.
    pub fn from_geojson_str(url: &str, json: &str) -> Result<Self, OverlayError> {
        let parse_error = |reason: String| OverlayError::Parse {
            url: url.to_owned(),
            reason,
        };

        let geojson: GeoJson = json
            .parse()
            .map_err(|err: geojson::Error| parse_error(err.to_string()))?;
        let documents = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![geojson::Feature::from(geometry)],
        };

        let mut features = Vec::with_capacity(documents.len());
        for feature in documents {
            let value = feature
                .property(VALUE_PROPERTY)
                .and_then(serde_json::Value::as_f64);

            let Some(geometry) = feature.geometry else {
                log::debug!("Skipping feature without geometry in {url}");
                continue;
            };

            let geometry = Geometry::<f64>::try_from(geometry.value)
                .map_err(|err: geojson::Error| parse_error(err.to_string()))?;
            features.push(Feature::new(geometry, value));
        }

        log::debug!("Parsed {} features from {url}", features.len());
        Ok(Self::from_features(url, features))
    }

    /// Creates an overlay from already decoded features.
    pub fn from_features(url: &str, features: Vec<Feature>) -> Self {
        let extent = features
            .iter()
            .filter_map(Feature::extent)
            .reduce(Extent::merge);

        Self {
            url: url.to_owned(),
            features: Arc::new(features),
            extent,
        }
    }

    /// Location the overlay was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The features, in document order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Bounding extent of all feature geometries. It is not checked for plausibility, run it
    /// through [`fittable`](stressmap_types::extent::fittable) before fitting a view to it.
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Layer rendering these features. The features are shared, not copied.
    pub fn layer(&self, opacity: f32) -> VectorLayer {
        VectorLayer::new(self.features.clone(), opacity)
    }
}

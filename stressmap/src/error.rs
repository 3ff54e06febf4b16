//! Error types.

use stressmap_types::Extent;
use thiserror::Error;

/// Error returned by a [`ResourceLoader`](crate::loader::ResourceLoader).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The resource does not exist (e.g. HTTP 404 or a missing file).
    #[error("resource not found")]
    NotFound,

    /// The server answered with a non-success status.
    #[error("request failed with status {0}")]
    Status(u16),

    /// Could not reach the server or read the response body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The URL could not be resolved.
    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    /// Local I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything that can go wrong while bringing an overlay onto the map.
///
/// None of these are propagated to the caller of the lifecycle manager: they are logged and the
/// map is degraded to "no overlay" or to the fallback viewport.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The overlay resource could not be fetched.
    #[error("failed to fetch {url}: {source}")]
    ResourceFetch {
        /// Resource location.
        url: String,
        /// Underlying loader error.
        #[source]
        source: FetchError,
    },

    /// The resource was fetched but its content is not valid feature or grid data.
    #[error("failed to parse {url}: {reason}")]
    Parse {
        /// Resource location.
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// The data is valid but its extent cannot be used to fit the view.
    #[error("extent {extent:?} cannot be used to fit the view")]
    ExtentUnusable {
        /// The rejected extent, if one could be computed at all.
        extent: Option<Extent>,
    },

    /// The raster source reported its own error state.
    #[error("raster source {url} failed: {reason}")]
    SourceState {
        /// Resource location.
        url: String,
        /// Reason reported by the source.
        reason: String,
    },
}

/// Error in viewer configuration or in a selection that does not match it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration is not valid JSON or does not match the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A selection names an entry that is not configured.
    #[error("unknown {kind} selection '{name}'")]
    UnknownSelection {
        /// Which control the selection came from.
        kind: &'static str,
        /// The selected name.
        name: String,
    },
}

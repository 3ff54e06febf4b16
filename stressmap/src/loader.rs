//! Loading of overlay resources.

use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::FetchError;

/// Fetches the raw bytes of a resource by URL.
///
/// This is the only network boundary of the crate. Implementations must turn every failure into
/// a [`FetchError`]; nothing is retried.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ResourceLoader: MaybeSend + MaybeSync {
    /// Load the resource at `url`.
    async fn load_bytes(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{DirectoryLoader, HttpLoader};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Component, Path, PathBuf};

    use bytes::Bytes;
    use reqwest::{Client, StatusCode, Url};

    use super::ResourceLoader;
    use crate::error::FetchError;

    /// Loads resources over HTTP(S).
    ///
    /// Relative URLs such as `/assets/stress_sample.json` are resolved against the base URL given
    /// with [`HttpLoader::with_base_url`].
    #[derive(Debug, Clone)]
    pub struct HttpLoader {
        client: Client,
        base_url: Option<Url>,
    }

    impl HttpLoader {
        /// Creates a loader without a base URL. Only absolute URLs can be loaded.
        pub fn new(client: Client) -> Self {
            Self {
                client,
                base_url: None,
            }
        }

        /// Sets the origin relative URLs are resolved against.
        pub fn with_base_url(mut self, base_url: &str) -> Result<Self, FetchError> {
            let base_url =
                Url::parse(base_url).map_err(|_| FetchError::InvalidUrl(base_url.to_owned()))?;
            self.base_url = Some(base_url);
            Ok(self)
        }

        fn resolve(&self, url: &str) -> Result<Url, FetchError> {
            match (Url::parse(url), &self.base_url) {
                (Ok(url), _) => Ok(url),
                (Err(_), Some(base)) => base
                    .join(url)
                    .map_err(|_| FetchError::InvalidUrl(url.to_owned())),
                (Err(_), None) => Err(FetchError::InvalidUrl(url.to_owned())),
            }
        }
    }

    #[async_trait::async_trait]
    impl ResourceLoader for HttpLoader {
        async fn load_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
            let resolved = self.resolve(url)?;
            log::debug!("Downloading {resolved}");

            let response = self
                .client
                .get(resolved.clone())
                .send()
                .await
                .map_err(|err| FetchError::Transport(err.to_string()))?;

            match response.status() {
                StatusCode::NOT_FOUND => {
                    log::warn!("Resource not found (404): {resolved}");
                    return Err(FetchError::NotFound);
                }
                status if !status.is_success() => {
                    log::error!("Request for {resolved} failed: {status}");
                    return Err(FetchError::Status(status.as_u16()));
                }
                _ => {}
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|err| FetchError::Transport(err.to_string()))?;
            log::debug!("Downloaded {} bytes from {resolved}", bytes.len());

            Ok(bytes)
        }
    }

    /// Serves resources from a local directory, treating URLs as paths relative to its root.
    ///
    /// `/assets/a.json` and `./assets/a.json` both map to `<root>/assets/a.json`. Paths escaping
    /// the root are rejected.
    #[derive(Debug, Clone)]
    pub struct DirectoryLoader {
        root: PathBuf,
    }

    impl DirectoryLoader {
        /// Creates a loader serving files under `root`.
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        fn resolve(&self, url: &str) -> Result<PathBuf, FetchError> {
            let mut path = self.root.clone();
            for component in Path::new(url).components() {
                match component {
                    Component::Normal(part) => path.push(part),
                    Component::RootDir | Component::CurDir => {}
                    Component::ParentDir | Component::Prefix(_) => {
                        return Err(FetchError::InvalidUrl(url.to_owned()))
                    }
                }
            }

            Ok(path)
        }
    }

    #[async_trait::async_trait]
    impl ResourceLoader for DirectoryLoader {
        async fn load_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
            let path = self.resolve(url)?;
            log::debug!("Reading {}", path.display());

            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Bytes::from(bytes)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    log::warn!("File not found: {}", path.display());
                    Err(FetchError::NotFound)
                }
                Err(err) => Err(err.into()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn http_loader_resolves_relative_urls() {
            let loader = HttpLoader::new(Client::new())
                .with_base_url("http://localhost:5173/app/")
                .unwrap();
            assert_eq!(
                loader.resolve("/assets/stress_sample.json").unwrap().as_str(),
                "http://localhost:5173/assets/stress_sample.json"
            );
            assert_eq!(
                loader.resolve("./assets/sample.tif").unwrap().as_str(),
                "http://localhost:5173/app/assets/sample.tif"
            );
        }

        #[test]
        fn http_loader_without_base_rejects_relative_urls() {
            let loader = HttpLoader::new(Client::new());
            assert!(matches!(
                loader.resolve("/assets/a.json"),
                Err(FetchError::InvalidUrl(_))
            ));
        }

        #[test]
        fn directory_loader_stays_under_root() {
            let loader = DirectoryLoader::new("/srv/viewer");
            assert_eq!(
                loader.resolve("/assets/a.json").unwrap(),
                PathBuf::from("/srv/viewer/assets/a.json")
            );
            assert_eq!(
                loader.resolve("./assets/sample.tif").unwrap(),
                PathBuf::from("/srv/viewer/assets/sample.tif")
            );
            assert!(loader.resolve("../secret").is_err());
        }

        #[tokio::test]
        async fn directory_loader_reports_missing_files() {
            let loader = DirectoryLoader::new(std::env::temp_dir());
            let result = loader.load_bytes("definitely-missing-stressmap.json").await;
            assert!(matches!(result, Err(FetchError::NotFound)));
        }
    }
}

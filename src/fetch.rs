//! Image acquisition: downloads and local files.
//!
//! The poster core only ever sees decoded images. Getting them is the job of
//! two injected collaborators:
//!
//! - [`ImageFetcher`] downloads by URL ([`HttpFetcher`] in production).
//! - [`ResourceLoader`] reads local files ([`FileLoader`]).
//!
//! [`ImageSource`] picks between them from a user-supplied string.
//! There are no retries here; a failed download fails the job.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;

use crate::error::PosterError;

/// Downloads and decodes images by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<DynamicImage, PosterError>;
}

/// Loads and decodes local image files.
pub trait ResourceLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<DynamicImage, PosterError>;
}

/// HTTP(S) fetcher with a request timeout. Redirects are followed.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

    pub fn new(timeout: Duration) -> Result<Self, PosterError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("placard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PosterError::Fetch(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<DynamicImage, PosterError> {
        tracing::debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PosterError::Fetch(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(PosterError::Fetch(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PosterError::Fetch(format!("Failed to read image data: {}", e)))?;

        image::load_from_memory(&bytes)
            .map_err(|e| PosterError::Fetch(format!("Failed to decode {}: {}", url, e)))
    }
}

/// Reads images from disk, resolving relative paths against an optional root.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` (e.g. a manifest's directory).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ResourceLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<DynamicImage, PosterError> {
        let path = self.resolve(path);
        if !path.exists() {
            return Err(PosterError::Fetch(format!(
                "Image not found: {}",
                path.display()
            )));
        }
        image::open(&path)
            .map_err(|e| PosterError::Fetch(format!("Failed to decode {}: {}", path.display(), e)))
    }
}

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

impl FromStr for ImageSource {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PosterError::Fetch("Image source is empty".to_string()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ImageSource::Url(s.to_string()))
        } else {
            Ok(ImageSource::File(PathBuf::from(s)))
        }
    }
}

impl ImageSource {
    /// Fetch or load the image.
    pub async fn load(
        &self,
        fetcher: &dyn ImageFetcher,
        loader: &dyn ResourceLoader,
    ) -> Result<DynamicImage, PosterError> {
        match self {
            ImageSource::Url(url) => fetcher.fetch(url).await,
            ImageSource::File(path) => loader.load(path),
        }
    }
}

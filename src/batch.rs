//! # Batch Jobs
//!
//! A manifest lists posters to build with one shared spec:
//!
//! ```toml
//! [spec]
//! font_family = "Noto Sans CJK SC"
//!
//! [[job]]
//! cover = "https://picsum.photos/800/600"
//! primary = "编程改变世界，创新引领未来。"
//! secondary = "Programming changes the world, innovation leads the future."
//! qr_link = "https://example.com"
//!
//! [[job]]
//! cover = "images/sample.jpg"
//! primary = "技术成就梦想，代码书写人生。"
//! background = "images/custom-background.jpg"
//! qr = "images/custom-qrcode.jpg"
//! ```
//!
//! Inputs are resolved first (downloads are async), then every poster is
//! composed, encoded and written in parallel. Each job owns its canvas,
//! faces and images; only the read-only spec and font source are shared.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PosterSpec;
use crate::error::PosterError;
use crate::export::{self, OutputFormat};
use crate::fetch::{ImageFetcher, ImageSource, ResourceLoader};
use crate::poster::{Poster, PosterBuilder, PosterRequest};
use crate::qr;
use crate::text::{Caption, FaceSource};

/// One poster to build. Image fields take a URL or a file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub cover: String,
    /// Caption wrapped per character.
    pub primary: String,
    /// Caption wrapped per word.
    pub secondary: Option<String>,
    /// Falls back to a plain canvas sized by `PosterSpec::background`.
    pub background: Option<String>,
    /// QR image; takes precedence over `qr_link`.
    pub qr: Option<String>,
    /// Link to encode when no QR image is given. Falls back to `PosterSpec::qr`.
    pub qr_link: Option<String>,
}

/// A TOML batch manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub spec: PosterSpec,
    #[serde(rename = "job")]
    pub jobs: Vec<Job>,
}

impl Manifest {
    pub fn from_toml(text: &str) -> Result<Self, PosterError> {
        toml::from_str(text).map_err(|e| PosterError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, PosterError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
            .map_err(|e| PosterError::Config(format!("{}: {}", path.display(), e)))
    }
}

impl Job {
    /// Fetch and decode every input this job names.
    pub async fn resolve(
        &self,
        spec: &PosterSpec,
        fetcher: &dyn ImageFetcher,
        loader: &dyn ResourceLoader,
    ) -> Result<PosterRequest, PosterError> {
        let cover = self.cover.parse::<ImageSource>()?.load(fetcher, loader).await?;

        let background = match &self.background {
            Some(source) => source
                .parse::<ImageSource>()?
                .load(fetcher, loader)
                .await?
                .to_rgb8(),
            None => {
                let bg = &spec.background;
                RgbImage::from_pixel(bg.width, bg.height, bg.color.to_rgb())
            }
        };

        let qr = match (&self.qr, self.qr_link.as_ref().or(spec.qr.link.as_ref())) {
            (Some(source), _) => source.parse::<ImageSource>()?.load(fetcher, loader).await?,
            (None, Some(link)) => DynamicImage::ImageRgb8(qr::render_qr(link, spec.qr.size)?),
            (None, None) => {
                return Err(PosterError::Config(
                    "Job needs a QR image or a QR link".to_string(),
                ));
            }
        };

        Ok(PosterRequest {
            background,
            cover,
            qr,
            primary: Caption::cjk(self.primary.as_str()),
            secondary: self.secondary.as_deref().map(Caption::latin),
        })
    }
}

/// Resolve every job in order. A failed job does not stop the others.
pub async fn resolve_all(
    jobs: &[Job],
    spec: &PosterSpec,
    fetcher: &dyn ImageFetcher,
    loader: &dyn ResourceLoader,
) -> Vec<Result<PosterRequest, PosterError>> {
    let mut requests = Vec::with_capacity(jobs.len());
    for (index, job) in jobs.iter().enumerate() {
        let request = job.resolve(spec, fetcher, loader).await;
        if let Err(e) = &request {
            tracing::warn!("Job {} ({}): {}", index, job.cover, e);
        }
        requests.push(request);
    }
    requests
}

/// Compose resolved requests in parallel. Results keep input order.
pub fn build_all(
    requests: Vec<Result<PosterRequest, PosterError>>,
    spec: &PosterSpec,
    fonts: &dyn FaceSource,
) -> Vec<Result<Poster, PosterError>> {
    requests
        .into_par_iter()
        .map(|request| PosterBuilder::new(spec, fonts).build(request?))
        .collect()
}

/// Compose, encode and write resolved requests in parallel.
pub fn render_all(
    requests: Vec<Result<PosterRequest, PosterError>>,
    spec: &PosterSpec,
    fonts: &dyn FaceSource,
    out_dir: &Path,
    format: OutputFormat,
) -> Vec<Result<PathBuf, PosterError>> {
    requests
        .into_par_iter()
        .map(|request| {
            let poster = PosterBuilder::new(spec, fonts).build(request?)?;
            let bytes = export::encode(&poster.image, format)?;
            export::write_to_dir(out_dir, &bytes, format)
        })
        .collect()
}

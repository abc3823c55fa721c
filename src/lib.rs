//! # Placard - Poster Compositor
//!
//! Placard composes marketing posters: a cover photograph, bilingual captions
//! wrapped to real font metrics, and a QR block, layered onto a fixed
//! background canvas. It provides:
//!
//! - **Line breaking**: word wrap for Latin text, character wrap for CJK
//! - **Compositing**: a vertical layout cursor that stacks cover and captions
//!   without overlap, plus a QR block anchored to the bottom-right corner
//! - **Fonts**: family lookup over system fonts and font files
//! - **I/O**: image downloads, QR generation, JPEG/PNG export, batch builds
//!
//! ## Quick Start
//!
//! ```no_run
//! use placard::{
//!     config::PosterSpec,
//!     export::{self, OutputFormat},
//!     poster::{PosterBuilder, PosterRequest},
//!     qr,
//!     text::{Caption, FontBook},
//! };
//!
//! let spec = PosterSpec::default();
//! let fonts = FontBook::system();
//!
//! let request = PosterRequest {
//!     background: image::RgbImage::from_pixel(800, 1200, image::Rgb([255, 255, 255])),
//!     cover: image::open("cover.jpg").map_err(|e| placard::PosterError::Fetch(e.to_string()))?,
//!     qr: image::DynamicImage::ImageRgb8(qr::render_qr("https://example.com", 200)?),
//!     primary: Caption::cjk("世上本没有路，走的人多了，也便成了路。"),
//!     secondary: Some(Caption::latin("Hope can set you free.")),
//! };
//!
//! let poster = PosterBuilder::new(&spec, &fonts).build(request)?;
//! let bytes = export::encode(&poster.image, OutputFormat::Jpeg)?;
//! export::write_to_dir(&export::default_output_dir(), &bytes, OutputFormat::Jpeg)?;
//!
//! # Ok::<(), placard::PosterError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`text`] | Font metrics, faces, font lookup and line breaking |
//! | [`render`] | Canvas state, layout cursor and compositing |
//! | [`poster`] | One poster build, start to finish |
//! | [`config`] | Layout constants and TOML loading |
//! | [`fetch`] | Image downloads and local files |
//! | [`qr`] | QR code rasters |
//! | [`export`] | JPEG/PNG encoding and output files |
//! | [`batch`] | Manifests and parallel builds |
//! | [`error`] | Error types |

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod poster;
pub mod qr;
pub mod render;
pub mod text;

// Re-exports for convenience
pub use config::PosterSpec;
pub use error::PosterError;
pub use poster::{Poster, PosterBuilder, PosterRequest};

//! # Rendering Module
//!
//! This module composes rasters and text onto a poster canvas.
//!
//! ## Modules
//!
//! - [`canvas`]: Per-build canvas state, layout cursor and draw log
//! - [`composer`]: Cover, wrapped text and QR placement
//!
//! ## Usage Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use placard::config::Color;
//! use placard::render::CanvasState;
//! use placard::text::{FixedFace, wrap};
//!
//! let mut canvas = CanvasState::new(RgbImage::new(800, 1000), 25)?;
//! let cursor = canvas.place_cover_image(&DynamicImage::new_rgb8(400, 300))?;
//! assert_eq!(cursor.y(), 587);
//!
//! let face = FixedFace::new(10);
//! let lines = wrap::word_wrap("Hope can set you free.", &face, cursor.usable_width());
//! canvas.draw_wrapped_text(&lines, &face, Color::BLACK);
//! # Ok::<(), placard::PosterError>(())
//! ```

pub mod canvas;
pub mod composer;

pub use canvas::{CanvasState, DrawOp, ImageRole, LayoutCursor};

//! # Poster Builder
//!
//! Runs one composition session in a fixed order:
//!
//! ```text
//! check font family ─► cover ─► primary caption ─► secondary caption ─► QR block
//!                       (flow: stacked on the cursor)                 (anchored)
//! ```
//!
//! Any failing step aborts the build; a half-drawn canvas is never returned.
//!
//! ## Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use placard::config::PosterSpec;
//! use placard::poster::{PosterBuilder, PosterRequest};
//! use placard::text::{Caption, FixedFontBook};
//!
//! let spec = PosterSpec::default();
//! let fonts = FixedFontBook::new(&[spec.font_family.as_str()]);
//!
//! let request = PosterRequest {
//!     background: RgbImage::new(800, 1000),
//!     cover: DynamicImage::new_rgb8(400, 300),
//!     qr: DynamicImage::new_rgb8(100, 100),
//!     primary: Caption::cjk("世上本没有路"),
//!     secondary: Some(Caption::latin("Hope can set you free.")),
//! };
//!
//! let poster = PosterBuilder::new(&spec, &fonts).build(request)?;
//! assert_eq!(poster.image.dimensions(), (800, 1000));
//! # Ok::<(), placard::PosterError>(())
//! ```

use image::{DynamicImage, RgbImage};

use crate::config::{CaptionStyle, PosterSpec};
use crate::error::PosterError;
use crate::render::{CanvasState, DrawOp};
use crate::text::{Caption, FaceSource, TextFace, wrap};

/// Decoded inputs for one poster.
#[derive(Debug, Clone)]
pub struct PosterRequest {
    pub background: RgbImage,
    pub cover: DynamicImage,
    pub qr: DynamicImage,
    pub primary: Caption,
    pub secondary: Option<Caption>,
}

/// A finished poster: the raster plus the log of what was drawn where.
#[derive(Debug, Clone)]
pub struct Poster {
    pub image: RgbImage,
    pub layout: Vec<DrawOp>,
}

/// Composes posters for one spec and font source.
pub struct PosterBuilder<'a> {
    spec: &'a PosterSpec,
    fonts: &'a dyn FaceSource,
}

/// Faces for one build, loaded up front so a missing font fails before any
/// drawing happens.
struct Faces {
    primary: Box<dyn TextFace + Send>,
    secondary: Box<dyn TextFace + Send>,
    label: Box<dyn TextFace + Send>,
}

impl<'a> PosterBuilder<'a> {
    pub fn new(spec: &'a PosterSpec, fonts: &'a dyn FaceSource) -> Self {
        Self { spec, fonts }
    }

    /// Compose `request` into a finished poster.
    pub fn build(&self, request: PosterRequest) -> Result<Poster, PosterError> {
        let faces = self.load_faces()?;

        let mut canvas = CanvasState::new(request.background, self.spec.margin)?;
        canvas.place_cover_image(&request.cover)?;

        self.draw_caption(&mut canvas, &request.primary, faces.primary.as_ref(), &self.spec.primary);

        if let Some(secondary) = request.secondary.as_ref().filter(|c| !c.is_empty()) {
            self.draw_caption(&mut canvas, secondary, faces.secondary.as_ref(), &self.spec.secondary);
        }

        canvas.place_qr_code(
            &request.qr,
            faces.label.as_ref(),
            self.spec.labels.color,
            &self.spec.labels.lines,
        )?;

        let (image, layout) = canvas.finish();
        tracing::info!(
            "Composed {}x{} poster with {} draw ops",
            image.width(),
            image.height(),
            layout.len()
        );
        Ok(Poster { image, layout })
    }

    fn load_faces(&self) -> Result<Faces, PosterError> {
        let family = self.spec.font_family.as_str();
        if !self.fonts.has_family(family) {
            return Err(PosterError::FontUnavailable(family.to_string()));
        }
        Ok(Faces {
            primary: self.fonts.face(family, self.spec.primary.size)?,
            secondary: self.fonts.face(family, self.spec.secondary.size)?,
            label: self.fonts.face(family, self.spec.labels.size)?,
        })
    }

    /// Insert the caption's gap, wrap it to the usable width and draw it.
    fn draw_caption(
        &self,
        canvas: &mut CanvasState,
        caption: &Caption,
        face: &dyn TextFace,
        style: &CaptionStyle,
    ) {
        canvas.advance(style.gap);
        let max_width = canvas.cursor().usable_width();
        let lines = wrap::wrap(caption, face, max_width, self.spec.break_threshold);
        tracing::debug!("Wrapped {:?} caption into {} lines", caption.script, lines.len());
        canvas.draw_wrapped_text(&lines, face, style.color);
    }
}

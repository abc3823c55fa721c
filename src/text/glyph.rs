//! TrueType/OpenType faces rendered with ab_glyph.
//!
//! Widths are horizontal advances rounded to whole pixels, and the rasterizer
//! moves its caret by those same rounded advances. Measured and drawn text
//! therefore never drift apart, whatever the script.

use ab_glyph::{Font, FontArc, FontVec, ScaleFont, point};

use super::{FontMetrics, TextFace};
use crate::error::PosterError;

/// A font at one pixel size.
#[derive(Clone)]
pub struct GlyphFace {
    font: FontArc,
    px: f32,
}

impl GlyphFace {
    pub fn new(font: FontArc, px: f32) -> Self {
        Self { font, px }
    }

    /// Parse font data (face `index` within a collection).
    pub fn from_vec(data: Vec<u8>, index: u32, px: f32) -> Result<Self, PosterError> {
        Ok(Self::new(Self::parse(data, index)?, px))
    }

    /// Parse font data once, for sharing between faces of several sizes.
    pub fn parse(data: Vec<u8>, index: u32) -> Result<FontArc, PosterError> {
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| PosterError::Font(e.to_string()))?;
        Ok(FontArc::new(font))
    }

    /// Pixel size this face was loaded at.
    pub fn px(&self) -> f32 {
        self.px
    }
}

impl std::fmt::Debug for GlyphFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFace").field("px", &self.px).finish()
    }
}

impl FontMetrics for GlyphFace {
    fn char_width(&self, c: char) -> u32 {
        if c.is_control() {
            return 0;
        }
        let scaled = self.font.as_scaled(self.px);
        scaled.h_advance(self.font.glyph_id(c)).round().max(0.0) as u32
    }

    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.px);
        (scaled.ascent() - scaled.descent() + scaled.line_gap())
            .ceil()
            .max(0.0) as u32
    }

    fn descent(&self) -> u32 {
        let scaled = self.font.as_scaled(self.px);
        (-scaled.descent()).ceil().max(0.0) as u32
    }
}

impl TextFace for GlyphFace {
    fn rasterize(&self, text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let (x0, baseline) = origin;
        let mut caret = x0;

        for ch in text.chars() {
            let advance = self.char_width(ch) as i32;
            if ch.is_control() {
                continue;
            }

            let glyph = self
                .font
                .glyph_id(ch)
                .with_scale_and_position(self.px, point(caret as f32, baseline as f32));

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;
                    plot(x, y, coverage.min(1.0));
                });
            }

            caret += advance;
        }
    }
}

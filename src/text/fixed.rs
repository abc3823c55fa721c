//! Fixed-width faces.
//!
//! Every glyph has the same advance (spaces can differ) and draws as a solid
//! box from the ascent line down to the baseline. Layout arithmetic becomes
//! hand-computable, which makes these faces the reference fixtures for the
//! line breakers and for whole-poster tests.

use super::{FaceSource, FontMetrics, TextFace};
use crate::error::PosterError;

/// A face with fixed per-character widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFace {
    glyph_width: u32,
    space_width: u32,
    line_height: u32,
    descent: u32,
}

impl FixedFace {
    /// Every character, space included, is `width` pixels wide.
    ///
    /// Line height defaults to `width` and descent to 0.
    pub fn new(width: u32) -> Self {
        Self {
            glyph_width: width,
            space_width: width,
            line_height: width,
            descent: 0,
        }
    }

    /// An em-square face for a pixel size: glyphs and spaces `px` wide,
    /// line height `1.25 × px`, descent `0.25 × px`.
    pub fn square(px: f32) -> Self {
        let width = px.round().max(0.0) as u32;
        Self {
            glyph_width: width,
            space_width: width,
            line_height: (px * 1.25).round().max(0.0) as u32,
            descent: (px * 0.25).round().max(0.0) as u32,
        }
    }

    pub fn with_space_width(mut self, width: u32) -> Self {
        self.space_width = width;
        self
    }

    pub fn with_line_height(mut self, height: u32) -> Self {
        self.line_height = height;
        self
    }

    pub fn with_descent(mut self, descent: u32) -> Self {
        self.descent = descent;
        self
    }
}

impl FontMetrics for FixedFace {
    fn char_width(&self, c: char) -> u32 {
        if c.is_control() {
            0
        } else if c == ' ' {
            self.space_width
        } else {
            self.glyph_width
        }
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn descent(&self) -> u32 {
        self.descent
    }
}

impl TextFace for FixedFace {
    fn rasterize(&self, text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let (x0, baseline) = origin;
        let ascent = self.line_height.saturating_sub(self.descent) as i32;
        let mut caret = x0;

        for ch in text.chars() {
            let advance = self.char_width(ch) as i32;
            if !ch.is_whitespace() && !ch.is_control() {
                for y in (baseline - ascent)..baseline {
                    for x in caret..caret + advance {
                        plot(x, y, 1.0);
                    }
                }
            }
            caret += advance;
        }
    }
}

/// A [`FaceSource`] that serves [`FixedFace::square`] faces for a fixed set
/// of family names.
#[derive(Debug, Clone, Default)]
pub struct FixedFontBook {
    families: Vec<String>,
}

impl FixedFontBook {
    pub fn new(families: &[&str]) -> Self {
        Self {
            families: families.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FaceSource for FixedFontBook {
    fn has_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }

    fn face(&self, family: &str, px: f32) -> Result<Box<dyn TextFace + Send>, PosterError> {
        if !self.has_family(family) {
            return Err(PosterError::FontUnavailable(family.to_string()));
        }
        Ok(Box::new(FixedFace::square(px)))
    }
}

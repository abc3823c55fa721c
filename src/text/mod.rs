//! # Text Measurement and Layout
//!
//! Everything the compositor needs to know about a font lives behind two
//! traits:
//!
//! - [`FontMetrics`] measures: character and string widths, line height,
//!   descent. The line breakers only ever see this trait.
//! - [`TextFace`] extends it with rasterization. Faces advance their caret by
//!   exactly [`FontMetrics::char_width`] per character, so a line that was
//!   measured to fit also draws to fit.
//!
//! ## Implementations
//!
//! | Type | Source |
//! |------|--------|
//! | [`GlyphFace`] | TrueType/OpenType data via `ab_glyph` |
//! | [`FixedFace`] | Fixed per-character widths, solid boxes (tests, previews) |
//!
//! Faces are obtained by family name through a [`FaceSource`], normally a
//! [`FontBook`].

pub mod fixed;
pub mod fontbook;
pub mod glyph;
pub mod wrap;

pub use fixed::{FixedFace, FixedFontBook};
pub use fontbook::FontBook;
pub use glyph::GlyphFace;
pub use wrap::{BreakThreshold, Caption, ScriptKind};

use crate::error::PosterError;

/// Pixel measurements of a font at one size.
pub trait FontMetrics {
    /// Advance width of a single character. Control characters measure 0.
    fn char_width(&self, c: char) -> u32;

    /// Width of a string: the sum of its character widths.
    fn string_width(&self, s: &str) -> u32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Distance between consecutive baselines.
    fn line_height(&self) -> u32;

    /// Distance from the baseline to the lowest descender.
    fn descent(&self) -> u32;
}

/// A font that can draw what it measures.
pub trait TextFace: FontMetrics {
    /// Rasterize `text` with its baseline starting at `origin`.
    ///
    /// `plot(x, y, coverage)` is called for every touched pixel in canvas
    /// coordinates; coordinates may fall outside the canvas and coverage is
    /// in `0.0..=1.0`.
    fn rasterize(&self, text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32));
}

/// Resolves font families to faces.
///
/// Shared by reference across parallel builds, hence `Sync`.
pub trait FaceSource: Sync {
    /// True if the family can be loaded.
    fn has_family(&self, family: &str) -> bool;

    /// Load `family` at `px` pixels.
    fn face(&self, family: &str, px: f32) -> Result<Box<dyn TextFace + Send>, PosterError>;
}

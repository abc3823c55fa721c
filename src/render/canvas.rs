//! Canvas state for one poster build.
//!
//! `CanvasState` owns the background raster and everything that changes while
//! a poster is composed: the [`LayoutCursor`] and the draw log. It is created
//! once per build, mutated by each compositing step in order, and consumed by
//! [`CanvasState::finish`].

use image::RgbImage;
use serde::Serialize;

use crate::config::Color;
use crate::error::PosterError;

/// Vertical write position and usable content width.
///
/// `y` only moves forward: [`advance`](Self::advance) takes an unsigned delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutCursor {
    y: u32,
    usable_width: u32,
}

impl LayoutCursor {
    pub fn new(y: u32, usable_width: u32) -> Self {
        Self { y, usable_width }
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn usable_width(&self) -> u32 {
        self.usable_width
    }

    /// Move the cursor down by `dy` pixels.
    #[inline]
    pub fn advance(&mut self, dy: u32) {
        self.y = self.y.saturating_add(dy);
    }

    /// Move the cursor down to `y`. A target above the cursor leaves it where
    /// it is.
    #[inline]
    pub fn advance_to(&mut self, y: u32) {
        self.y = self.y.max(y);
    }
}

/// What an image draw placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Cover,
    QrCode,
}

/// One entry of the draw log.
///
/// Coordinates are nominal: the drawn pixels are clipped to the canvas, the
/// logged rectangle is not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    Image {
        role: ImageRole,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    /// `y` is the baseline.
    Text {
        x: i64,
        y: i64,
        text: String,
        color: Color,
    },
}

/// Mutable state of one composition session.
pub struct CanvasState {
    pub(crate) image: RgbImage,
    pub(crate) cursor: LayoutCursor,
    margin: u32,
    pub(crate) log: Vec<DrawOp>,
}

impl CanvasState {
    /// Start a session on `background`.
    ///
    /// The cursor starts at the top margin with a usable width of
    /// `width - 2 × margin`.
    pub fn new(background: RgbImage, margin: u32) -> Result<Self, PosterError> {
        let (width, height) = background.dimensions();
        if width == 0 || height == 0 {
            return Err(PosterError::InvalidImage(format!(
                "background is {}x{}",
                width, height
            )));
        }
        let usable_width = width
            .checked_sub(margin.saturating_mul(2))
            .filter(|&w| w > 0)
            .ok_or_else(|| {
                PosterError::InvalidImage(format!(
                    "background width {} leaves no room inside a {}px margin",
                    width, margin
                ))
            })?;

        Ok(Self {
            image: background,
            cursor: LayoutCursor::new(margin, usable_width),
            margin,
            log: Vec::new(),
        })
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Move the cursor down by `dy` pixels.
    pub fn advance(&mut self, dy: u32) {
        self.cursor.advance(dy);
    }

    /// Everything drawn so far, in order.
    pub fn log(&self) -> &[DrawOp] {
        &self.log
    }

    /// The canvas raster as it stands.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// End the session, returning the raster and its draw log.
    pub fn finish(self) -> (RgbImage, Vec<DrawOp>) {
        (self.image, self.log)
    }
}

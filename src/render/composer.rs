//! Compositing onto a [`CanvasState`].
//!
//! Two placement modes share one canvas:
//!
//! - **Flow**: the cover image and wrapped captions stack downwards from the
//!   cursor, so they can never overlap each other.
//! - **Anchored**: the QR code and its labels sit at fixed offsets from the
//!   bottom-right and bottom-left corners, whatever the cursor says.
//!
//! All pixel writes are clipped to the canvas and alpha-blended: image alpha
//! and glyph coverage both go through [`blend`].

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbaImage};

use super::canvas::{CanvasState, DrawOp, ImageRole, LayoutCursor};
use crate::config::Color;
use crate::error::PosterError;
use crate::text::TextFace;

/// Linear interpolation between two channel values.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Mix `color` over `base` with `alpha` in `0.0..=1.0`.
#[inline]
pub fn blend(base: Rgb<u8>, color: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = base;
    for i in 0..3 {
        out.0[i] = lerp(base.0[i] as f32, color.0[i] as f32, alpha).round() as u8;
    }
    out
}

fn check_dimensions(image: &DynamicImage, what: &str) -> Result<(), PosterError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PosterError::InvalidImage(format!(
            "{} is {}x{}",
            what,
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

impl CanvasState {
    /// Blend one pixel, ignoring coordinates outside the canvas.
    #[inline]
    fn plot(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        if alpha <= 0.0
            || x < 0
            || y < 0
            || x >= self.image.width() as i64
            || y >= self.image.height() as i64
        {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        *pixel = blend(*pixel, color, alpha);
    }

    /// Blend an RGBA raster with its top-left corner at `(x, y)`.
    fn blit(&mut self, top: &RgbaImage, x: i64, y: i64) {
        for (px, py, pixel) in top.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            self.plot(x + px as i64, y + py as i64, Rgb([r, g, b]), a as f32 / 255.0);
        }
    }

    /// Blit `top` and log it.
    fn draw_image(&mut self, role: ImageRole, top: &RgbaImage, x: i64, y: i64) {
        self.blit(top, x, y);
        self.log.push(DrawOp::Image {
            role,
            x,
            y,
            width: top.width(),
            height: top.height(),
        });
    }

    /// Scale `cover` to the usable width and draw it at `(margin, margin)`.
    ///
    /// The cursor moves to the cover's bottom edge, `margin + height`. The
    /// scaled height uses integer division: a 400×300 cover on 750 px becomes
    /// 750×562. Only the rows that land on the canvas are resampled; the log
    /// records the full scaled rectangle.
    pub fn place_cover_image(&mut self, cover: &DynamicImage) -> Result<LayoutCursor, PosterError> {
        check_dimensions(cover, "cover image")?;

        let (cover_width, cover_height) = (cover.width(), cover.height());
        let width = self.cursor.usable_width();
        let height = u32::try_from(cover_height as u64 * width as u64 / cover_width as u64)
            .unwrap_or(u32::MAX);
        if height == 0 {
            return Err(PosterError::InvalidImage(format!(
                "cover image {}x{} scales to zero height",
                cover_width, cover_height
            )));
        }

        let margin = self.margin();
        let visible = height.min(self.height().saturating_sub(margin));
        if visible > 0 {
            let source_rows = (cover_height as u64 * visible as u64)
                .div_ceil(height as u64)
                .clamp(1, cover_height as u64) as u32;
            let source = cover.crop_imm(0, 0, cover_width, source_rows).to_rgba8();
            let scaled = imageops::resize(&source, width, visible, FilterType::Lanczos3);
            self.blit(&scaled, margin as i64, margin as i64);
        }
        self.log.push(DrawOp::Image {
            role: ImageRole::Cover,
            x: margin as i64,
            y: margin as i64,
            width,
            height,
        });

        self.cursor.advance_to(margin.saturating_add(height));
        tracing::debug!("Placed cover {}x{}, cursor at y={}", width, height, self.cursor.y());
        Ok(self.cursor)
    }

    /// Draw a single line of text with its baseline at `(x, y)`.
    ///
    /// Line feeds at the end of `text` are not drawn.
    pub fn draw_text(&mut self, text: &str, x: i64, y: i64, face: &dyn TextFace, color: Color) {
        let text = text.trim_end_matches('\n');
        let rgb = color.to_rgb();
        // Origins beyond i32 are far off the canvas; only the log entry is kept
        if let (Ok(ox), Ok(oy)) = (i32::try_from(x), i32::try_from(y)) {
            let mut coverage = Vec::new();
            face.rasterize(text, (ox, oy), &mut |px, py, c| coverage.push((px, py, c)));
            for (px, py, c) in coverage {
                self.plot(px as i64, py as i64, rgb, c);
            }
        }
        self.log.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    /// Draw wrapped lines below the cursor, one line height apart.
    ///
    /// For each line the cursor first moves down one line height, then the
    /// line is drawn at the margin with its baseline on the cursor.
    pub fn draw_wrapped_text(&mut self, lines: &[String], face: &dyn TextFace, color: Color) {
        let x = self.margin() as i64;
        for line in lines {
            self.cursor.advance(face.line_height());
            let y = self.cursor.y() as i64;
            self.draw_text(line, x, y, face, color);
        }
        tracing::debug!("Drew {} lines, cursor at y={}", lines.len(), self.cursor.y());
    }

    /// Draw the QR code in the bottom-right corner and its two labels along
    /// the bottom-left, independent of the cursor.
    ///
    /// Labels sit at `height - margin - 2 × line_height` and
    /// `height - margin - descent`.
    pub fn place_qr_code(
        &mut self,
        qr: &DynamicImage,
        face: &dyn TextFace,
        color: Color,
        labels: &[String; 2],
    ) -> Result<(), PosterError> {
        check_dimensions(qr, "QR code")?;

        let margin = self.margin() as i64;
        let (width, height) = (self.width() as i64, self.height() as i64);
        let (qr_width, qr_height) = (qr.width() as i64, qr.height() as i64);
        if qr_width + 2 * margin > width || qr_height + 2 * margin > height {
            return Err(PosterError::InvalidImage(format!(
                "QR code {}x{} does not fit a {}x{} canvas with a {}px margin",
                qr_width, qr_height, width, height, margin
            )));
        }

        let x = width - qr_width - margin;
        let y = height - qr_height - margin;
        self.draw_image(ImageRole::QrCode, &qr.to_rgba8(), x, y);

        let bottom = height - margin;
        let upper = bottom - 2 * face.line_height() as i64;
        let lower = bottom - face.descent() as i64;
        self.draw_text(&labels[0], margin, upper, face, color);
        self.draw_text(&labels[1], margin, lower, face, color);

        tracing::debug!("Placed QR code at ({}, {})", x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FixedFace;
    use image::{Rgba, RgbImage};

    fn canvas(width: u32, height: u32) -> CanvasState {
        let white = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        CanvasState::new(white, 25).unwrap()
    }

    fn canvas_with_cursor(width: u32, height: u32, y: u32) -> CanvasState {
        let mut canvas = canvas(width, height);
        canvas.advance(y - 25);
        canvas
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_blend() {
        let white = Rgb([255, 255, 255]);
        let black = Rgb([0, 0, 0]);
        assert_eq!(blend(white, black, 0.0), white);
        assert_eq!(blend(white, black, 1.0), black);
        assert_eq!(blend(white, black, 0.5), Rgb([128, 128, 128]));
        assert_eq!(blend(white, black, 7.0), black);
    }

    #[test]
    fn test_place_cover_image_scales_to_usable_width() {
        let mut canvas = canvas(800, 1000);
        let cursor = canvas
            .place_cover_image(&solid(400, 300, [200, 0, 0, 255]))
            .unwrap();

        assert_eq!(cursor.y(), 587);
        assert_eq!(cursor.usable_width(), 750);
        assert_eq!(
            canvas.log(),
            &[DrawOp::Image {
                role: ImageRole::Cover,
                x: 25,
                y: 25,
                width: 750,
                height: 562,
            }]
        );
        // Inside the cover, margin untouched
        assert_eq!(*canvas.image().get_pixel(400, 300), Rgb([200, 0, 0]));
        assert_eq!(*canvas.image().get_pixel(10, 10), Rgb([255, 255, 255]));
        assert_eq!(*canvas.image().get_pixel(400, 590), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_place_cover_rejects_empty_and_degenerate() {
        let mut canvas = canvas(800, 1000);
        assert!(matches!(
            canvas.place_cover_image(&DynamicImage::new_rgb8(0, 0)),
            Err(PosterError::InvalidImage(_))
        ));
        // 10000:1 banner scales below one pixel
        assert!(matches!(
            canvas.place_cover_image(&solid(10_000, 1, [0, 0, 0, 255])),
            Err(PosterError::InvalidImage(_))
        ));
        assert!(canvas.log().is_empty());
        assert_eq!(canvas.cursor().y(), 25);
    }

    #[test]
    fn test_tall_cover_resamples_visible_rows_only() {
        let mut canvas = canvas(800, 1000);
        let cursor = canvas
            .place_cover_image(&solid(2, 4000, [0, 0, 0, 255]))
            .unwrap();

        // 4000 × 750 / 2 rows nominally, 975 of them on the canvas
        assert_eq!(cursor.y(), 25 + 1_500_000);
        assert_eq!(
            canvas.log(),
            &[DrawOp::Image {
                role: ImageRole::Cover,
                x: 25,
                y: 25,
                width: 750,
                height: 1_500_000,
            }]
        );
        assert_eq!(*canvas.image().get_pixel(400, 30), Rgb([0, 0, 0]));
        assert_eq!(*canvas.image().get_pixel(400, 999), Rgb([0, 0, 0]));
        assert_eq!(*canvas.image().get_pixel(10, 999), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_cover_bottom_is_measured_from_margin() {
        let mut canvas = canvas(800, 1000);
        canvas.advance(100);
        let cursor = canvas
            .place_cover_image(&solid(400, 300, [200, 0, 0, 255]))
            .unwrap();
        assert_eq!(cursor.y(), 587);

        // A cursor already below the cover bottom stays put
        let mut canvas = canvas_with_cursor(800, 1000, 700);
        let cursor = canvas
            .place_cover_image(&solid(400, 300, [200, 0, 0, 255]))
            .unwrap();
        assert_eq!(cursor.y(), 700);
    }

    #[test]
    fn test_cursor_never_moves_up() {
        let mut canvas = canvas(800, 1000);
        let face = FixedFace::square(28.0);
        let label = FixedFace::square(22.0);
        let labels = ["SuchJack".to_string(), "一个幽默的程序员".to_string()];
        let mut ys = vec![canvas.cursor().y()];

        canvas
            .place_cover_image(&solid(400, 300, [200, 0, 0, 255]))
            .unwrap();
        ys.push(canvas.cursor().y());
        canvas.draw_wrapped_text(&[], &face, Color::BLACK);
        ys.push(canvas.cursor().y());
        canvas.draw_wrapped_text(&["路路".to_string(), "路".to_string()], &face, Color::BLACK);
        ys.push(canvas.cursor().y());
        canvas
            .place_qr_code(&solid(100, 100, [0, 0, 0, 255]), &label, Color::BLACK, &labels)
            .unwrap();
        ys.push(canvas.cursor().y());

        assert_eq!(ys, vec![25, 587, 587, 657, 657]);
        assert!(ys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_text_beyond_i32_is_logged_not_drawn() {
        let mut canvas = canvas(100, 100);
        let before = canvas.image().clone();
        canvas.advance(u32::MAX);
        let face = FixedFace::new(10);
        canvas.draw_wrapped_text(&["ab".to_string()], &face, Color::BLACK);

        assert_eq!(canvas.cursor().y(), u32::MAX);
        assert!(matches!(
            &canvas.log()[0],
            DrawOp::Text { y, .. } if *y == u32::MAX as i64
        ));
        assert_eq!(canvas.image(), &before);
    }

    #[test]
    fn test_transparent_cover_keeps_background() {
        let mut canvas = canvas(100, 100);
        canvas
            .place_cover_image(&solid(10, 10, [0, 0, 0, 0]))
            .unwrap();
        assert_eq!(*canvas.image().get_pixel(50, 50), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_draw_wrapped_text_advances_per_line() {
        let mut canvas = canvas(800, 1000);
        let face = FixedFace::new(10).with_line_height(20).with_descent(4);
        let lines = vec!["ab ".to_string(), "cd\n".to_string(), "e".to_string()];
        canvas.draw_wrapped_text(&lines, &face, Color::BLACK);

        assert_eq!(canvas.cursor().y(), 25 + 3 * 20);
        let baselines: Vec<i64> = canvas
            .log()
            .iter()
            .map(|op| match op {
                DrawOp::Text { y, .. } => *y,
                _ => panic!("unexpected image op"),
            })
            .collect();
        assert_eq!(baselines, vec![45, 65, 85]);
        // Line feed is not part of the drawn text
        assert!(matches!(&canvas.log()[1], DrawOp::Text { text, .. } if text == "cd"));
        // Glyph box for 'a' sits above the first baseline
        assert_eq!(*canvas.image().get_pixel(25, 44), Rgb([0, 0, 0]));
        assert_eq!(*canvas.image().get_pixel(25, 45), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_text_is_clipped_to_canvas() {
        let mut canvas = canvas(60, 60);
        let face = FixedFace::new(30).with_line_height(40);
        // Runs far past the right edge and above the top
        canvas.draw_text("wide text", 25, 10, &face, Color::BLACK);
        canvas.draw_text("x", -100, -100, &face, Color::BLACK);
        assert_eq!(*canvas.image().get_pixel(59, 5), Rgb([0, 0, 0]));
        assert_eq!(canvas.log().len(), 2);
    }

    #[test]
    fn test_place_qr_code_anchored_bottom_right() {
        let mut canvas = canvas(800, 1000);
        let face = FixedFace::square(22.0);
        let labels = ["SuchJack".to_string(), "一个幽默的程序员".to_string()];
        canvas
            .place_qr_code(&solid(100, 100, [0, 0, 0, 255]), &face, Color::BLACK, &labels)
            .unwrap();

        assert_eq!(
            canvas.log()[0],
            DrawOp::Image {
                role: ImageRole::QrCode,
                x: 675,
                y: 875,
                width: 100,
                height: 100,
            }
        );
        assert!(matches!(&canvas.log()[1], DrawOp::Text { x: 25, y: 919, text, .. } if text == "SuchJack"));
        assert!(matches!(&canvas.log()[2], DrawOp::Text { x: 25, y: 969, .. }));
        // Anchored placement leaves the cursor alone
        assert_eq!(canvas.cursor().y(), 25);
        assert_eq!(*canvas.image().get_pixel(700, 900), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_place_qr_code_too_large() {
        let mut canvas = canvas(200, 200);
        let face = FixedFace::square(22.0);
        let labels = ["a".to_string(), "b".to_string()];
        let err = canvas
            .place_qr_code(&solid(160, 100, [0, 0, 0, 255]), &face, Color::BLACK, &labels)
            .unwrap_err();
        assert!(matches!(err, PosterError::InvalidImage(_)));
        assert!(canvas.log().is_empty());
    }
}

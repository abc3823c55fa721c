//! QR code rasters for the poster's QR block.
//!
//! Encodes a link at error-correction level H and scales the module grid to
//! fill a square of the requested size, with a 4-module quiet zone. Leftover
//! pixels (when the size is not a multiple of the grid) are split evenly
//! around the code.

use image::{Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};

use crate::error::PosterError;

/// Quiet zone around the symbol, in modules.
const QUIET_ZONE: usize = 4;

/// Render `link` as a black-on-white QR code `size`×`size` pixels.
pub fn render_qr(link: &str, size: u32) -> Result<RgbImage, PosterError> {
    if link.is_empty() {
        return Err(PosterError::Config("QR link is empty".to_string()));
    }

    let code = QrCode::with_error_correction_level(link.as_bytes(), EcLevel::H)
        .map_err(|e| PosterError::InvalidImage(format!("QR code generation failed: {}", e)))?;

    let qr_size = code.width();
    let modules = qr_size + 2 * QUIET_ZONE;
    let size = size as usize;
    let cell_size = (size / modules).max(1);
    let pixel_size = (modules * cell_size).max(size);
    let offset = (pixel_size - modules * cell_size) / 2 + QUIET_ZONE * cell_size;

    let mut image = RgbImage::from_pixel(pixel_size as u32, pixel_size as u32, Rgb([255, 255, 255]));

    for qy in 0..qr_size {
        for qx in 0..qr_size {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            for cy in 0..cell_size {
                for cx in 0..cell_size {
                    let px = offset + qx * cell_size + cx;
                    let py = offset + qy * cell_size + cy;
                    image.put_pixel(px as u32, py as u32, Rgb([0, 0, 0]));
                }
            }
        }
    }

    Ok(image)
}

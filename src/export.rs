//! Encoding finished posters.
//!
//! Posters leave the library as JPEG or PNG bytes, a timestamped file in an
//! output directory, or a `data:` URI for embedding in HTML/JSON.

use std::fs::OpenOptions;
use std::io::{Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::PosterError;

const JPEG_QUALITY: u8 = 90;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Encode a poster raster.
pub fn encode(image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>, PosterError> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .encode_image(image)
                .map_err(|e| PosterError::Encode(format!("JPEG: {}", e)))?;
        }
        OutputFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| PosterError::Encode(format!("PNG: {}", e)))?;
        }
    }
    Ok(bytes)
}

/// `data:<mime>;base64,<payload>` for encoded bytes.
pub fn data_uri(bytes: &[u8], format: OutputFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), BASE64.encode(bytes))
}

/// Write encoded bytes to `dir` as `poster_<timestamp>.<ext>`, creating the
/// directory if needed. Returns the file's path.
pub fn write_to_dir(dir: &Path, bytes: &[u8], format: OutputFormat) -> Result<PathBuf, PosterError> {
    std::fs::create_dir_all(dir)?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S-%3f").to_string();
    let mut n = 0;
    loop {
        let name = match n {
            0 => format!("poster_{}.{}", stamp, format.extension()),
            _ => format!("poster_{}-{}.{}", stamp, n, format.extension()),
        };
        let path = dir.join(name);

        // create_new claims the name atomically across parallel writers
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                n += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(bytes)?;
        tracing::info!("Wrote {}", path.display());
        return Ok(path);
    }
}

/// Default output directory: `<system temp>/placard`.
pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("placard")
}

//! Font family lookup backed by fontdb.
//!
//! A `FontBook` answers the question the poster builder asks before drawing
//! anything: is this family available? It holds system fonts and/or font
//! files loaded explicitly, and hands out [`GlyphFace`]s by family name.
//!
//! ```no_run
//! use placard::text::{FaceSource, FontBook};
//!
//! let mut book = FontBook::system();
//! book.load_file("fonts/NotoSansSC-Regular.otf".as_ref())?;
//! assert!(book.has_family("Noto Sans SC"));
//! # Ok::<(), placard::PosterError>(())
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use ab_glyph::FontArc;
use fontdb::{Database, Family, ID, Query};

use super::{FaceSource, GlyphFace, TextFace};
use crate::error::PosterError;

/// A read-only set of fonts after loading.
///
/// Parsed fonts are cached per face, so every build after the first shares
/// one copy of the font data.
pub struct FontBook {
    db: Database,
    parsed: RwLock<HashMap<ID, FontArc>>,
}

impl FontBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::from_db(Database::new())
    }

    fn from_db(db: Database) -> Self {
        Self {
            db,
            parsed: RwLock::new(HashMap::new()),
        }
    }

    /// A book holding every font installed on the host.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        Self::from_db(db)
    }

    /// Add a font file (or collection).
    pub fn load_file(&mut self, path: &Path) -> Result<(), PosterError> {
        let before = self.db.len();
        self.db.load_font_file(path)?;
        if self.db.len() == before {
            return Err(PosterError::Font(format!(
                "No usable faces in {}",
                path.display()
            )));
        }
        tracing::debug!("Loaded font file {}", path.display());
        Ok(())
    }

    /// Add in-memory font data. Unparseable data is ignored.
    pub fn load_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Number of loaded faces.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// All family names, sorted and deduplicated.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Load the regular face of `family` at `px` pixels.
    pub fn glyph_face(&self, family: &str, px: f32) -> Result<GlyphFace, PosterError> {
        let families = [Family::Name(family)];
        let query = Query {
            families: &families,
            ..Query::default()
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| PosterError::FontUnavailable(family.to_string()))?;

        Ok(GlyphFace::new(self.font(id, family)?, px))
    }

    /// The parsed font for face `id`, parsing it on first use.
    fn font(&self, id: ID, family: &str) -> Result<FontArc, PosterError> {
        let cached = self
            .parsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(font) = cached {
            return Ok(font);
        }

        let font = self
            .db
            .with_face_data(id, |data, index| GlyphFace::parse(data.to_vec(), index))
            .ok_or_else(|| PosterError::Font(format!("Font data for '{}' is unreadable", family)))??;
        tracing::debug!("Parsed font for '{}'", family);

        let font = self
            .parsed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert(font)
            .clone();
        Ok(font)
    }

    /// Number of parsed fonts held in the cache.
    pub fn parsed_len(&self) -> usize {
        self.parsed.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceSource for FontBook {
    fn has_family(&self, family: &str) -> bool {
        let families = [Family::Name(family)];
        let query = Query {
            families: &families,
            ..Query::default()
        };
        self.db.query(&query).is_some()
    }

    fn face(&self, family: &str, px: f32) -> Result<Box<dyn TextFace + Send>, PosterError> {
        Ok(Box::new(self.glyph_face(family, px)?))
    }
}

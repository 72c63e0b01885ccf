//! # Label Engraving
//!
//! Raised text on the holder's front face.
//!
//! The font is reached through a [`FontHandle`] the caller passes to the
//! builder. Font bytes are fetched and parsed on first use only, so builds
//! without a label never touch the font at all.

mod outline;

pub use outline::{fit_font_size, group_contours, measure_text, text_outline};

use crate::error::{MeshError, MeshResult};
use crate::primitives::Primitive;
use crate::solid::Solid;
use glam::DVec3;
use rusttype::Font;
use std::fmt;
use std::sync::{Arc, OnceLock};

type FontLoader = Box<dyn Fn() -> MeshResult<Vec<u8>> + Send + Sync>;

/// Lazily loaded, shareable label font.
///
/// The loader runs at most until it succeeds once; the parsed font is then
/// cached for the life of the handle. Concurrent first uses may both run the
/// loader, and one result wins.
///
/// # Example
///
/// ```rust,no_run
/// use holder_mesh::label::FontHandle;
///
/// let fonts = FontHandle::new(|| Ok(std::fs::read("DejaVuSans.ttf")?));
/// assert!(!fonts.is_loaded());
/// ```
pub struct FontHandle {
    loader: FontLoader,
    font: OnceLock<Font<'static>>,
}

impl FontHandle {
    /// Handle backed by a loader that produces TrueType/OpenType bytes.
    pub fn new(loader: impl Fn() -> MeshResult<Vec<u8>> + Send + Sync + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            font: OnceLock::new(),
        }
    }

    /// Handle over font bytes already in memory.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self::new(move || Ok(bytes.to_vec()))
    }

    /// Returns true once the font has been parsed.
    pub fn is_loaded(&self) -> bool {
        self.font.get().is_some()
    }

    /// Loads and parses the font on first call.
    pub fn font(&self) -> MeshResult<&Font<'static>> {
        if let Some(font) = self.font.get() {
            return Ok(font);
        }
        let bytes = (self.loader)()?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| MeshError::resource("label font is not a valid TrueType/OpenType font"))?;
        tracing::debug!(glyphs = font.glyph_count(), "label font loaded");
        Ok(self.font.get_or_init(|| font))
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Builds the label as a standing solid.
///
/// The text is fitted into `max_width` x `max_height`, extruded by
/// `thickness`, then stood up so it reads from the -Y side: text width runs
/// along +X, text height along +Z, and the relief grows toward -Y from
/// y = 0. The text box is centered on x = 0 and z = 0.
///
/// Returns `Ok(None)` when no font size fits.
pub fn label_solid(
    font: &Font<'static>,
    text: &str,
    max_width: f64,
    max_height: f64,
    thickness: f64,
) -> MeshResult<Option<Solid>> {
    let Some(size) = fit_font_size(|size| measure_text(font, text, size), max_width, max_height)
    else {
        return Ok(None);
    };

    let outline = text_outline(font, text, size);
    let Some((min, max)) = outline.bounds() else {
        return Ok(None);
    };
    let center = (min + max) / 2.0;
    tracing::debug!(size, width = max.x - min.x, height = max.y - min.y, "label fitted");

    let solid = Primitive::Text { outline, thickness }
        .build()?
        .translated(DVec3::new(-center.x, -center.y, 0.0))
        .rotated_x(90.0);
    Ok(Some(solid))
}

//! Errors surfaced by faces and the font registry.

use thiserror::Error;

use crate::read::ReadError;

/// An error produced while loading, parsing or selecting fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// A glyph fallback was requested from a font with no glyphs at all.
    #[error("font contains no glyphs")]
    NoGlyphs,
    /// A match was requested but the registry holds no font descriptors.
    #[error("no fonts are registered")]
    NoFontAvailable,
    /// The font data could not be parsed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// The font file could not be read from disk.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

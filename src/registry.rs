//! The font registry: descriptors for every installed font, and a scoring
//! matcher over them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::attribute::{Attributes, Style, Weight};
use crate::error::FontError;
use crate::face::Face;
use crate::source::FontSource;
use crate::table_provider::TableProvider;
use crate::tables::name::NameId;
use crate::{FileRef, FontRef};

/// Score added when the requested family does not match a descriptor.
const FAMILY_MISMATCH: u32 = 100_000;
/// Score added for a style mismatch other than italic vs oblique.
const STYLE_MISMATCH: u32 = 10_000;
/// Score added when italic was requested and only oblique is available,
/// or the other way around.
const SLANT_SUBSTITUTION: u32 = 1;

/// A lightweight descriptor for one font discovered on the system.
///
/// Descriptors carry just enough to score a match; the full parse is
/// deferred until a font is actually selected.
#[derive(Debug)]
pub struct KnownFont {
    path: PathBuf,
    index: u32,
    family: String,
    weight: Weight,
    style: Style,
    parsed: Option<Arc<Face>>,
}

impl KnownFont {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The index of the font within its file.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// The parsed face, if some match already instantiated it.
    pub fn parsed(&self) -> Option<&Arc<Face>> {
        self.parsed.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatchKey {
    family: String,
    weight: Weight,
    style: Style,
}

impl MatchKey {
    fn new(family: &str, weight: Weight, style: Style) -> Self {
        MatchKey {
            family: family.to_lowercase(),
            weight,
            style,
        }
    }
}

/// Descriptors for every known font, plus a cache of resolved matches.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: Vec<KnownFont>,
    matched: HashMap<MatchKey, Arc<Face>>,
}

impl FontRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry over every font the source can see.
    ///
    /// Files that fail to parse are skipped with a warning; a single bad
    /// font must not hide the rest of the system.
    pub fn scan(source: &impl FontSource) -> Self {
        let mut registry = Self::new();
        for dir in source.font_directories() {
            for path in source.walk(&dir) {
                if !is_font_path(&path) {
                    continue;
                }
                let result = source
                    .read_all(&path)
                    .map_err(FontError::from)
                    .and_then(|bytes| registry.register_font_bytes(&path, bytes));
                match result {
                    Ok(count) => debug!("registered {count} font(s) from {}", path.display()),
                    Err(error) => warn!("skipping font file {}: {error}", path.display()),
                }
            }
        }
        registry
    }

    /// Read one font file from disk and register every font it contains.
    ///
    /// Returns the number of fonts added.
    pub fn register_font_file(&mut self, path: &Path) -> Result<usize, FontError> {
        let bytes = std::fs::read(path)?;
        self.register_font_bytes(path, bytes)
    }

    /// Register every font in an in-memory font file image.
    ///
    /// Nothing is added if any contained font fails to parse.
    pub fn register_font_bytes(&mut self, path: &Path, bytes: Vec<u8>) -> Result<usize, FontError> {
        let file = FileRef::new(&bytes)?;
        let mut added = Vec::new();
        for (index, font) in file.fonts().enumerate() {
            added.push(describe(path, index as u32, &font?));
        }
        let count = added.len();
        self.fonts.extend(added);
        Ok(count)
    }

    /// The descriptors of every registered font, in registration order.
    pub fn known_fonts(&self) -> &[KnownFont] {
        &self.fonts
    }

    /// Select and parse the best matching font for a request.
    ///
    /// Matching never inspects glyph coverage: the caller is responsible
    /// for asking for a family that contains the characters it needs.
    /// Resolved matches are cached, so identical requests return the same
    /// face.
    pub fn find_best_match(
        &mut self,
        family: &str,
        weight: Weight,
        style: Style,
    ) -> Result<Arc<Face>, FontError> {
        let key = MatchKey::new(family, weight, style);
        if let Some(face) = self.matched.get(&key) {
            return Ok(face.clone());
        }
        let mut best: Option<(usize, u32)> = None;
        for (index, known) in self.fonts.iter().enumerate() {
            let score = score(known, &key.family, weight, style);
            // strict comparison keeps the first of equally scored fonts
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((index, score));
            }
        }
        let Some((index, _)) = best else {
            return Err(FontError::NoFontAvailable);
        };
        let known = &mut self.fonts[index];
        let face = match &known.parsed {
            Some(face) => face.clone(),
            None => {
                let face = Arc::new(Face::load(&known.path, known.index)?);
                known.parsed = Some(face.clone());
                face
            }
        };
        self.matched.insert(key, face.clone());
        Ok(face)
    }

    /// Drop the parsed face for a font, keeping its descriptor.
    ///
    /// A later match re-parses the file. Cached matches that resolved to
    /// the face are dropped with it.
    pub fn release_parsed_font(&mut self, path: &Path, index: u32) {
        for known in &mut self.fonts {
            if known.path == path && known.index == index {
                known.parsed = None;
            }
        }
        self.matched
            .retain(|_, face| face.path() != Some(path) || face.index() != index);
    }
}

/// The additive match score; lower is better, zero is exact.
fn score(known: &KnownFont, family_lower: &str, weight: Weight, style: Style) -> u32 {
    let mut score = 0;
    if known.family.to_lowercase() != family_lower {
        score += FAMILY_MISMATCH;
    }
    score += (weight.value() as i32 - known.weight.value() as i32).unsigned_abs();
    if style != known.style {
        let slant_substitution = matches!(
            (style, known.style),
            (Style::Italic, Style::Oblique) | (Style::Oblique, Style::Italic)
        );
        score += if slant_substitution {
            SLANT_SUBSTITUTION
        } else {
            STYLE_MISMATCH
        };
    }
    score
}

fn describe(path: &Path, index: u32, font: &FontRef) -> KnownFont {
    let name = font.name().ok();
    let string_for = |id: NameId| {
        name.as_ref()
            .and_then(|name| name.string(id).ok())
            .flatten()
    };
    let family = string_for(NameId::TYPOGRAPHIC_FAMILY_NAME)
        .or_else(|| string_for(NameId::FAMILY_NAME))
        .unwrap_or_default();
    let sub_family = string_for(NameId::TYPOGRAPHIC_SUBFAMILY_NAME)
        .or_else(|| string_for(NameId::SUBFAMILY_NAME));
    let attributes = Attributes::new(font, sub_family.as_deref());
    KnownFont {
        path: path.to_path_buf(),
        index,
        family,
        weight: attributes.weight,
        style: attributes.style,
        parsed: None,
    }
}

/// True for paths with one of the recognized font file suffixes.
///
/// The comparison is exact: an upper-cased suffix does not qualify.
pub(crate) fn is_font_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("ttf" | "ttc" | "otf" | "otc")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::simple_font;

    fn registry_with(descriptors: &[(&str, Weight, Style)]) -> FontRegistry {
        let mut registry = FontRegistry::new();
        for (family, weight, style) in descriptors {
            registry.fonts.push(KnownFont {
                path: PathBuf::from(format!("{family}-{}-{:?}.ttf", weight.value(), style)),
                index: 0,
                family: family.to_string(),
                weight: *weight,
                style: *style,
                parsed: None,
            });
        }
        registry
    }

    fn score_for(registry: &FontRegistry, index: usize, family: &str, weight: Weight, style: Style) -> u32 {
        score(&registry.fonts[index], &family.to_lowercase(), weight, style)
    }

    #[test]
    fn scoring_is_additive() {
        let registry = registry_with(&[
            ("Arial", Weight::Normal, Style::Normal),
            ("Arial", Weight::Bold, Style::Italic),
        ]);
        // |500 - 400| + style mismatch
        assert_eq!(
            score_for(&registry, 0, "arial", Weight::Medium, Style::Oblique),
            10_100
        );
        // |500 - 700| + italic for oblique
        assert_eq!(
            score_for(&registry, 1, "arial", Weight::Medium, Style::Oblique),
            201
        );
    }

    #[test]
    fn exact_match_scores_zero() {
        let registry = registry_with(&[("Fjällen", Weight::Bold, Style::Italic)]);
        assert_eq!(
            score_for(&registry, 0, "fjällen", Weight::Bold, Style::Italic),
            0
        );
        assert_eq!(
            score_for(&registry, 0, "other", Weight::Bold, Style::Italic),
            FAMILY_MISMATCH
        );
    }

    #[test]
    fn empty_registry_has_no_match() {
        let mut registry = FontRegistry::new();
        assert!(matches!(
            registry.find_best_match("Arial", Weight::Normal, Style::Normal),
            Err(FontError::NoFontAvailable)
        ));
    }

    #[test]
    fn registered_bytes_are_described() {
        let mut registry = FontRegistry::new();
        let count = registry
            .register_font_bytes(Path::new("demo.ttf"), simple_font())
            .unwrap();
        assert_eq!(count, 1);
        let known = &registry.known_fonts()[0];
        assert_eq!(known.family(), "Demo Sans");
        assert_eq!(known.weight(), Weight::Normal);
        assert_eq!(known.style(), Style::Normal);
        assert!(known.parsed().is_none());
    }

    #[test]
    fn font_path_suffixes_are_case_sensitive() {
        assert!(is_font_path(Path::new("/fonts/a.ttf")));
        assert!(is_font_path(Path::new("/fonts/a.ttc")));
        assert!(is_font_path(Path::new("/fonts/a.otf")));
        assert!(is_font_path(Path::new("/fonts/a.otc")));
        assert!(!is_font_path(Path::new("/fonts/a.TTF")));
        assert!(!is_font_path(Path::new("/fonts/a.woff2")));
        assert!(!is_font_path(Path::new("/fonts/ttf")));
    }
}

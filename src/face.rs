//! A loaded font face: owned bytes, identifying names, and lazily parsed
//! metrics.

use std::cell::OnceCell;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use font_types::GlyphId16;

use crate::attribute::{Attributes, Style, Weight};
use crate::charmap::CharMap;
use crate::error::FontError;
use crate::read::ReadError;
use crate::table_provider::TableProvider;
use crate::tables::name::NameId;
use crate::FontRef;

/// The named baselines a face can position text against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Hanging,
    Middle,
    Alphabetic,
    Bottom,
}

/// Advance width and left side bearing for one glyph, in design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub advance: u16,
    pub side_bearing: i16,
}

/// The codepoints tried, in order, when a requested character has no
/// glyph: replacement character, delete, question mark, space.
const FALLBACK_CHARS: [char; 4] = ['\u{FFFD}', '\u{7F}', '?', ' '];

/// One font from a font file, with its backing bytes.
///
/// Identifying names and classification attributes are extracted when the
/// face is created, because the registry wants them cheaply for every
/// installed font. Everything metric (glyph table, character map, vertical
/// metrics) is parsed once, on the first query that needs it.
pub struct Face {
    data: Arc<Vec<u8>>,
    index: u32,
    path: Option<PathBuf>,
    family: String,
    sub_family: String,
    full_name: Option<String>,
    postscript_name: Option<String>,
    attributes: Attributes,
    metrics: OnceCell<FaceMetrics>,
}

/// The one-shot parsed portion of a face.
struct FaceMetrics {
    units_per_em: u16,
    bbox: [i16; 4],
    ascender: i16,
    descender: i16,
    line_gap: i16,
    italic_angle: f64,
    glyphs: Vec<GlyphMetrics>,
    charmap: CharMap,
}

impl Face {
    /// Create a face from font file bytes.
    ///
    /// `index` selects a font within a collection and must be 0 for
    /// single-font files.
    pub fn from_bytes(data: Arc<Vec<u8>>, index: u32) -> Result<Self, FontError> {
        let font = FontRef::from_index(&data, index)?;
        let family = preferred_string(&font, NameId::TYPOGRAPHIC_FAMILY_NAME, NameId::FAMILY_NAME);
        let sub_family = preferred_string(
            &font,
            NameId::TYPOGRAPHIC_SUBFAMILY_NAME,
            NameId::SUBFAMILY_NAME,
        );
        let full_name = string_for(&font, NameId::FULL_NAME);
        let postscript_name = string_for(&font, NameId::POSTSCRIPT_NAME);
        let attributes = Attributes::new(&font, sub_family.as_deref());
        Ok(Face {
            data,
            index,
            path: None,
            family: family.unwrap_or_default(),
            sub_family: sub_family.unwrap_or_default(),
            full_name,
            postscript_name,
            attributes,
            metrics: OnceCell::new(),
        })
    }

    /// Read a font file from disk and create a face for the font at
    /// `index`.
    pub fn load(path: &Path, index: u32) -> Result<Self, FontError> {
        let data = Arc::new(std::fs::read(path)?);
        let mut face = Self::from_bytes(data, index)?;
        face.path = Some(path.to_path_buf());
        Ok(face)
    }

    /// The path the face was loaded from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The index of this font within its file.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn family_name(&self) -> &str {
        &self.family
    }

    pub fn sub_family_name(&self) -> &str {
        &self.sub_family
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn postscript_name(&self) -> Option<&str> {
        self.postscript_name.as_deref()
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn weight(&self) -> Weight {
        self.attributes.weight
    }

    pub fn style(&self) -> Style {
        self.attributes.style
    }

    pub fn is_monospaced(&self) -> bool {
        self.attributes.monospaced
    }

    /// Design units per em.
    pub fn units_per_em(&self) -> Result<u16, FontError> {
        Ok(self.metrics()?.units_per_em)
    }

    /// The reciprocal of [`units_per_em`](Self::units_per_em), for
    /// scaling design units to ems with a multiply.
    pub fn units_per_em_recip(&self) -> Result<f32, FontError> {
        Ok(1.0 / self.metrics()?.units_per_em as f32)
    }

    /// The union bounding box of all glyphs as `[x_min, y_min, x_max,
    /// y_max]`.
    pub fn bbox(&self) -> Result<[i16; 4], FontError> {
        Ok(self.metrics()?.bbox)
    }

    pub fn ascent(&self) -> Result<i16, FontError> {
        Ok(self.metrics()?.ascender)
    }

    pub fn descent(&self) -> Result<i16, FontError> {
        Ok(self.metrics()?.descender)
    }

    /// The recommended baseline-to-baseline distance:
    /// `ascender - descender + hhea.lineGap`.
    pub fn line_gap(&self) -> Result<i32, FontError> {
        let metrics = self.metrics()?;
        Ok(metrics.ascender as i32 - metrics.descender as i32 + metrics.line_gap as i32)
    }

    /// Italic angle in counter-clockwise degrees from the vertical.
    pub fn italic_angle(&self) -> Result<f64, FontError> {
        Ok(self.metrics()?.italic_angle)
    }

    /// The offset of a named baseline from the alphabetic baseline, in
    /// design units.
    ///
    /// The top, middle and bottom baselines rescale the ascent range to
    /// the em square; the hanging baseline is the ascent itself and the
    /// alphabetic baseline is the origin, so neither depends on that
    /// rescaling.
    pub fn baseline_offset(&self, baseline: Baseline) -> Result<f32, FontError> {
        let metrics = self.metrics()?;
        let ascender = metrics.ascender as f32;
        let descender = metrics.descender as f32;
        let units_per_em = metrics.units_per_em as f32;
        let actual = ascender - descender;
        let rescaled = |value: f32| {
            if actual == 0.0 {
                0.0
            } else {
                value * units_per_em / actual
            }
        };
        Ok(match baseline {
            Baseline::Top => rescaled(ascender),
            Baseline::Hanging => ascender,
            Baseline::Middle => rescaled(0.5 * (ascender + descender)),
            Baseline::Alphabetic => 0.0,
            Baseline::Bottom => rescaled(descender),
        })
    }

    /// The number of glyphs in the font.
    pub fn glyph_count(&self) -> Result<u16, FontError> {
        Ok(self.metrics()?.glyphs.len() as u16)
    }

    /// True if the font maps `c` to a real glyph.
    pub fn has_glyph(&self, c: char) -> Result<bool, FontError> {
        Ok(self.metrics()?.charmap.contains(c as u32))
    }

    /// The glyph for `c`, or the missing glyph (id 0) when unmapped.
    pub fn glyph_index(&self, c: char) -> Result<GlyphId16, FontError> {
        Ok(self
            .metrics()?
            .charmap
            .get(c as u32)
            .unwrap_or(GlyphId16::new(0)))
    }

    /// The glyph for `c`, falling back through replacement characters.
    ///
    /// When `c` is unmapped this tries U+FFFD, U+007F, `?` and space in
    /// turn, and finally settles on the missing glyph. Fails only when the
    /// font has no glyphs at all.
    pub fn glyph_for(&self, c: char) -> Result<GlyphId16, FontError> {
        let metrics = self.metrics()?;
        if metrics.glyphs.is_empty() {
            return Err(FontError::NoGlyphs);
        }
        let glyph = std::iter::once(c)
            .chain(FALLBACK_CHARS)
            .find_map(|candidate| metrics.charmap.get(candidate as u32));
        Ok(glyph.unwrap_or(GlyphId16::new(0)))
    }

    /// The advance width for `c`, in design units.
    ///
    /// Unmapped characters measure as the missing glyph.
    pub fn horizontal_advance(&self, c: char) -> Result<u16, FontError> {
        Ok(self.glyph_metrics(c)?.map(|glyph| glyph.advance).unwrap_or(0))
    }

    /// The left side bearing for `c`, in design units.
    pub fn left_side_bearing(&self, c: char) -> Result<i16, FontError> {
        Ok(self
            .glyph_metrics(c)?
            .map(|glyph| glyph.side_bearing)
            .unwrap_or(0))
    }

    /// The summed advance width of `text`, in design units.
    pub fn measure_text(&self, text: &str) -> Result<u64, FontError> {
        let mut width = 0u64;
        for c in text.chars() {
            width += self.horizontal_advance(c)? as u64;
        }
        Ok(width)
    }

    /// Every codepoint segment covered by the font's character map.
    pub fn char_ranges(&self) -> Result<&[Range<u32>], FontError> {
        Ok(self.metrics()?.charmap.ranges())
    }

    /// The highest mapped codepoint.
    pub fn max_codepoint(&self) -> Result<Option<u32>, FontError> {
        Ok(self.metrics()?.charmap.max_codepoint())
    }

    fn glyph_metrics(&self, c: char) -> Result<Option<GlyphMetrics>, FontError> {
        let metrics = self.metrics()?;
        let glyph = metrics
            .charmap
            .get(c as u32)
            .unwrap_or(GlyphId16::new(0))
            .to_u16();
        Ok(metrics.glyphs.get(glyph as usize).copied())
    }

    /// The parsed metrics, produced on first use.
    fn metrics(&self) -> Result<&FaceMetrics, ReadError> {
        if let Some(metrics) = self.metrics.get() {
            return Ok(metrics);
        }
        let font = FontRef::from_index(&self.data, self.index)?;
        let metrics = FaceMetrics::parse(&font)?;
        Ok(self.metrics.get_or_init(|| metrics))
    }
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("family", &self.family)
            .field("sub_family", &self.sub_family)
            .field("index", &self.index)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl FaceMetrics {
    fn parse(font: &FontRef) -> Result<Self, ReadError> {
        let head = font.head()?;
        let hhea = font.hhea()?;
        let maxp = font.maxp()?;
        let hmtx = font.hmtx()?;
        let post = font.post()?;
        let num_glyphs = maxp.num_glyphs();
        let mut glyphs = Vec::with_capacity(num_glyphs as usize);
        for glyph_id in 0..num_glyphs {
            glyphs.push(GlyphMetrics {
                advance: hmtx.advance(glyph_id).unwrap_or(0),
                side_bearing: hmtx.side_bearing(glyph_id).unwrap_or(0),
            });
        }
        let charmap = CharMap::new(&font.cmap()?.unicode_subtable()?, num_glyphs)?;
        Ok(FaceMetrics {
            units_per_em: head.units_per_em(),
            bbox: [head.x_min(), head.y_min(), head.x_max(), head.y_max()],
            ascender: hhea.ascender().to_i16(),
            descender: hhea.descender().to_i16(),
            line_gap: hhea.line_gap().to_i16(),
            italic_angle: post.italic_angle().to_f64(),
            glyphs,
            charmap,
        })
    }
}

fn string_for(font: &FontRef, id: NameId) -> Option<String> {
    font.name().ok()?.string(id).ok()?
}

fn preferred_string(font: &FontRef, primary: NameId, fallback: NameId) -> Option<String> {
    string_for(font, primary).or_else(|| string_for(font, fallback))
}

//! Mapping of codepoints to glyph identifiers, materialized from `cmap`.

use std::collections::HashMap;
use std::ops::Range;

use font_types::GlyphId16;

use crate::read::ReadError;
use crate::tables::cmap::Cmap4;

/// An owned character map.
///
/// A [`Cmap4`](crate::tables::cmap::Cmap4) borrows the file bytes, which
/// makes it unsuitable for a long-lived face; this type walks every
/// segment once and keeps the results. Every mapped glyph id is validated
/// against the font's glyph count, and codepoints that resolve to the
/// missing glyph are left out, so `contains` answers "does this font
/// really render that character".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CharMap {
    map: HashMap<u32, u16>,
    ranges: Vec<Range<u32>>,
    max_codepoint: Option<u32>,
}

impl CharMap {
    /// Materialize the mapping of a format 4 subtable.
    ///
    /// Fails with [`ReadError::MalformedCmap`] if any segment maps a
    /// codepoint to a glyph id at or past `num_glyphs`.
    pub fn new(subtable: &Cmap4, num_glyphs: u16) -> Result<Self, ReadError> {
        let mut map = HashMap::new();
        let mut ranges = Vec::with_capacity(subtable.seg_count() as usize);
        let mut max_codepoint = None;
        for segment in 0..subtable.seg_count() {
            let range = subtable.code_range(segment)?;
            for codepoint in range.clone() {
                if let Some(glyph) = subtable.glyph_id(segment, codepoint as u16)? {
                    if glyph >= num_glyphs {
                        return Err(ReadError::MalformedCmap("glyph id out of range"));
                    }
                    map.insert(codepoint, glyph);
                    max_codepoint = max_codepoint.max(Some(codepoint));
                }
            }
            ranges.push(range);
        }
        Ok(CharMap {
            map,
            ranges,
            max_codepoint,
        })
    }

    /// The glyph for a codepoint, or `None` if the font does not map it.
    pub fn get(&self, codepoint: u32) -> Option<GlyphId16> {
        self.map.get(&codepoint).copied().map(GlyphId16::new)
    }

    /// True if the codepoint maps to a real (non-missing) glyph.
    pub fn contains(&self, codepoint: u32) -> bool {
        self.map.contains_key(&codepoint)
    }

    /// The number of mapped codepoints.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every segment the subtable covered, mapped or not.
    pub fn ranges(&self) -> &[Range<u32>] {
        &self.ranges
    }

    /// The highest mapped codepoint.
    pub fn max_codepoint(&self) -> Option<u32> {
        self.max_codepoint
    }
}

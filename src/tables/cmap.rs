//! The [cmap (Character to Glyph Index Mapping)](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap) table

use std::ops::Range;

use font_types::Tag;

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError, TopLevelTable};

/// The Windows platform id.
const PLATFORM_ID_WINDOWS: u16 = 3;

/// The character to glyph index mapping table.
///
/// This is a list of encoding records, each pointing at a subtable for one
/// platform/encoding pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    num_tables: u16,
}

/// One platform/encoding entry in the `cmap` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Byte offset from the beginning of the `cmap` table to the subtable.
    pub subtable_offset: u32,
}

impl EncodingRecord {
    /// True for the Windows Unicode encodings (symbol, BMP, full
    /// repertoire).
    pub fn is_windows_unicode(&self) -> bool {
        self.platform_id == PLATFORM_ID_WINDOWS && matches!(self.encoding_id, 0 | 1 | 4)
    }
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.skip(2)?; // version
        let num_tables = cursor.read::<u16>()?;
        data.check_in_bounds(4 + num_tables as usize * 8)?;
        Ok(Cmap { data, num_tables })
    }
}

impl<'a> Cmap<'a> {
    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn encoding_record(&self, index: u16) -> Result<EncodingRecord, ReadError> {
        if index >= self.num_tables {
            return Err(ReadError::OutOfBounds);
        }
        let pos = 4 + index as usize * 8;
        Ok(EncodingRecord {
            platform_id: self.data.read_at(pos)?,
            encoding_id: self.data.read_at(pos + 2)?,
            subtable_offset: self.data.read_at(pos + 4)?,
        })
    }

    pub fn encoding_records(&self) -> impl Iterator<Item = EncodingRecord> + 'a {
        let copy = *self;
        (0..self.num_tables).filter_map(move |index| copy.encoding_record(index).ok())
    }

    /// The subtable for the first Windows Unicode encoding record.
    ///
    /// Record order decides: a matching record is used even if a later one
    /// would also qualify. The subtable must be format 4.
    pub fn unicode_subtable(&self) -> Result<Cmap4<'a>, ReadError> {
        let record = self
            .encoding_records()
            .find(EncodingRecord::is_windows_unicode)
            .ok_or(ReadError::MalformedCmap("no Windows Unicode encoding record"))?;
        let data = self
            .data
            .split_off(record.subtable_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Cmap4::read(data)
    }
}

/// A [format 4](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
/// cmap subtable: segment mapping to delta values.
///
/// The table stores four parallel `seg_count` arrays (end codes, start
/// codes, deltas, range offsets) followed by a glyph id array that the
/// range offsets point into. A nonzero `idRangeOffset` is a byte offset
/// from its own position in the file, so lookups here compute an absolute
/// byte address anchored at the start of the range offset array and read
/// a big-endian `u16` there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmap4<'a> {
    data: FontData<'a>,
    seg_count: u16,
}

/// Byte offset of the `endCode` array within a format 4 subtable.
const END_CODES: usize = 14;

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format = cursor.read::<u16>()?;
        if format != 4 {
            return Err(ReadError::UnsupportedCmapFormat(format));
        }
        cursor.skip(4)?; // length, language
        let seg_count_x2 = cursor.read::<u16>()?;
        if seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedCmap("segCountX2 must be even"));
        }
        let seg_count = seg_count_x2 / 2;
        cursor.skip(6)?; // searchRange, entrySelector, rangeShift
        // the four parallel arrays plus the reserved pad must be present;
        // glyph id array reads are bounds-checked individually
        data.check_in_bounds(END_CODES + seg_count as usize * 8 + 2)?;
        Ok(Cmap4 { data, seg_count })
    }
}

impl<'a> Cmap4<'a> {
    pub fn seg_count(&self) -> u16 {
        self.seg_count
    }

    fn start_codes(&self) -> usize {
        // endCode array, then the reserved pad
        END_CODES + self.seg_count as usize * 2 + 2
    }

    fn id_deltas(&self) -> usize {
        self.start_codes() + self.seg_count as usize * 2
    }

    /// Offset of the `idRangeOffset` array: the anchor for the pointer
    /// arithmetic of nonzero range offsets.
    fn range_offset_anchor(&self) -> usize {
        self.id_deltas() + self.seg_count as usize * 2
    }

    pub fn end_code(&self, segment: u16) -> Result<u16, ReadError> {
        self.segment_entry(END_CODES, segment)
    }

    pub fn start_code(&self, segment: u16) -> Result<u16, ReadError> {
        self.segment_entry(self.start_codes(), segment)
    }

    pub fn id_delta(&self, segment: u16) -> Result<i16, ReadError> {
        if segment >= self.seg_count {
            return Err(ReadError::OutOfBounds);
        }
        self.data
            .read_at(self.id_deltas() + segment as usize * 2)
    }

    pub fn id_range_offset(&self, segment: u16) -> Result<u16, ReadError> {
        self.segment_entry(self.range_offset_anchor(), segment)
    }

    fn segment_entry(&self, array_start: usize, segment: u16) -> Result<u16, ReadError> {
        if segment >= self.seg_count {
            return Err(ReadError::OutOfBounds);
        }
        self.data.read_at(array_start + segment as usize * 2)
    }

    /// The codepoints covered by a segment, as a half-open range.
    ///
    /// The stored bounds are inclusive, so the end is `endCode + 1`;
    /// widening to `u32` keeps the `0xFFFF` sentinel segment from
    /// overflowing.
    pub fn code_range(&self, segment: u16) -> Result<Range<u32>, ReadError> {
        let start = self.start_code(segment)? as u32;
        let end = self.end_code(segment)? as u32;
        Ok(start..end + 1)
    }

    /// Maps a codepoint to a glyph id, if the subtable maps it to a
    /// glyph other than the missing glyph.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Result<Option<u16>, ReadError> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return Ok(None);
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.seg_count;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if codepoint < self.start_code(mid)? {
                hi = mid;
            } else if codepoint > self.end_code(mid)? {
                lo = mid + 1;
            } else {
                return self.glyph_id(mid, codepoint);
            }
        }
        Ok(None)
    }

    /// Does the final phase of glyph id lookup for a codepoint known to
    /// fall in `segment`.
    ///
    /// Returns `None` when the codepoint resolves to the missing glyph.
    pub fn glyph_id(&self, segment: u16, codepoint: u16) -> Result<Option<u16>, ReadError> {
        let start = self.start_code(segment)?;
        let Some(offset_in_segment) = codepoint.checked_sub(start) else {
            return Ok(None);
        };
        let delta = self.id_delta(segment)?;
        let range_offset = self.id_range_offset(segment)?;
        if range_offset == 0 {
            return Ok(nonzero(codepoint.wrapping_add(delta as u16)));
        }
        if range_offset % 2 != 0 {
            return Err(ReadError::MalformedCmap("idRangeOffset must be even"));
        }
        let address = self.range_offset_anchor()
            + segment as usize * 2
            + offset_in_segment as usize * 2
            + range_offset as usize;
        let glyph = self.data.read_at::<u16>(address)?;
        if glyph == 0 {
            return Ok(None);
        }
        Ok(nonzero(glyph.wrapping_add(delta as u16)))
    }
}

fn nonzero(glyph: u16) -> Option<u16> {
    (glyph != 0).then_some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{cmap_table, cmap4_subtable, CmapSegment};

    fn segment(start: u16, end: u16, delta: i16, range_offset: u16) -> CmapSegment {
        CmapSegment {
            start,
            end,
            id_delta: delta,
            id_range_offset: range_offset,
        }
    }

    #[test]
    fn delta_pass_through() {
        let bytes = cmap4_subtable(&[segment(0x41, 0x42, 0, 0), segment(0xFFFF, 0xFFFF, 1, 0)], &[]);
        let cmap4 = Cmap4::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x41u32).unwrap(), Some(0x41));
        assert_eq!(cmap4.map_codepoint(0x42u32).unwrap(), Some(0x42));
        assert_eq!(cmap4.map_codepoint(0x43u32).unwrap(), None);
        // the sentinel segment maps 0xFFFF to glyph 0: missing
        assert_eq!(cmap4.map_codepoint(0xFFFFu32).unwrap(), None);
    }

    #[test]
    fn delta_offsets_glyph_ids() {
        let bytes = cmap4_subtable(&[segment(0x41, 0x42, -0x40, 0), segment(0xFFFF, 0xFFFF, 1, 0)], &[]);
        let cmap4 = Cmap4::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x41u32).unwrap(), Some(1));
        assert_eq!(cmap4.map_codepoint(0x42u32).unwrap(), Some(2));
    }

    #[test]
    fn range_offset_indirection() {
        // one mapped segment with idRangeOffset pointing at the glyph id
        // array right behind the range offset array: for segment 0 of 2,
        // the offset from &idRangeOffset[0] to the array is 4 bytes.
        let bytes = cmap4_subtable(
            &[segment(0x20, 0x22, 0, 4), segment(0xFFFF, 0xFFFF, 1, 0)],
            &[90, 0, 91],
        );
        let cmap4 = Cmap4::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x20u32).unwrap(), Some(90));
        // an explicit zero in the glyph id array means missing
        assert_eq!(cmap4.map_codepoint(0x21u32).unwrap(), None);
        assert_eq!(cmap4.map_codepoint(0x22u32).unwrap(), Some(91));
    }

    #[test]
    fn odd_range_offset_is_rejected() {
        let bytes = cmap4_subtable(&[segment(0x20, 0x20, 0, 3), segment(0xFFFF, 0xFFFF, 1, 0)], &[7]);
        let cmap4 = Cmap4::read(FontData::new(&bytes)).unwrap();
        assert_eq!(
            cmap4.map_codepoint(0x20u32),
            Err(ReadError::MalformedCmap("idRangeOffset must be even"))
        );
    }

    #[test]
    fn odd_seg_count_x2_is_rejected() {
        let mut bytes = cmap4_subtable(&[segment(0x41, 0x41, 0, 0)], &[]);
        bytes[7] = 3; // segCountX2
        assert_eq!(
            Cmap4::read(FontData::new(&bytes)),
            Err(ReadError::MalformedCmap("segCountX2 must be even"))
        );
    }

    #[test]
    fn non_format_4_is_rejected() {
        let bytes = [0u8, 12, 0, 0, 0, 0, 0, 16];
        assert_eq!(
            Cmap4::read(FontData::new(&bytes)),
            Err(ReadError::UnsupportedCmapFormat(12))
        );
    }

    #[test]
    fn first_windows_unicode_record_wins() {
        let first = cmap4_subtable(&[segment(0x41, 0x41, 0, 0), segment(0xFFFF, 0xFFFF, 1, 0)], &[]);
        let second = cmap4_subtable(&[segment(0x41, 0x41, 9, 0), segment(0xFFFF, 0xFFFF, 1, 0)], &[]);
        let bytes = cmap_table(&[(1, 0, first.clone()), (3, 1, first), (3, 4, second)]);
        let cmap = Cmap::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cmap.num_tables(), 3);
        let cmap4 = cmap.unicode_subtable().unwrap();
        assert_eq!(cmap4.map_codepoint(0x41u32).unwrap(), Some(0x41));
    }

    #[test]
    fn no_windows_unicode_record() {
        let subtable = cmap4_subtable(&[segment(0xFFFF, 0xFFFF, 1, 0)], &[]);
        let bytes = cmap_table(&[(1, 0, subtable.clone()), (3, 2, subtable)]);
        let cmap = Cmap::read(FontData::new(&bytes)).unwrap();
        assert_eq!(
            cmap.unicode_subtable(),
            Err(ReadError::MalformedCmap("no Windows Unicode encoding record"))
        );
    }
}

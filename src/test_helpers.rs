//! Helpers for building font binaries in tests.
//!
//! Real font files are too unwieldy to check invariants against, so the
//! tests assemble minimal fonts field by field. Everything here writes
//! big-endian, matching the wire format.

use font_types::{NameId, Tag};

/// A growable big-endian byte buffer.
#[derive(Debug, Default, Clone)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_u8(mut self, value: u8) -> Self {
        self.data.push(value);
        self
    }

    pub fn push_u16(mut self, value: u16) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn push_i16(mut self, value: i16) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn push_u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn push_i32(mut self, value: i32) -> Self {
        self.data.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn push_tag(mut self, tag: Tag) -> Self {
        self.data.extend_from_slice(&tag.to_be_bytes());
        self
    }

    pub fn extend(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn bytes(self) -> Vec<u8> {
        self.data
    }
}

/// A `head` table.
pub fn head_table(units_per_em: u16, bbox: [i16; 4], mac_style: u16) -> Vec<u8> {
    BeBuffer::new()
        .push_u16(1) // majorVersion
        .push_u16(0) // minorVersion
        .push_u32(0x00010000) // fontRevision
        .push_u32(0) // checksumAdjustment
        .push_u32(0x5F0F3CF5) // magicNumber
        .push_u16(0) // flags
        .push_u16(units_per_em)
        .extend(&[0; 16]) // created, modified
        .push_i16(bbox[0])
        .push_i16(bbox[1])
        .push_i16(bbox[2])
        .push_i16(bbox[3])
        .push_u16(mac_style)
        .push_u16(8) // lowestRecPPEM
        .push_i16(2) // fontDirectionHint
        .push_i16(0) // indexToLocFormat
        .push_i16(0) // glyphDataFormat
        .bytes()
}

/// An `hhea` table.
pub fn hhea_table(
    ascender: i16,
    descender: i16,
    line_gap: i16,
    number_of_h_metrics: u16,
) -> Vec<u8> {
    BeBuffer::new()
        .push_u16(1) // majorVersion
        .push_u16(0) // minorVersion
        .push_i16(ascender)
        .push_i16(descender)
        .push_i16(line_gap)
        .push_u16(0) // advanceWidthMax
        .push_i16(0) // minLeftSideBearing
        .push_i16(0) // minRightSideBearing
        .push_i16(0) // xMaxExtent
        .push_i16(1) // caretSlopeRise
        .push_i16(0) // caretSlopeRun
        .push_i16(0) // caretOffset
        .extend(&[0; 8]) // reserved
        .push_i16(0) // metricDataFormat
        .push_u16(number_of_h_metrics)
        .bytes()
}

/// A `maxp` table.
pub fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push_u32(0x00005000) // version 0.5
        .push_u16(num_glyphs)
        .bytes()
}

/// An `hmtx` table from long metrics and trailing bearing-only entries.
pub fn hmtx_table(long_metrics: &[(u16, i16)], tail_bearings: &[i16]) -> Vec<u8> {
    let mut buffer = BeBuffer::new();
    for (advance, side_bearing) in long_metrics {
        buffer = buffer.push_u16(*advance).push_i16(*side_bearing);
    }
    for side_bearing in tail_bearings {
        buffer = buffer.push_i16(*side_bearing);
    }
    buffer.bytes()
}

/// A `post` table. The italic angle is in raw 16.16 bits.
pub fn post_table(italic_angle: i32, is_fixed_pitch: u32) -> Vec<u8> {
    BeBuffer::new()
        .push_u32(0x00030000) // version 3.0
        .push_i32(italic_angle)
        .push_i16(-75) // underlinePosition
        .push_i16(50) // underlineThickness
        .push_u32(is_fixed_pitch)
        .extend(&[0; 16]) // memory usage fields
        .bytes()
}

/// An `OS/2` table.
pub fn os2_table(us_weight_class: u16, panose: [u8; 10], fs_selection: u16) -> Vec<u8> {
    BeBuffer::new()
        .push_u16(4) // version
        .push_i16(500) // xAvgCharWidth
        .push_u16(us_weight_class)
        .push_u16(5) // usWidthClass
        .push_u16(0) // fsType
        .extend(&[0; 20]) // subscript/superscript/strikeout fields
        .push_i16(0) // sFamilyClass
        .extend(&panose)
        .extend(&[0; 16]) // ulUnicodeRange1..4
        .extend(b"TEST") // achVendID
        .push_u16(fs_selection)
        .push_u16(0x20) // usFirstCharIndex
        .push_u16(0x7E) // usLastCharIndex
        .push_i16(800) // sTypoAscender
        .push_i16(-200) // sTypoDescender
        .push_i16(90) // sTypoLineGap
        .push_u16(1000) // usWinAscent
        .push_u16(200) // usWinDescent
        .bytes()
}

/// One record for [`name_table`].
#[derive(Debug, Clone)]
pub struct NameEntry {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub name_id: NameId,
    pub bytes: Vec<u8>,
}

impl NameEntry {
    /// A Windows platform UTF-16BE entry.
    pub fn utf16(name_id: NameId, value: &str) -> Self {
        let bytes = value
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect();
        NameEntry {
            platform_id: 3,
            encoding_id: 1,
            name_id,
            bytes,
        }
    }

    /// An entry with explicit platform, encoding and payload.
    pub fn raw(platform_id: u16, encoding_id: u16, name_id: NameId, bytes: Vec<u8>) -> Self {
        NameEntry {
            platform_id,
            encoding_id,
            name_id,
            bytes,
        }
    }
}

/// A `name` table with the given records, in order.
pub fn name_table(entries: &[NameEntry]) -> Vec<u8> {
    let storage_offset = 6 + entries.len() * 12;
    let mut buffer = BeBuffer::new()
        .push_u16(0) // format
        .push_u16(entries.len() as u16)
        .push_u16(storage_offset as u16);
    let mut string_offset = 0u16;
    for entry in entries {
        buffer = buffer
            .push_u16(entry.platform_id)
            .push_u16(entry.encoding_id)
            .push_u16(0x0409) // languageID
            .push_u16(entry.name_id.to_u16())
            .push_u16(entry.bytes.len() as u16)
            .push_u16(string_offset);
        string_offset += entry.bytes.len() as u16;
    }
    for entry in entries {
        buffer = buffer.extend(&entry.bytes);
    }
    buffer.bytes()
}

/// One segment for [`cmap4_subtable`].
#[derive(Debug, Clone, Copy)]
pub struct CmapSegment {
    pub start: u16,
    pub end: u16,
    pub id_delta: i16,
    pub id_range_offset: u16,
}

/// A format 4 cmap subtable.
///
/// The binary-search helper fields are left zero; readers derive segment
/// counts from `segCountX2` alone.
pub fn cmap4_subtable(segments: &[CmapSegment], glyph_ids: &[u16]) -> Vec<u8> {
    let seg_count = segments.len() as u16;
    let length = 16 + segments.len() * 8 + glyph_ids.len() * 2;
    let mut buffer = BeBuffer::new()
        .push_u16(4) // format
        .push_u16(length as u16)
        .push_u16(0) // language
        .push_u16(seg_count * 2)
        .push_u16(0) // searchRange, unused
        .push_u16(0) // entrySelector, unused
        .push_u16(0); // rangeShift, unused
    for segment in segments {
        buffer = buffer.push_u16(segment.end);
    }
    buffer = buffer.push_u16(0); // reservedPad
    for segment in segments {
        buffer = buffer.push_u16(segment.start);
    }
    for segment in segments {
        buffer = buffer.push_i16(segment.id_delta);
    }
    for segment in segments {
        buffer = buffer.push_u16(segment.id_range_offset);
    }
    for glyph_id in glyph_ids {
        buffer = buffer.push_u16(*glyph_id);
    }
    buffer.bytes()
}

/// A `cmap` table from `(platform_id, encoding_id, subtable)` entries.
pub fn cmap_table(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut buffer = BeBuffer::new()
        .push_u16(0) // version
        .push_u16(subtables.len() as u16);
    let mut offset = 4 + subtables.len() * 8;
    for (platform_id, encoding_id, subtable) in subtables {
        buffer = buffer
            .push_u16(*platform_id)
            .push_u16(*encoding_id)
            .push_u32(offset as u32);
        offset += subtable.len();
    }
    for (_, _, subtable) in subtables {
        buffer = buffer.extend(subtable);
    }
    buffer.bytes()
}

/// A single-font file from `(tag, table)` pairs.
///
/// Records are sorted by tag, as the table directory's binary search
/// requires.
pub fn build_font(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    let mut file = BeBuffer::new().push_u32(0x00010000);
    file = push_directory(file, tables, 12 + tables.len() * 16);
    for (_, table) in sorted_tables(tables) {
        file = file.extend(table);
    }
    file.bytes()
}

/// A `ttcf` collection file containing each set of tables as one font.
///
/// Tables are not shared between the entries; each font gets its own
/// directory and payload, with offsets measured from the start of the
/// file as the format requires.
pub fn build_collection(fonts: &[&[(Tag, Vec<u8>)]]) -> Vec<u8> {
    let header_len = 12 + fonts.len() * 4;
    let mut directory_offsets = Vec::with_capacity(fonts.len());
    let mut pos = header_len;
    for tables in fonts {
        directory_offsets.push(pos as u32);
        pos += 12 + tables.len() * 16;
    }
    let mut buffer = BeBuffer::new()
        .push_tag(Tag::new(b"ttcf"))
        .push_u32(0x00010000) // version
        .push_u32(fonts.len() as u32);
    for offset in &directory_offsets {
        buffer = buffer.push_u32(*offset);
    }
    let mut payload_pos = pos;
    for tables in fonts {
        buffer = buffer.push_u32(0x00010000);
        buffer = push_directory(buffer, tables, payload_pos);
        payload_pos += tables.iter().map(|(_, table)| table.len()).sum::<usize>();
    }
    for tables in fonts {
        for (_, table) in sorted_tables(tables) {
            buffer = buffer.extend(table);
        }
    }
    buffer.bytes()
}

fn sorted_tables<'a>(tables: &'a [(Tag, Vec<u8>)]) -> Vec<&'a (Tag, Vec<u8>)> {
    let mut sorted: Vec<_> = tables.iter().collect();
    sorted.sort_by_key(|(tag, _)| *tag);
    sorted
}

fn push_directory(mut buffer: BeBuffer, tables: &[(Tag, Vec<u8>)], payload_start: usize) -> BeBuffer {
    buffer = buffer
        .push_u16(tables.len() as u16)
        .push_u16(0) // searchRange, unused
        .push_u16(0) // entrySelector, unused
        .push_u16(0); // rangeShift, unused
    let mut offset = payload_start;
    for (tag, table) in sorted_tables(tables) {
        buffer = buffer
            .push_tag(*tag)
            .push_u32(0) // checksum
            .push_u32(offset as u32)
            .push_u32(table.len() as u32);
        offset += table.len();
    }
    buffer
}

/// The table set for [`simple_font`], with adjustable identity.
///
/// Five glyphs: missing, space, and A through C. Space maps to glyph 1
/// and A..C to glyphs 2..=4; C sits in the bearing-only tail of `hmtx`.
pub fn simple_font_tables(
    family: &str,
    sub_family: &str,
    us_weight_class: u16,
    fs_selection: u16,
) -> Vec<(Tag, Vec<u8>)> {
    let cmap = cmap_table(&[(
        3,
        1,
        cmap4_subtable(
            &[
                CmapSegment {
                    start: 0x20,
                    end: 0x20,
                    id_delta: 1 - 0x20,
                    id_range_offset: 0,
                },
                CmapSegment {
                    start: 0x41,
                    end: 0x43,
                    id_delta: 2 - 0x41,
                    id_range_offset: 0,
                },
                CmapSegment {
                    start: 0xFFFF,
                    end: 0xFFFF,
                    id_delta: 1,
                    id_range_offset: 0,
                },
            ],
            &[],
        ),
    )]);
    let name = name_table(&[
        NameEntry::utf16(NameId::FAMILY_NAME, family),
        NameEntry::utf16(NameId::SUBFAMILY_NAME, sub_family),
        NameEntry::utf16(NameId::FULL_NAME, &format!("{family} {sub_family}")),
        NameEntry::utf16(NameId::POSTSCRIPT_NAME, &format!("{family}-{sub_family}").replace(' ', "")),
    ]);
    vec![
        (Tag::new(b"head"), head_table(1000, [-50, -200, 950, 800], 0)),
        (Tag::new(b"hhea"), hhea_table(800, -200, 90, 4)),
        (Tag::new(b"maxp"), maxp_table(5)),
        (
            Tag::new(b"hmtx"),
            hmtx_table(&[(500, 0), (250, 0), (600, 50), (620, 40)], &[30]),
        ),
        (Tag::new(b"post"), post_table(0, 0)),
        (
            Tag::new(b"OS/2"),
            os2_table(us_weight_class, [2, 11, 6, 3, 0, 0, 0, 0, 0, 0], fs_selection),
        ),
        (Tag::new(b"name"), name),
        (Tag::new(b"cmap"), cmap),
    ]
}

/// A complete well-formed single font: "Demo Sans Regular".
pub fn simple_font() -> Vec<u8> {
    build_font(&simple_font_tables("Demo Sans", "Regular", 400, 0x0040))
}

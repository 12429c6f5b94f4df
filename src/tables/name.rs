//! The [name (Naming)](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table

use font_types::Tag;

pub use font_types::NameId;

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError, TopLevelTable};

const RECORD_LEN: usize = 12;

/// The naming table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Name<'a> {
    data: FontData<'a>,
    count: u16,
    storage_offset: u16,
}

/// A single entry in the naming table, pointing into the storage area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: NameId,
    pub length: u16,
    pub string_offset: u16,
}

impl TopLevelTable for Name<'_> {
    const TAG: Tag = Tag::new(b"name");
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format = cursor.read::<u16>()?;
        if format > 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let count = cursor.read::<u16>()?;
        let storage_offset = cursor.read::<u16>()?;
        data.check_in_bounds(6 + count as usize * RECORD_LEN)?;
        Ok(Name {
            data,
            count,
            storage_offset,
        })
    }
}

impl<'a> Name<'a> {
    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn record(&self, index: u16) -> Result<NameRecord, ReadError> {
        if index >= self.count {
            return Err(ReadError::OutOfBounds);
        }
        let pos = 6 + index as usize * RECORD_LEN;
        Ok(NameRecord {
            platform_id: self.data.read_at(pos)?,
            encoding_id: self.data.read_at(pos + 2)?,
            language_id: self.data.read_at(pos + 4)?,
            name_id: self.data.read_at(pos + 6)?,
            length: self.data.read_at(pos + 8)?,
            string_offset: self.data.read_at(pos + 10)?,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = NameRecord> + 'a {
        let copy = *self;
        (0..self.count).filter_map(move |index| copy.record(index).ok())
    }

    /// The string for the first record carrying the given id, or `None`
    /// if no record does.
    pub fn string(&self, id: NameId) -> Result<Option<String>, ReadError> {
        for record in self.records() {
            if record.name_id == id {
                return self.decode(&record).map(Some);
            }
        }
        Ok(None)
    }

    /// Decode a record's bytes from the storage area.
    pub fn decode(&self, record: &NameRecord) -> Result<String, ReadError> {
        let start = self.storage_offset as usize + record.string_offset as usize;
        let bytes = self
            .data
            .slice(start..start + record.length as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let bytes = bytes.as_bytes();
        match Encoding::new(record.platform_id, record.encoding_id) {
            Encoding::MacRoman => Ok(bytes.iter().map(|byte| MacRomanMapping.decode(*byte)).collect()),
            Encoding::Utf16Be => {
                if record.length % 2 != 0 {
                    return Err(ReadError::MalformedName(
                        "UTF-16 string length must be even",
                    ));
                }
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                Ok(char::decode_utf16(units)
                    .map(|result| result.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect())
            }
        }
    }
}

/// The character encoding used by a name record.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
}

impl Encoding {
    /// Determine the encoding from the platform and encoding id.
    ///
    /// Only the Macintosh platform with the Roman encoding is single-byte;
    /// everything else stores UTF-16BE.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (1, 0) => Encoding::MacRoman,
            _ => Encoding::Utf16Be,
        }
    }
}

/// A helper for decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;

    /// Convert from a mac-roman encoded byte to a `char`.
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            raw as char
        } else {
            let idx = raw - Self::START_REMAP;
            char::from_u32(MAC_ROMAN_DECODE[idx as usize] as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    }
}

/// A lookup table for the Mac Roman encoding, matching the values
/// 128..=255 to specific unicode values.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

//! The [hhea (Horizontal Header)](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table

use font_types::{FWord, Tag};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError, TopLevelTable};

/// The horizontal header table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hhea {
    ascender: FWord,
    descender: FWord,
    line_gap: FWord,
    number_of_h_metrics: u16,
}

impl TopLevelTable for Hhea {
    const TAG: Tag = Tag::new(b"hhea");
}

impl<'a> FontRead<'a> for Hhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.skip(4)?; // majorVersion, minorVersion
        let ascender = cursor.read::<FWord>()?;
        let descender = cursor.read::<FWord>()?;
        let line_gap = cursor.read::<FWord>()?;
        // advanceWidthMax, min bearings, xMaxExtent, caret slope/offset,
        // four reserved fields
        cursor.skip(22)?;
        let metric_data_format = cursor.read::<i16>()?;
        if metric_data_format != 0 {
            return Err(ReadError::InvalidFormat(metric_data_format as i64));
        }
        let number_of_h_metrics = cursor.read::<u16>()?;
        Ok(Hhea {
            ascender,
            descender,
            line_gap,
            number_of_h_metrics,
        })
    }
}

impl Hhea {
    /// Distance from baseline to the highest ascender, in design units.
    pub fn ascender(&self) -> FWord {
        self.ascender
    }

    /// Distance from baseline to the lowest descender; conventionally
    /// negative.
    pub fn descender(&self) -> FWord {
        self.descender
    }

    pub fn line_gap(&self) -> FWord {
        self.line_gap
    }

    /// Number of long metric entries in `hmtx`.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::hhea_table;

    #[test]
    fn parse_fields() {
        let bytes = hhea_table(1500, -500, 90, 4);
        let hhea = Hhea::read(FontData::new(&bytes)).unwrap();
        assert_eq!(hhea.ascender().to_i16(), 1500);
        assert_eq!(hhea.descender().to_i16(), -500);
        assert_eq!(hhea.line_gap().to_i16(), 90);
        assert_eq!(hhea.number_of_h_metrics(), 4);
    }

    #[test]
    fn nonzero_metric_data_format() {
        let mut bytes = hhea_table(1500, -500, 90, 4);
        bytes[33] = 1; // metricDataFormat lives at offset 32
        assert_eq!(
            Hhea::read(FontData::new(&bytes)),
            Err(ReadError::InvalidFormat(1))
        );
    }
}

//! The [maxp (Maximum Profile)](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table

use font_types::Tag;

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError, TopLevelTable};

/// The maximum profile table.
///
/// Only the glyph count is of interest here; the remainder of the table
/// describes limits for the glyph interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maxp {
    num_glyphs: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.skip(4)?; // version
        let num_glyphs = cursor.read::<u16>()?;
        Ok(Maxp { num_glyphs })
    }
}

impl Maxp {
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }
}

//! The [post (PostScript)](https://learn.microsoft.com/en-us/typography/opentype/spec/post) table

use font_types::{Fixed, Tag};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError, TopLevelTable};

/// The PostScript table.
///
/// Glyph names (versions 1.0/2.0) are not read; only the header fields
/// used for slant and spacing classification are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Post {
    italic_angle: Fixed,
    is_fixed_pitch: u32,
}

impl TopLevelTable for Post {
    const TAG: Tag = Tag::new(b"post");
}

impl<'a> FontRead<'a> for Post {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.skip(4)?; // version
        let italic_angle = cursor.read::<Fixed>()?;
        cursor.skip(4)?; // underlinePosition, underlineThickness
        let is_fixed_pitch = cursor.read::<u32>()?;
        Ok(Post {
            italic_angle,
            is_fixed_pitch,
        })
    }
}

impl Post {
    /// Italic angle in counter-clockwise degrees from the vertical.
    pub fn italic_angle(&self) -> Fixed {
        self.italic_angle
    }

    /// Nonzero if the font is not proportionally spaced.
    pub fn is_fixed_pitch(&self) -> u32 {
        self.is_fixed_pitch
    }
}

//! The [hmtx (Horizontal Metrics)](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use font_types::Tag;

use crate::font_data::FontData;
use crate::read::{FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};

/// An advance width paired with a left side bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongMetric {
    /// Advance width, in design units.
    pub advance: u16,
    /// Left side bearing, in design units.
    pub side_bearing: i16,
}

/// The horizontal metrics table.
///
/// The table is two arrays: `number_of_h_metrics` long metrics followed by
/// bearing-only entries for the remaining glyphs, which all share the last
/// long entry's advance. Both lengths come from sibling tables, so this
/// type is constructed with `(number_of_h_metrics, num_glyphs)` args,
/// usually via [`TableProvider::hmtx`](crate::TableProvider::hmtx).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hmtx<'a> {
    data: FontData<'a>,
    number_of_h_metrics: u16,
    num_glyphs: u16,
}

impl TopLevelTable for Hmtx<'_> {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl ReadArgs for Hmtx<'_> {
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for Hmtx<'a> {
    fn read_with_args(data: FontData<'a>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        let long_len = number_of_h_metrics as usize * 4;
        let tail_len = num_glyphs.saturating_sub(number_of_h_metrics) as usize * 2;
        data.check_in_bounds(long_len + tail_len)?;
        Ok(Hmtx {
            data,
            number_of_h_metrics,
            num_glyphs,
        })
    }
}

impl<'a> Hmtx<'a> {
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// The long metric for a glyph in the first array.
    pub fn long_metric(&self, index: u16) -> Option<LongMetric> {
        if index >= self.number_of_h_metrics {
            return None;
        }
        let pos = index as usize * 4;
        let advance = self.data.read_at::<u16>(pos).ok()?;
        let side_bearing = self.data.read_at::<i16>(pos + 2).ok()?;
        Some(LongMetric {
            advance,
            side_bearing,
        })
    }

    /// The advance width for a glyph.
    ///
    /// Glyphs past the long metric array repeat the last long advance.
    pub fn advance(&self, glyph_id: u16) -> Option<u16> {
        if glyph_id >= self.num_glyphs {
            return None;
        }
        let index = glyph_id.min(self.number_of_h_metrics.checked_sub(1)?);
        self.long_metric(index).map(|metric| metric.advance)
    }

    /// The left side bearing for a glyph.
    pub fn side_bearing(&self, glyph_id: u16) -> Option<i16> {
        if glyph_id >= self.num_glyphs {
            return None;
        }
        if glyph_id < self.number_of_h_metrics {
            return self.long_metric(glyph_id).map(|metric| metric.side_bearing);
        }
        let tail_index = (glyph_id - self.number_of_h_metrics) as usize;
        let pos = self.number_of_h_metrics as usize * 4 + tail_index * 2;
        self.data.read_at::<i16>(pos).ok()
    }
}

//! A trait for things that can serve font tables.

use font_types::Tag;

use crate::{tables, FontData, FontRead, FontReadWithArgs, ReadError, TopLevelTable};

/// An interface for accessing tables from a font (or font-like object).
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    fn head(&self) -> Result<tables::head::Head, ReadError> {
        self.expect_data_for_tag(tables::head::Head::TAG)
            .and_then(FontRead::read)
    }

    fn hhea(&self) -> Result<tables::hhea::Hhea, ReadError> {
        self.expect_data_for_tag(tables::hhea::Hhea::TAG)
            .and_then(FontRead::read)
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp, ReadError> {
        self.expect_data_for_tag(tables::maxp::Maxp::TAG)
            .and_then(FontRead::read)
    }

    fn hmtx(&self) -> Result<tables::hmtx::Hmtx<'a>, ReadError> {
        let num_glyphs = self.maxp().map(|maxp| maxp.num_glyphs())?;
        let number_of_h_metrics = self.hhea().map(|hhea| hhea.number_of_h_metrics())?;
        self.expect_data_for_tag(tables::hmtx::Hmtx::TAG)
            .and_then(|data| {
                FontReadWithArgs::read_with_args(data, &(number_of_h_metrics, num_glyphs))
            })
    }

    fn post(&self) -> Result<tables::post::Post, ReadError> {
        self.expect_data_for_tag(tables::post::Post::TAG)
            .and_then(FontRead::read)
    }

    fn os2(&self) -> Result<tables::os2::Os2, ReadError> {
        self.expect_data_for_tag(tables::os2::Os2::TAG)
            .and_then(FontRead::read)
    }

    fn name(&self) -> Result<tables::name::Name<'a>, ReadError> {
        self.expect_data_for_tag(tables::name::Name::TAG)
            .and_then(FontRead::read)
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap<'a>, ReadError> {
        self.expect_data_for_tag(tables::cmap::Cmap::TAG)
            .and_then(FontRead::read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `hmtx` takes its array lengths from `maxp` and `hhea`; serve dummy
    /// versions of all three and check that the lengths line up. The only
    /// fields that matter are maxp::num_glyphs and
    /// hhea::number_of_h_metrics, everything else is zero'd out.
    #[test]
    fn hmtx_reads_lengths_from_sibling_tables() {
        struct DummyProvider;
        impl TableProvider<'static> for DummyProvider {
            fn data_for_tag(&self, tag: Tag) -> Option<FontData<'static>> {
                if tag == Tag::new(b"maxp") {
                    Some(FontData::new(&[
                        0, 0, 0x50, 0, // version 0.5
                        0, 3, // num_glyphs = 3
                    ]))
                } else if tag == Tag::new(b"hhea") {
                    Some(FontData::new(&[
                        0, 1, 0, 0, // version 1.0
                        0, 0, 0, 0, // ascender/descender
                        0, 0, 0, 0, // line gap/advance width max
                        0, 0, 0, 0, // min left/right side bearing
                        0, 0, 0, 0, // x max extent, caret slope rise
                        0, 0, 0, 0, // caret slope run, caret offset
                        0, 0, 0, 0, // reserved 1/2
                        0, 0, 0, 0, // reserved 3/4
                        0, 0, 0, 1, // metric format, number_of_h_metrics
                    ]))
                } else if tag == Tag::new(b"hmtx") {
                    Some(FontData::new(&[
                        0, 4, 0, 6, // one long metric: advance 4, lsb 6
                        0, 30, 0, 111, // two bearing-only entries
                    ]))
                } else {
                    None
                }
            }
        }

        let hmtx = DummyProvider.hmtx().unwrap();
        assert_eq!(hmtx.number_of_h_metrics(), 1);
        assert_eq!(hmtx.num_glyphs(), 3);
        assert_eq!(hmtx.advance(0), Some(4));
        assert_eq!(hmtx.side_bearing(0), Some(6));
        // the bearing-only tail repeats the last long advance
        assert_eq!(hmtx.advance(1), Some(4));
        assert_eq!(hmtx.side_bearing(1), Some(30));
        assert_eq!(hmtx.advance(2), Some(4));
        assert_eq!(hmtx.side_bearing(2), Some(111));
        assert_eq!(hmtx.advance(3), None);
    }

    #[test]
    fn missing_table_reports_its_tag() {
        struct EmptyProvider;
        impl TableProvider<'static> for EmptyProvider {
            fn data_for_tag(&self, _tag: Tag) -> Option<FontData<'static>> {
                None
            }
        }
        assert_eq!(
            EmptyProvider.head(),
            Err(ReadError::TableIsMissing(Tag::new(b"head")))
        );
    }
}

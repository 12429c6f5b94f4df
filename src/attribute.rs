//! Primary attributes used for font classification and selection.

use crate::table_provider::TableProvider;
use crate::tables::head::Head;
use crate::tables::os2::Os2;
use crate::tables::post::Post;

// fsSelection bits, per the OS/2 specification.
const FS_SELECTION_ITALIC: u16 = 0x0001;
const FS_SELECTION_OBLIQUE: u16 = 0x0200;

// macStyle bits, per the head specification.
const MAC_STYLE_BOLD: u16 = 0x0001;
const MAC_STYLE_ITALIC: u16 = 0x0002;

/// Visual weight of a font, on the ten-stop 0..=900 axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Weight {
    Thinest = 0,
    Thin = 100,
    ExtraLight = 200,
    Light = 300,
    #[default]
    Normal = 400,
    Medium = 500,
    SemiBold = 600,
    Bold = 700,
    ExtraBold = 800,
    Black = 900,
}

impl Weight {
    /// The numeric position on the weight axis.
    pub fn value(self) -> u16 {
        self as u16
    }

    /// The nearest stop for a `usWeightClass` value, rounding half up.
    pub fn from_class(class: u16) -> Self {
        match (class as u32 + 50) / 100 {
            0 => Weight::Thinest,
            1 => Weight::Thin,
            2 => Weight::ExtraLight,
            3 => Weight::Light,
            4 => Weight::Normal,
            5 => Weight::Medium,
            6 => Weight::SemiBold,
            7 => Weight::Bold,
            8 => Weight::ExtraBold,
            _ => Weight::Black,
        }
    }
}

/// Visual slant of a font.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Style {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Weight, style and spacing attributes of a font.
///
/// These are derived from the
/// [OS/2](https://learn.microsoft.com/en-us/typography/opentype/spec/os2)
/// table if it exists. Fonts without one fall back to `post` for spacing
/// and `head.macStyle` for weight and style; lacking even a `head`, the
/// sub-family name is searched for well-known substrings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub weight: Weight,
    pub style: Style,
    pub monospaced: bool,
}

/// Where a font's classification comes from.
///
/// Exactly one source applies to a font; selecting it up front keeps the
/// fallback order in one place.
enum ClassificationSource<'a> {
    /// The `OS/2` table answers everything.
    Os2(Os2),
    /// No `OS/2`: weight and style from `head.macStyle`, spacing from
    /// `post` when present.
    MacStyle { head: Head, post: Option<Post> },
    /// Neither `OS/2` nor `head`: substring heuristics on the sub-family
    /// name, spacing from `post` when present.
    Heuristic {
        sub_family: Option<&'a str>,
        post: Option<Post>,
    },
}

impl<'a> ClassificationSource<'a> {
    fn select<'b>(font: &impl TableProvider<'b>, sub_family: Option<&'a str>) -> Self {
        if let Ok(os2) = font.os2() {
            return ClassificationSource::Os2(os2);
        }
        let post = font.post().ok();
        match font.head() {
            Ok(head) => ClassificationSource::MacStyle { head, post },
            Err(_) => ClassificationSource::Heuristic { sub_family, post },
        }
    }
}

impl Attributes {
    /// Extracts the weight, style and spacing attributes of a font.
    ///
    /// `sub_family` is the font's sub-family name, consulted only when the
    /// font carries neither an `OS/2` nor a `head` table.
    pub fn new<'a>(font: &impl TableProvider<'a>, sub_family: Option<&str>) -> Self {
        match ClassificationSource::select(font, sub_family) {
            ClassificationSource::Os2(os2) => Self::from_os2(&os2),
            ClassificationSource::MacStyle { head, post } => Self::from_mac_style(&head, post),
            ClassificationSource::Heuristic { sub_family, post } => {
                Self::from_sub_family(sub_family.unwrap_or(""), post)
            }
        }
    }

    fn from_os2(os2: &Os2) -> Self {
        let weight = Weight::from_class(os2.us_weight_class());
        // PANOSE family kind 2 is Latin text; byte 3 is proportion, and
        // value 9 there means monospaced.
        let panose = os2.panose();
        let monospaced = panose[0] == 2 && panose[3] == 9;
        let fs_selection = os2.fs_selection();
        let style = if fs_selection & FS_SELECTION_OBLIQUE != 0 {
            Style::Oblique
        } else if fs_selection & FS_SELECTION_ITALIC != 0 {
            Style::Italic
        } else {
            Style::Normal
        };
        Attributes {
            weight,
            style,
            monospaced,
        }
    }

    fn from_mac_style(head: &Head, post: Option<Post>) -> Self {
        let mac_style = head.mac_style();
        let weight = if mac_style & MAC_STYLE_BOLD != 0 {
            Weight::Bold
        } else {
            Weight::Normal
        };
        let style = if mac_style & MAC_STYLE_ITALIC != 0 {
            Style::Italic
        } else {
            Style::Normal
        };
        Attributes {
            weight,
            style,
            monospaced: is_fixed_pitch(post),
        }
    }

    fn from_sub_family(sub_family: &str, post: Option<Post>) -> Self {
        let name = sub_family.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|needle| name.contains(needle));
        let weight = if contains_any(&["thin"]) {
            Weight::Thin
        } else if contains_any(&["ultra light", "ultralight", "hairline"]) {
            Weight::Thinest
        } else if contains_any(&["extralight"]) {
            Weight::ExtraLight
        } else if contains_any(&["light"]) {
            Weight::Light
        } else if contains_any(&["demi bold", "semibold"]) {
            Weight::SemiBold
        } else if contains_any(&["extrabold"]) {
            Weight::ExtraBold
        } else if contains_any(&["bold", "heavy"]) {
            Weight::Bold
        } else if contains_any(&["medium"]) {
            Weight::Medium
        } else if contains_any(&["black", "negreta"]) {
            Weight::Black
        } else {
            Weight::Normal
        };
        let style = if name.contains("italic") {
            Style::Italic
        } else if name.contains("oblique") {
            Style::Oblique
        } else {
            Style::Normal
        };
        Attributes {
            weight,
            style,
            monospaced: is_fixed_pitch(post),
        }
    }
}

fn is_fixed_pitch(post: Option<Post>) -> bool {
    post.map(|post| post.is_fixed_pitch() != 0).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_data::FontData;
    use crate::read::TopLevelTable;
    use crate::test_helpers::{head_table, os2_table, post_table};
    use font_types::Tag;

    /// Serves only the tables it is given.
    struct FakeFont {
        os2: Option<Vec<u8>>,
        head: Option<Vec<u8>>,
        post: Option<Vec<u8>>,
    }

    impl FakeFont {
        fn empty() -> Self {
            FakeFont {
                os2: None,
                head: None,
                post: None,
            }
        }
    }

    impl<'a> TableProvider<'a> for &'a FakeFont {
        fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
            let bytes = if tag == Os2::TAG {
                self.os2.as_ref()
            } else if tag == Head::TAG {
                self.head.as_ref()
            } else if tag == Post::TAG {
                self.post.as_ref()
            } else {
                None
            };
            bytes.map(|bytes| FontData::new(bytes))
        }
    }

    #[test]
    fn weight_class_rounds_half_up() {
        assert_eq!(Weight::from_class(449), Weight::Normal);
        assert_eq!(Weight::from_class(450), Weight::Medium);
        assert_eq!(Weight::from_class(400), Weight::Normal);
        assert_eq!(Weight::from_class(0), Weight::Thinest);
        assert_eq!(Weight::from_class(1000), Weight::Black);
    }

    #[test]
    fn os2_wins_over_everything() {
        let font = FakeFont {
            os2: Some(os2_table(640, [2, 0, 0, 9, 0, 0, 0, 0, 0, 0], 0)),
            head: Some(head_table(1000, [0; 4], MAC_STYLE_ITALIC)),
            post: Some(post_table(0, 0)),
        };
        let attributes = Attributes::new(&&font, Some("Bold Italic"));
        assert_eq!(attributes.weight, Weight::SemiBold);
        assert_eq!(attributes.style, Style::Normal);
        assert!(attributes.monospaced);
    }

    #[test]
    fn panose_proportion_must_be_nine() {
        let font = FakeFont {
            os2: Some(os2_table(400, [2, 0, 0, 8, 0, 0, 0, 0, 0, 0], 0)),
            head: None,
            post: None,
        };
        assert!(!Attributes::new(&&font, None).monospaced);
    }

    #[test]
    fn oblique_wins_over_italic() {
        let font = FakeFont {
            os2: Some(os2_table(
                400,
                [0; 10],
                FS_SELECTION_ITALIC | FS_SELECTION_OBLIQUE,
            )),
            head: None,
            post: None,
        };
        assert_eq!(Attributes::new(&&font, None).style, Style::Oblique);
    }

    #[test]
    fn mac_style_fallback() {
        let font = FakeFont {
            os2: None,
            head: Some(head_table(1000, [0; 4], MAC_STYLE_BOLD | MAC_STYLE_ITALIC)),
            post: Some(post_table(0, 1)),
        };
        let attributes = Attributes::new(&&font, Some("Light"));
        assert_eq!(attributes.weight, Weight::Bold);
        assert_eq!(attributes.style, Style::Italic);
        assert!(attributes.monospaced);
    }

    #[test]
    fn sub_family_heuristics() {
        let cases = [
            ("Thin Italic", Weight::Thin, Style::Italic),
            ("Hairline", Weight::Thinest, Style::Normal),
            ("UltraLight Oblique", Weight::Thinest, Style::Oblique),
            ("ExtraLight", Weight::ExtraLight, Style::Normal),
            ("Light", Weight::Light, Style::Normal),
            ("Semibold Italic", Weight::SemiBold, Style::Italic),
            ("Demi Bold", Weight::SemiBold, Style::Normal),
            ("ExtraBold", Weight::ExtraBold, Style::Normal),
            ("Heavy", Weight::Bold, Style::Normal),
            ("Medium", Weight::Medium, Style::Normal),
            ("Black", Weight::Black, Style::Normal),
            ("Negreta", Weight::Black, Style::Normal),
            ("Regular", Weight::Normal, Style::Normal),
        ];
        let font = FakeFont::empty();
        for (sub_family, weight, style) in cases {
            let attributes = Attributes::new(&&font, Some(sub_family));
            assert_eq!(attributes.weight, weight, "{sub_family}");
            assert_eq!(attributes.style, style, "{sub_family}");
        }
    }

    #[test]
    fn post_spacing_without_head() {
        let font = FakeFont {
            os2: None,
            head: None,
            post: Some(post_table(0, 1)),
        };
        let attributes = Attributes::new(&&font, Some("Bold"));
        assert!(attributes.monospaced);
        assert_eq!(attributes.weight, Weight::Bold);
    }
}

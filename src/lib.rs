//! Reading OpenType font metadata and matching installed font families.
//!
//! This crate does two jobs, one built on the other:
//!
//! * **Reading**: zero-allocation parsing of the metadata tables of
//!   `.ttf`/`.otf` fonts and `.ttc`/`.otc` collections: identifying
//!   names, weight/style classification, horizontal metrics, and the
//!   character to glyph mapping. Glyph outlines are out of scope; this is
//!   the part of a font a layout or measurement pass needs, not a
//!   rasterizer.
//! * **Matching**: a [`FontRegistry`] that indexes a lightweight
//!   descriptor for every font installed on the system and resolves a
//!   `(family, weight, style)` request to the best physical font with a
//!   deterministic score, parsing the winner lazily.
//!
//! # Example
//!
//! ```no_run
//! use velja::{FontRegistry, Style, SystemSource, Weight};
//!
//! let mut fonts = FontRegistry::scan(&SystemSource);
//! let face = fonts.find_best_match("Arial", Weight::Bold, Style::Normal)?;
//! println!(
//!     "{} advances {} units for 'A'",
//!     face.family_name(),
//!     face.horizontal_advance('A')?
//! );
//! # Ok::<(), velja::FontError>(())
//! ```
//!
//! For direct table access, [`FontRef`] implements [`TableProvider`] over
//! borrowed bytes:
//!
//! ```no_run
//! # let font_bytes = vec![];
//! use velja::{FontRef, TableProvider};
//!
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//! println!("{} glyphs", maxp.num_glyphs());
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod attribute;
pub mod charmap;
mod error;
pub mod face;
mod font_data;
mod read;
pub mod registry;
pub mod source;
mod table_provider;
pub mod tables;

#[doc(hidden)]
pub mod test_helpers;

pub use attribute::{Attributes, Style, Weight};
pub use error::FontError;
pub use face::{Baseline, Face};
pub use font_data::{Cursor, FontData};
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError, TopLevelTable};
pub use registry::{FontRegistry, KnownFont};
pub use source::{FontSource, SystemSource};
pub use table_provider::TableProvider;

/// Public re-export of the font-types crate.
pub use font_types as types;

use font_types::Tag;

/// The sfnt version of fonts with TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The sfnt version of fonts with CFF outlines (`OTTO`).
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The header tag of font collection files.
pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");

/// Reference to the content of a font or font collection file.
#[derive(Clone)]
pub enum FileRef<'a> {
    /// A single font.
    Font(FontRef<'a>),
    /// A collection of fonts.
    Collection(CollectionRef<'a>),
}

impl<'a> FileRef<'a> {
    /// Creates a new reference to a file representing a font or font
    /// collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Ok(if data.len() >= 4 && FontData::new(data).read_at::<Tag>(0)? == TTC_HEADER_TAG {
            Self::Collection(CollectionRef::new(data)?)
        } else {
            Self::Font(FontRef::new(data)?)
        })
    }

    /// Returns an iterator over the fonts contained in the file.
    ///
    /// A single font file yields one font; a collection yields each of
    /// its entries in order.
    pub fn fonts(&self) -> FileFonts<'a> {
        FileFonts(match self {
            Self::Font(font) => FileFontsInner::Single(Some(font.clone())),
            Self::Collection(collection) => FileFontsInner::Collection(collection.iter()),
        })
    }
}

/// Iterator over every font in a file, created with [`FileRef::fonts`].
#[derive(Clone)]
pub struct FileFonts<'a>(FileFontsInner<'a>);

#[derive(Clone)]
enum FileFontsInner<'a> {
    Single(Option<FontRef<'a>>),
    Collection(Fonts<'a>),
}

impl<'a> Iterator for FileFonts<'a> {
    type Item = Result<FontRef<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            FileFontsInner::Single(font) => font.take().map(Ok),
            FileFontsInner::Collection(fonts) => fonts.next(),
        }
    }
}

/// Reference to the content of a font collection file.
#[derive(Clone)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    num_fonts: u32,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let tag = cursor.read::<Tag>()?;
        if tag != TTC_HEADER_TAG {
            return Err(ReadError::InvalidTtc(tag));
        }
        cursor.skip(4)?; // majorVersion, minorVersion
        let num_fonts = cursor.read::<u32>()?;
        data.check_in_bounds(12usize.saturating_add(num_fonts as usize * 4))?;
        Ok(CollectionRef { data, num_fonts })
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.num_fonts
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.num_fonts == 0
    }

    /// Returns the font in the collection at the specified index.
    ///
    /// Table record offsets in a collection are measured from the start
    /// of the whole file, so the returned font keeps the full file data
    /// and only the directory view moves to the entry's offset.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        if index >= self.num_fonts {
            return Err(ReadError::InvalidCollectionIndex(index));
        }
        let offset = self.data.read_at::<u32>(12 + index as usize * 4)? as usize;
        let directory_data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Ok(FontRef {
            data: self.data,
            table_directory: TableDirectory::read(directory_data)?,
        })
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> Fonts<'a> {
        Fonts {
            collection: self.clone(),
            next_index: 0,
        }
    }
}

/// Iterator over the fonts of a collection, created with
/// [`CollectionRef::iter`].
#[derive(Clone)]
pub struct Fonts<'a> {
    collection: CollectionRef<'a>,
    next_index: u32,
}

impl<'a> Iterator for Fonts<'a> {
    type Item = Result<FontRef<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.collection.num_fonts {
            return None;
        }
        let font = self.collection.get(self.next_index);
        self.next_index += 1;
        Some(font)
    }
}

/// One record in a [`TableDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    /// Offset from the beginning of the font file.
    pub offset: u32,
    pub length: u32,
}

/// A font's table directory: the sorted array of table records behind its
/// offset table.
#[derive(Debug, Clone, Copy)]
pub struct TableDirectory<'a> {
    data: FontData<'a>,
    sfnt_version: u32,
    num_tables: u16,
}

impl<'a> TableDirectory<'a> {
    /// Read a directory from data beginning at its offset table.
    ///
    /// The sfnt version must announce TrueType or CFF outlines; anything
    /// else is not an offset table.
    pub fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version = cursor.read::<u32>()?;
        if sfnt_version != TT_SFNT_VERSION && sfnt_version != CFF_SFNT_VERSION {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables = cursor.read::<u16>()?;
        cursor.skip(6)?; // searchRange, entrySelector, rangeShift
        data.check_in_bounds(12 + num_tables as usize * 16)?;
        Ok(TableDirectory {
            data,
            sfnt_version,
            num_tables,
        })
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn record(&self, index: u16) -> Result<TableRecord, ReadError> {
        if index >= self.num_tables {
            return Err(ReadError::OutOfBounds);
        }
        let pos = 12 + index as usize * 16;
        Ok(TableRecord {
            tag: self.data.read_at(pos)?,
            checksum: self.data.read_at(pos + 4)?,
            offset: self.data.read_at(pos + 8)?,
            length: self.data.read_at(pos + 12)?,
        })
    }

    /// Binary search for the record with the given tag.
    ///
    /// The format requires records sorted ascending by tag; an unsorted
    /// directory makes tables invisible, it is not an error here.
    pub fn find(&self, tag: Tag) -> Option<TableRecord> {
        let mut lo = 0;
        let mut hi = self.num_tables;
        while lo < hi {
            let mid = (lo + hi) / 2;
            let record = self.record(mid).ok()?;
            match record.tag.cmp(&tag) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(record),
            }
        }
        None
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory<'a>,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given
    /// data.
    ///
    /// The data must be a single font, beginning with an offset table. To
    /// load a font from a font collection, use [`FontRef::from_index`]
    /// instead.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let table_directory = TableDirectory::read(data)?;
        Ok(FontRef {
            data,
            table_directory,
        })
    }

    /// Creates a new reference to the font at `index` in the given data.
    ///
    /// This accepts both font collection (ttc/otc) and single font
    /// (ttf/otf) files; for a single font file, `index` must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        match FileRef::new(data)? {
            FileRef::Collection(collection) => collection.get(index),
            FileRef::Font(font) if index == 0 => Ok(font),
            FileRef::Font(_) => Err(ReadError::InvalidCollectionIndex(index)),
        }
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    /// Resolves a directory record to its table payload.
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_directory.find(tag)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.slice(start..end)
    }
}

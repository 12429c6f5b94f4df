//! Traits for interpreting font data.

use font_types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all font tables that are self-describing:
/// that is, tables that do not require any external state in order to
/// interpret their underlying bytes. (Tables that require external state
/// implement [`FontReadWithArgs`] instead.)
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing
    /// validation.
    ///
    /// This method is responsible for ensuring the input data is
    /// consistent: that required magic values match and that any array
    /// bounds derived from count fields are not out of range.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for a type that needs additional arguments to be read.
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for types that require external data in order to be constructed.
///
/// The `hmtx` table is the canonical case: the lengths of its two arrays
/// come from `maxp` and `hhea`, so it cannot implement [`FontRead`].
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    /// Read an item, using the provided args.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// A table with a 4-byte tag in the font's table directory.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read or skip ran past the end of the data.
    OutOfBounds,
    /// The outer container tag was not a recognized sfnt version.
    InvalidSfnt(u32),
    /// The file claimed to be a collection but the header tag was wrong.
    InvalidTtc(Tag),
    /// The requested font index does not exist in the collection.
    InvalidCollectionIndex(u32),
    /// The `head` table's magic number mismatched.
    InvalidHeadMagic(u32),
    /// An unrecognized format or version field.
    InvalidFormat(i64),
    /// The selected `cmap` subtable is not format 4.
    UnsupportedCmapFormat(u16),
    /// Structurally invalid `cmap` data.
    MalformedCmap(&'static str),
    /// Structurally invalid `name` data.
    MalformedName(&'static str),
    /// A required table is absent.
    TableIsMissing(Tag),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "A read was out of bounds"),
            ReadError::InvalidSfnt(version) => write!(f, "Invalid sfnt version 0x{version:08X}"),
            ReadError::InvalidTtc(tag) => write!(f, "Invalid ttc tag {tag}"),
            ReadError::InvalidCollectionIndex(index) => {
                write!(f, "Invalid index {index} for font collection")
            }
            ReadError::InvalidHeadMagic(magic) => {
                write!(f, "Invalid head magic number 0x{magic:08X}")
            }
            ReadError::InvalidFormat(format) => write!(f, "Invalid format '{format}'"),
            ReadError::UnsupportedCmapFormat(format) => {
                write!(f, "Unsupported cmap subtable format {format}")
            }
            ReadError::MalformedCmap(msg) => write!(f, "Malformed cmap: {msg}"),
            ReadError::MalformedName(msg) => write!(f, "Malformed name: {msg}"),
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
        }
    }
}

impl std::error::Error for ReadError {}

//! Reading and writing yWriter 7 project files.
//!
//! The `.yw7` file is the canonical store: a conversion run reads it into a
//! [`Novel`](crate::novel::Novel), and an import run writes the merged tree
//! back. Writing honors yWriter's advisory lock file and its CDATA
//! conventions (including the single-space placeholder that keeps empty
//! CDATA sections from corrupting yWriter's own parser).

mod reader;
mod writer;

pub use reader::{parse_yw7, read_yw7};
pub use writer::{is_locked, render_yw7, write_yw7};

/// File extension of the canonical project file.
pub const EXTENSION: &str = "yw7";

/// Element names whose text is wrapped in a CDATA section on write.
pub(crate) const CDATA_TAGS: &[&str] = &[
    "Title",
    "AuthorName",
    "Bio",
    "Desc",
    "FieldTitle1",
    "FieldTitle2",
    "FieldTitle3",
    "FieldTitle4",
    "LaTeXHeaderFile",
    "Tags",
    "AKA",
    "ImageFile",
    "FullName",
    "Goals",
    "Notes",
    "RTFFile",
    "SceneContent",
];

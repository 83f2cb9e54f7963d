//! # plume
//!
//! A round-trip converter between yWriter 7 novel projects and editable
//! office documents.
//!
//! The `.yw7` project file stays canonical: plume exports its chapters,
//! scenes, characters, locations, and items into HTML documents or CSV
//! tables carrying invisible structural markers, and imports the edited
//! documents back — verifying first that the document's structural
//! skeleton still matches the project, then merging only the edited
//! content into the tree, by id.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Export the manuscript, edit it elsewhere, import it back.
//! let message = plume::convert(Path::new("book.yw7")).unwrap();
//! assert!(message.starts_with("SUCCESS"));
//!
//! let message = plume::convert(Path::new("book_manuscript.html")).unwrap();
//! assert!(message.starts_with("SUCCESS"));
//! ```
//!
//! ## Safety of the writeback
//!
//! An import never partially updates a project. The pipeline decodes the
//! document's markers (rejecting unbalanced ones), compares the decoded
//! [`Skeleton`] against the project's, and matches every edited id — all
//! before the first mutation. Reordered, truncated, or foreign documents
//! fail with a typed [`Error`] and leave the file byte-for-byte unchanged.

pub mod convert;
pub mod csv;
pub mod error;
pub mod html;
pub mod markup;
pub mod merge;
pub mod novel;
pub mod structure;
pub mod yw7;

pub(crate) mod util;

pub use convert::{Target, convert, export, import, new_project};
pub use error::{Error, Result};
pub use novel::{
    Chapter, ChapterKind, Character, IdRegistry, Item, Location, NodeKind, Novel, Scene, SceneKind,
};
pub use structure::{Skeleton, SkeletonNode};

//! Structural markers: encoding, decoding, and skeleton comparison.
//!
//! Interchange documents carry the project structure as paired begin/end
//! markers around every node's content. This module owns the whole
//! round-trip of those markers:
//!
//! - a tokenizer that lexes a document into markup tokens,
//! - per-format [`Grammar`] tables saying which tokens signal which
//!   structural events,
//! - one shared state machine turning the event stream into a
//!   [`DecodedDocument`] (skeleton + per-node content), rejecting
//!   malformed marker nesting,
//! - the [`Skeleton`] type and its exact-equality check used to verify an
//!   edited document against the original project before any writeback.
//!
//! The original tool grew one parser subclass per document flavor; here a
//! single tokenizer and state machine serve every flavor, and the flavors
//! differ only in their grammar table.

mod decoder;
pub mod grammar;
mod skeleton;
mod tokenizer;

pub use decoder::{DecodedDocument, StructureEvent, build_document, decode, scan};
pub use grammar::{Grammar, MarkerSyntax};
pub use skeleton::{Skeleton, SkeletonNode};
pub use tokenizer::{HtmlToken, attr_value, tokenize};

//! Chapter nodes of the narrative tree.

/// How a chapter is rendered in generated documents.
///
/// A `SectionStart` chapter begins a new part and gets a first-level
/// heading; ordinary chapters get a second-level heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterKind {
    #[default]
    Normal,
    SectionStart,
}

/// A chapter: heading metadata plus the ordered ids of its scenes.
///
/// The chapter owns only the *ordering*; the scene objects themselves live
/// in [`Novel::scenes`](super::Novel::scenes).
#[derive(Debug, Clone, Default)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: ChapterKind,
    /// Excluded from generated documents without being deleted.
    pub is_unused: bool,
    /// Scene ids in reading order.
    pub scenes: Vec<String>,
}

impl Chapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

//! Scene nodes and their derived counts.

use super::count::{letter_count, word_count};

/// What a scene's body holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    #[default]
    Normal,
    Notes,
    Todo,
}

/// A scene: the only node kind carrying full manuscript text.
///
/// The body is private so that the derived word and letter counts can never
/// go stale — every mutation goes through [`Scene::set_body`], which
/// recomputes both in the same step.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: SceneKind,
    pub is_unused: bool,
    /// Suppress the scene divider before this scene when emitted.
    pub append_to_previous: bool,
    pub status: Option<u8>,
    pub tags: Vec<String>,
    pub notes: Option<String>,

    body: String,
    word_count: usize,
    letter_count: usize,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The scene text in yw7 markup.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the scene text and recompute both counts atomically.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.word_count = word_count(&self.body);
        self.letter_count = letter_count(&self.body);
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn letter_count(&self) -> usize {
        self.letter_count
    }
}

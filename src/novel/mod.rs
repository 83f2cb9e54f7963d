//! The in-memory novel project tree.
//!
//! A [`Novel`] is the format-agnostic center of every conversion: the yw7
//! reader produces one, the document writers render it, and the merge engine
//! copies verified edits back into it. Chapters own the *ordering* of their
//! scenes, but scene objects live in the global scene collection and are
//! referenced by id only.

mod chapter;
mod count;
mod id;
mod scene;
mod world;

use std::collections::{HashMap, HashSet};

pub use chapter::{Chapter, ChapterKind};
pub use count::{letter_count, strip_inline_tags, word_count};
pub use id::{IdRegistry, NodeKind};
pub use scene::{Scene, SceneKind};
pub use world::{Character, Item, Location};

use crate::error::{Error, Result};

/// A complete novel project: metadata, the chapter/scene narrative tree, and
/// the character, location, and item collections.
#[derive(Debug, Clone, Default)]
pub struct Novel {
    pub title: String,
    pub author: String,
    pub description: String,

    /// Chapter ids in reading order.
    pub chapter_order: Vec<String>,
    pub chapters: HashMap<String, Chapter>,
    pub scenes: HashMap<String, Scene>,

    pub character_order: Vec<String>,
    pub characters: HashMap<String, Character>,
    pub location_order: Vec<String>,
    pub locations: HashMap<String, Location>,
    pub item_order: Vec<String>,
    pub items: HashMap<String, Item>,
}

impl Novel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chapters in reading order, skipping ids that fail to resolve.
    ///
    /// Resolution failures are a model invariant violation; use
    /// [`Novel::validate`] to surface them as errors.
    pub fn chapters_in_order(&self) -> impl Iterator<Item = &Chapter> {
        self.chapter_order
            .iter()
            .filter_map(|id| self.chapters.get(id))
    }

    /// Scenes of one chapter in reading order.
    pub fn scenes_of(&self, chapter: &Chapter) -> impl Iterator<Item = &Scene> {
        chapter.scenes.iter().filter_map(|id| self.scenes.get(id))
    }

    /// Total word count over used scenes in used chapters.
    pub fn total_word_count(&self) -> usize {
        self.used_scenes().map(Scene::word_count).sum()
    }

    /// Total letter count over used scenes in used chapters.
    pub fn total_letter_count(&self) -> usize {
        self.used_scenes().map(Scene::letter_count).sum()
    }

    fn used_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.chapters_in_order()
            .filter(|ch| !ch.is_unused)
            .flat_map(|ch| self.scenes_of(ch))
            .filter(|sc| !sc.is_unused)
    }

    /// Check the tree invariants: every ordered id resolves to a node of its
    /// collection, and no ordering list contains a duplicate.
    pub fn validate(&self) -> Result<()> {
        check_order("chapter", &self.chapter_order, &self.chapters)?;
        for chapter in self.chapters.values() {
            check_order("scene", &chapter.scenes, &self.scenes)?;
        }
        check_order("character", &self.character_order, &self.characters)?;
        check_order("location", &self.location_order, &self.locations)?;
        check_order("item", &self.item_order, &self.items)?;
        Ok(())
    }
}

fn check_order<T>(label: &str, order: &[String], collection: &HashMap<String, T>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in order {
        if !collection.contains_key(id) {
            return Err(Error::MalformedStructure(format!(
                "{label} list references unknown id {id}"
            )));
        }
        if !seen.insert(id) {
            return Err(Error::MalformedStructure(format!(
                "{label} list contains duplicate id {id}"
            )));
        }
    }
    Ok(())
}

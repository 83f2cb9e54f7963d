//! The writeback engine: copying verified edits into the original tree.
//!
//! A [`DocumentPatch`] holds exactly the fields an importing format is
//! authoritative for — a manuscript patches scene bodies, a chapter
//! description sheet patches chapter descriptions, a character table
//! patches the character sheet fields. Everything else on the tree is
//! left untouched.
//!
//! Application is all-or-nothing: every id is verified against the tree
//! before the first mutation, so a failed import leaves the project
//! exactly as it was.

use crate::error::{Error, Result};
use crate::novel::Novel;

/// Edited fields for one scene.
#[derive(Debug, Clone, Default)]
pub struct ScenePatch {
    pub body: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Edited fields for one chapter.
#[derive(Debug, Clone, Default)]
pub struct ChapterPatch {
    pub description: Option<String>,
}

/// Edited fields for one character, location, or item.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub aka: Option<String>,
    pub tags: Option<Vec<String>>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub goals: Option<String>,
    pub notes: Option<String>,
    pub is_major: Option<bool>,
}

/// Everything one edited document wants to write back, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub chapters: Vec<(String, ChapterPatch)>,
    pub scenes: Vec<(String, ScenePatch)>,
    pub characters: Vec<(String, EntityPatch)>,
    pub locations: Vec<(String, EntityPatch)>,
    pub items: Vec<(String, EntityPatch)>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
            && self.scenes.is_empty()
            && self.characters.is_empty()
            && self.locations.is_empty()
            && self.items.is_empty()
    }

    /// Number of nodes the patch addresses.
    pub fn len(&self) -> usize {
        self.chapters.len()
            + self.scenes.len()
            + self.characters.len()
            + self.locations.len()
            + self.items.len()
    }
}

/// Apply a patch to the tree. Returns the number of nodes updated.
///
/// Fails with [`Error::UnknownIdentifier`] — before any mutation — if the
/// patch references an id absent from the tree.
pub fn apply(novel: &mut Novel, patch: &DocumentPatch) -> Result<usize> {
    verify_ids(novel, patch)?;

    for (id, edit) in &patch.chapters {
        let chapter = novel.chapters.get_mut(id).expect("verified above");
        if let Some(description) = &edit.description {
            chapter.description = Some(description.clone());
        }
    }

    for (id, edit) in &patch.scenes {
        let scene = novel.scenes.get_mut(id).expect("verified above");
        if let Some(body) = &edit.body {
            // set_body recomputes word and letter counts in the same step.
            scene.set_body(body.clone());
        }
        if let Some(description) = &edit.description {
            scene.description = Some(description.clone());
        }
        if let Some(title) = &edit.title {
            scene.title = title.clone();
        }
        if let Some(tags) = &edit.tags {
            scene.tags = tags.clone();
        }
        if let Some(notes) = &edit.notes {
            scene.notes = Some(notes.clone());
        }
    }

    for (id, edit) in &patch.characters {
        let character = novel.characters.get_mut(id).expect("verified above");
        if let Some(title) = &edit.title {
            character.title = title.clone();
        }
        if let Some(description) = &edit.description {
            character.description = Some(description.clone());
        }
        if let Some(aka) = &edit.aka {
            character.aka = Some(aka.clone());
        }
        if let Some(tags) = &edit.tags {
            character.tags = tags.clone();
        }
        if let Some(full_name) = &edit.full_name {
            character.full_name = Some(full_name.clone());
        }
        if let Some(bio) = &edit.bio {
            character.bio = Some(bio.clone());
        }
        if let Some(goals) = &edit.goals {
            character.goals = Some(goals.clone());
        }
        if let Some(notes) = &edit.notes {
            character.notes = Some(notes.clone());
        }
        if let Some(is_major) = edit.is_major {
            character.is_major = is_major;
        }
    }

    for (id, edit) in &patch.locations {
        let location = novel.locations.get_mut(id).expect("verified above");
        if let Some(title) = &edit.title {
            location.title = title.clone();
        }
        if let Some(description) = &edit.description {
            location.description = Some(description.clone());
        }
        if let Some(aka) = &edit.aka {
            location.aka = Some(aka.clone());
        }
        if let Some(tags) = &edit.tags {
            location.tags = tags.clone();
        }
    }

    for (id, edit) in &patch.items {
        let item = novel.items.get_mut(id).expect("verified above");
        if let Some(title) = &edit.title {
            item.title = title.clone();
        }
        if let Some(description) = &edit.description {
            item.description = Some(description.clone());
        }
        if let Some(aka) = &edit.aka {
            item.aka = Some(aka.clone());
        }
        if let Some(tags) = &edit.tags {
            item.tags = tags.clone();
        }
    }

    Ok(patch.len())
}

fn verify_ids(novel: &Novel, patch: &DocumentPatch) -> Result<()> {
    for (id, _) in &patch.chapters {
        if !novel.chapters.contains_key(id) {
            return Err(unknown("chapter", id));
        }
    }
    for (id, _) in &patch.scenes {
        if !novel.scenes.contains_key(id) {
            return Err(unknown("scene", id));
        }
    }
    for (id, _) in &patch.characters {
        if !novel.characters.contains_key(id) {
            return Err(unknown("character", id));
        }
    }
    for (id, _) in &patch.locations {
        if !novel.locations.contains_key(id) {
            return Err(unknown("location", id));
        }
    }
    for (id, _) in &patch.items {
        if !novel.items.contains_key(id) {
            return Err(unknown("item", id));
        }
    }
    Ok(())
}

fn unknown(kind: &'static str, id: &str) -> Error {
    Error::UnknownIdentifier {
        kind,
        id: id.to_string(),
    }
}

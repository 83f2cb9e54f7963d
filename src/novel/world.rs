//! Characters, locations, and items ("world" nodes).
//!
//! These collections are flat: ordering comes from the per-collection id
//! list on [`Novel`](super::Novel), not from the narrative tree.

/// A character, with the extra sheet fields yw7 tracks for people.
#[derive(Debug, Clone, Default)]
pub struct Character {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub aka: Option<String>,
    pub tags: Vec<String>,
    pub is_unused: bool,

    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub goals: Option<String>,
    pub notes: Option<String>,
    pub is_major: bool,
}

/// A location.
#[derive(Debug, Clone, Default)]
pub struct Location {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub aka: Option<String>,
    pub tags: Vec<String>,
    pub is_unused: bool,
}

/// An item.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub aka: Option<String>,
    pub tags: Vec<String>,
    pub is_unused: bool,
}

impl Character {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Location {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

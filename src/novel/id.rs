//! Stable node identifiers.
//!
//! Every structural node carries an opaque decimal id that is unique within
//! its collection and never reused. The [`IdRegistry`] is an explicit object
//! scoped to one conversion run; it replaces any notion of global counters
//! so that runs stay independent and testable.

use std::collections::HashSet;

/// The five structural node kinds, with their yw7 marker prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    Chapter,
    Scene,
    Character,
    Location,
    Item,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Chapter,
        NodeKind::Scene,
        NodeKind::Character,
        NodeKind::Location,
        NodeKind::Item,
    ];

    /// The marker prefix used in interchange documents, e.g. `ChID` in
    /// `[ChID:3]` or `<div id="ChID:3">`.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Chapter => "ChID",
            NodeKind::Scene => "ScID",
            NodeKind::Character => "CrID",
            NodeKind::Location => "LcID",
            NodeKind::Item => "ItID",
        }
    }

    /// Human-readable name for messages.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Chapter => "chapter",
            NodeKind::Scene => "scene",
            NodeKind::Character => "character",
            NodeKind::Location => "location",
            NodeKind::Item => "item",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        NodeKind::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    fn index(self) -> usize {
        match self {
            NodeKind::Chapter => 0,
            NodeKind::Scene => 1,
            NodeKind::Character => 2,
            NodeKind::Location => 3,
            NodeKind::Item => 4,
        }
    }
}

/// Assigns new ids and answers existence queries, one counter per kind.
///
/// Counters only ever move forward: an id handed out once is never handed
/// out again within the run, even if the node it named was removed.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    next: [u64; 5],
    known: [HashSet<String>; 5],
}

impl IdRegistry {
    pub fn new() -> Self {
        Self {
            next: [1; 5],
            ..Default::default()
        }
    }

    /// Build a registry seeded from all ids present in a novel, so that
    /// newly assigned ids never collide with existing ones.
    pub fn from_novel(novel: &super::Novel) -> Self {
        let mut registry = Self::new();
        for id in novel.chapters.keys() {
            registry.register(NodeKind::Chapter, id);
        }
        for id in novel.scenes.keys() {
            registry.register(NodeKind::Scene, id);
        }
        for id in novel.characters.keys() {
            registry.register(NodeKind::Character, id);
        }
        for id in novel.locations.keys() {
            registry.register(NodeKind::Location, id);
        }
        for id in novel.items.keys() {
            registry.register(NodeKind::Item, id);
        }
        registry
    }

    /// Record an existing id, advancing the counter past it if numeric.
    pub fn register(&mut self, kind: NodeKind, id: &str) {
        let slot = kind.index();
        if let Ok(n) = id.parse::<u64>()
            && n >= self.next[slot]
        {
            self.next[slot] = n + 1;
        }
        self.known[slot].insert(id.to_string());
    }

    /// Produce a new, never-before-used id for the given kind.
    pub fn assign(&mut self, kind: NodeKind) -> String {
        let slot = kind.index();
        let id = self.next[slot].to_string();
        self.next[slot] += 1;
        self.known[slot].insert(id.clone());
        id
    }

    pub fn exists(&self, kind: NodeKind, id: &str) -> bool {
        self.known[kind.index()].contains(id)
    }
}

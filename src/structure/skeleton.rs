//! The canonical structural skeleton and its equality check.
//!
//! A skeleton reduces a tree (or a decoded document) to the ordered
//! sequence of `(kind, id, parent)` triples, content-free. Two skeletons
//! are equal only element-for-element: same length, same order, same ids,
//! same parent links. Import rejects anything else — the writeback join is
//! positional-by-id only within a verified-identical skeleton, so a
//! reshuffled document must fail loudly rather than merge into the wrong
//! nodes.

use crate::error::{Error, Result};
use crate::novel::{NodeKind, Novel};

/// One node of a skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct SkeletonNode {
    pub kind: NodeKind,
    pub id: String,
    #[cfg_attr(feature = "cli", serde(skip_serializing_if = "Option::is_none"))]
    pub parent: Option<String>,
}

impl SkeletonNode {
    fn describe(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}:{} (in {})", self.kind.prefix(), self.id, parent),
            None => format!("{}:{}", self.kind.prefix(), self.id),
        }
    }
}

/// An ordered, content-free description of document structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Skeleton {
    nodes: Vec<SkeletonNode>,
}

impl Skeleton {
    pub fn from_nodes(nodes: Vec<SkeletonNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of all nodes of one kind, in skeleton order.
    pub fn ids_of(&self, kind: NodeKind) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(move |n| n.kind == kind)
            .map(|n| n.id.as_str())
    }

    /// The narrative skeleton: chapters in reading order, each followed by
    /// its scenes. Unused nodes are excluded, exactly as they are excluded
    /// from generated documents.
    pub fn narrative(novel: &Novel) -> Self {
        let mut nodes = Vec::new();
        for chapter in novel.chapters_in_order().filter(|ch| !ch.is_unused) {
            nodes.push(SkeletonNode {
                kind: NodeKind::Chapter,
                id: chapter.id.clone(),
                parent: None,
            });
            for scene in novel.scenes_of(chapter).filter(|sc| !sc.is_unused) {
                nodes.push(SkeletonNode {
                    kind: NodeKind::Scene,
                    id: scene.id.clone(),
                    parent: Some(chapter.id.clone()),
                });
            }
        }
        Self { nodes }
    }

    /// Chapters only, without their scenes (chapter description sheets).
    pub fn chapters(novel: &Novel) -> Self {
        let nodes = novel
            .chapters_in_order()
            .filter(|ch| !ch.is_unused)
            .map(|ch| SkeletonNode {
                kind: NodeKind::Chapter,
                id: ch.id.clone(),
                parent: None,
            })
            .collect();
        Self { nodes }
    }

    /// Used scenes as a flat row sequence (spreadsheet tables).
    pub fn scene_rows(novel: &Novel) -> Self {
        let nodes = novel
            .chapters_in_order()
            .filter(|ch| !ch.is_unused)
            .flat_map(|ch| novel.scenes_of(ch))
            .filter(|sc| !sc.is_unused)
            .map(|sc| SkeletonNode {
                kind: NodeKind::Scene,
                id: sc.id.clone(),
                parent: None,
            })
            .collect();
        Self { nodes }
    }

    pub fn characters(novel: &Novel) -> Self {
        Self::entity_list(
            NodeKind::Character,
            novel.character_order.iter().filter_map(|id| {
                let c = novel.characters.get(id)?;
                (!c.is_unused).then_some(id)
            }),
        )
    }

    pub fn locations(novel: &Novel) -> Self {
        Self::entity_list(
            NodeKind::Location,
            novel.location_order.iter().filter_map(|id| {
                let l = novel.locations.get(id)?;
                (!l.is_unused).then_some(id)
            }),
        )
    }

    pub fn items(novel: &Novel) -> Self {
        Self::entity_list(
            NodeKind::Item,
            novel.item_order.iter().filter_map(|id| {
                let i = novel.items.get(id)?;
                (!i.is_unused).then_some(id)
            }),
        )
    }

    fn entity_list<'a>(kind: NodeKind, ids: impl Iterator<Item = &'a String>) -> Self {
        let nodes = ids
            .map(|id| SkeletonNode {
                kind,
                id: id.clone(),
                parent: None,
            })
            .collect();
        Self { nodes }
    }

    /// Verify that `edited` matches this skeleton exactly.
    ///
    /// On the first difference, fails with [`Error::StructureMismatch`]
    /// carrying the position and both sides' nodes. No reconciliation is
    /// attempted.
    pub fn verify_matches(&self, edited: &Skeleton) -> Result<()> {
        for (position, (expected, found)) in self.nodes.iter().zip(&edited.nodes).enumerate() {
            if expected != found {
                return Err(Error::StructureMismatch {
                    position,
                    expected: expected.describe(),
                    found: found.describe(),
                });
            }
        }

        if self.nodes.len() != edited.nodes.len() {
            let position = self.nodes.len().min(edited.nodes.len());
            let describe = |nodes: &[SkeletonNode]| {
                nodes
                    .get(position)
                    .map_or_else(|| "end of document".to_string(), SkeletonNode::describe)
            };
            return Err(Error::StructureMismatch {
                position,
                expected: describe(&self.nodes),
                found: describe(&edited.nodes),
            });
        }

        Ok(())
    }
}

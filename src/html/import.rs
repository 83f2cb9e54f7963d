//! HTML document reading.
//!
//! Each reader decodes the document with its grammar table and maps the
//! decoded content to the fields its flavor is authoritative for. The
//! skeleton comes back alongside the patch; the caller verifies it against
//! the project before applying anything.

use crate::error::Result;
use crate::markup::collapse_spans;
use crate::merge::{ChapterPatch, DocumentPatch, EntityPatch, ScenePatch};
use crate::novel::NodeKind;
use crate::structure::{DecodedDocument, Skeleton, decode, grammar};

/// Read an edited manuscript (or proof): scene bodies.
pub fn read_manuscript(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::NARRATIVE)?;

    let mut patch = DocumentPatch::default();
    for id in doc.skeleton.ids_of(NodeKind::Scene) {
        let body = doc.content_of(NodeKind::Scene, id).unwrap_or_default();
        patch.scenes.push((
            id.to_string(),
            ScenePatch {
                // Spans the exporter split at paragraph breaks fold back
                // into single logical spans here.
                body: Some(collapse_spans(body)),
                ..Default::default()
            },
        ));
    }

    Ok((doc.skeleton, patch))
}

/// Read an edited chapter description sheet.
pub fn read_chapter_descriptions(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::CHAPTER_SECTIONS)?;

    let mut patch = DocumentPatch::default();
    for id in doc.skeleton.ids_of(NodeKind::Chapter) {
        patch.chapters.push((
            id.to_string(),
            ChapterPatch {
                description: content_as_description(&doc, NodeKind::Chapter, id),
            },
        ));
    }

    Ok((doc.skeleton, patch))
}

/// Read an edited scene description sheet.
pub fn read_scene_descriptions(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::SCENE_SECTIONS)?;

    let mut patch = DocumentPatch::default();
    for id in doc.skeleton.ids_of(NodeKind::Scene) {
        patch.scenes.push((
            id.to_string(),
            ScenePatch {
                description: content_as_description(&doc, NodeKind::Scene, id),
                ..Default::default()
            },
        ));
    }

    Ok((doc.skeleton, patch))
}

/// Read an edited character description sheet.
pub fn read_character_sheet(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::CHARACTER_SECTIONS)?;
    let patch = DocumentPatch {
        characters: entity_patches(&doc, NodeKind::Character),
        ..Default::default()
    };
    Ok((doc.skeleton, patch))
}

/// Read an edited location description sheet.
pub fn read_location_sheet(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::LOCATION_SECTIONS)?;
    let patch = DocumentPatch {
        locations: entity_patches(&doc, NodeKind::Location),
        ..Default::default()
    };
    Ok((doc.skeleton, patch))
}

/// Read an edited item description sheet.
pub fn read_item_sheet(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let doc = decode(text, &grammar::ITEM_SECTIONS)?;
    let patch = DocumentPatch {
        items: entity_patches(&doc, NodeKind::Item),
        ..Default::default()
    };
    Ok((doc.skeleton, patch))
}

fn entity_patches(doc: &DecodedDocument, kind: NodeKind) -> Vec<(String, EntityPatch)> {
    doc.skeleton
        .ids_of(kind)
        .map(|id| {
            (
                id.to_string(),
                EntityPatch {
                    description: content_as_description(doc, kind, id),
                    ..Default::default()
                },
            )
        })
        .collect()
}

/// A decoded node's content as a description field: present-but-empty
/// decodes to an empty description.
fn content_as_description(doc: &DecodedDocument, kind: NodeKind, id: &str) -> Option<String> {
    doc.content_of(kind, id).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::html::export;
    use crate::novel::{Chapter, Novel, Scene};

    fn sample() -> Novel {
        let mut novel = Novel::new();
        novel.title = "Book".to_string();

        let mut chapter = Chapter::new("1");
        chapter.title = "One".to_string();
        chapter.description = Some("The first chapter.".to_string());
        chapter.scenes = vec!["1".to_string(), "2".to_string()];
        novel.chapter_order.push("1".to_string());
        novel.chapters.insert("1".to_string(), chapter);

        let mut scene = Scene::new("1");
        scene.title = "First".to_string();
        scene.set_body("Hello [i]world[/i].\n\nSecond paragraph.");
        scene.description = Some("Things happen.".to_string());
        novel.scenes.insert("1".to_string(), scene);

        let mut scene = Scene::new("2");
        scene.title = "Second".to_string();
        scene.set_body("");
        novel.scenes.insert("2".to_string(), scene);

        novel
    }

    #[test]
    fn manuscript_round_trip_preserves_bodies() {
        let novel = sample();
        let html = export::manuscript(&novel);
        let (skeleton, patch) = read_manuscript(&html).unwrap();

        assert!(Skeleton::narrative(&novel).verify_matches(&skeleton).is_ok());

        let bodies: Vec<&str> = patch
            .scenes
            .iter()
            .map(|(_, p)| p.body.as_deref().unwrap())
            .collect();
        assert_eq!(
            bodies,
            vec!["Hello [i]world[/i].\n\nSecond paragraph.", ""]
        );
    }

    #[test]
    fn proof_round_trip_matches_manuscript() {
        let novel = sample();
        let (skeleton, patch) = read_manuscript(&export::proof(&novel)).unwrap();
        assert!(Skeleton::narrative(&novel).verify_matches(&skeleton).is_ok());
        assert_eq!(patch.scenes.len(), 2);
    }

    #[test]
    fn chapter_descriptions_round_trip() {
        let novel = sample();
        let html = export::chapter_descriptions(&novel);
        let (skeleton, patch) = read_chapter_descriptions(&html).unwrap();

        assert!(Skeleton::chapters(&novel).verify_matches(&skeleton).is_ok());
        assert_eq!(patch.chapters.len(), 1);
        assert_eq!(
            patch.chapters[0].1.description.as_deref(),
            Some("The first chapter.")
        );
        // Chapter description sheets never touch scenes.
        assert!(patch.scenes.is_empty());
    }

    #[test]
    fn scene_descriptions_round_trip() {
        let novel = sample();
        let html = export::scene_descriptions(&novel);
        let (skeleton, patch) = read_scene_descriptions(&html).unwrap();

        assert!(Skeleton::narrative(&novel).verify_matches(&skeleton).is_ok());
        assert_eq!(
            patch.scenes[0].1.description.as_deref(),
            Some("Things happen.")
        );
        // Scene 2 has no description; the empty division reads as empty.
        assert_eq!(patch.scenes[1].1.description.as_deref(), Some(""));
    }

    #[test]
    fn truncated_manuscript_is_malformed() {
        let novel = sample();
        let html = export::manuscript(&novel);
        let truncated = &html[..html.find("[/ChID]").unwrap()];
        assert!(matches!(
            read_manuscript(truncated),
            Err(Error::MalformedStructure(_))
        ));
    }

    #[test]
    fn span_split_across_paragraphs_collapses_back() {
        let mut novel = sample();
        novel
            .scenes
            .get_mut("1")
            .unwrap()
            .set_body("line one[i]\nline two[/i]");
        let html = export::manuscript(&novel);
        assert!(html.contains("<em>line two</em>"));

        let (_, patch) = read_manuscript(&html).unwrap();
        assert_eq!(
            patch.scenes[0].1.body.as_deref(),
            Some("line one[i]\nline two[/i]")
        );
    }
}

//! Property tests for the encode/decode round trip.
//!
//! For any tree, decoding an unedited export must reproduce the tree's
//! skeleton and every scene body exactly.

use proptest::prelude::*;

use plume::html::{manuscript, read_manuscript};
use plume::novel::{Chapter, IdRegistry, NodeKind, Novel, Scene};
use plume::Skeleton;

// ============================================================================
// Strategies
// ============================================================================

fn title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,12}".prop_map(|s| s.trim().to_string())
}

/// A scene body: trimmed paragraphs (the importer trims each one), some
/// wrapped in an italic span. Two consecutive italic lines are avoided:
/// adjacent same-tag spans across a line break are indistinguishable from
/// one split span and legitimately canonicalize on import.
fn body() -> impl Strategy<Value = String> {
    prop::collection::vec(("[A-Za-z0-9 ,.!?']{0,24}", any::<bool>()), 0..4).prop_map(|lines| {
        let mut out = Vec::new();
        let mut prev_italic = false;
        for (s, italic) in lines {
            let s = s.trim().to_string();
            let italic = italic && !s.is_empty() && !prev_italic;
            prev_italic = italic;
            out.push(if italic { format!("[i]{s}[/i]") } else { s });
        }
        out.join("\n")
    })
}

/// A chapter plan: title plus scene bodies.
fn novel_plan() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec((title(), prop::collection::vec(body(), 0..3)), 1..4)
}

fn build_novel(plan: Vec<(String, Vec<String>)>) -> Novel {
    let mut novel = Novel::new();
    novel.title = "Property".to_string();
    let mut registry = IdRegistry::new();

    for (chapter_title, bodies) in plan {
        let mut chapter = Chapter::new(registry.assign(NodeKind::Chapter));
        chapter.title = if chapter_title.is_empty() {
            "Untitled".to_string()
        } else {
            chapter_title
        };

        for body in bodies {
            let mut scene = Scene::new(registry.assign(NodeKind::Scene));
            scene.title = "Scene".to_string();
            scene.set_body(body);
            chapter.scenes.push(scene.id.clone());
            novel.scenes.insert(scene.id.clone(), scene);
        }

        novel.chapter_order.push(chapter.id.clone());
        novel.chapters.insert(chapter.id.clone(), chapter);
    }

    novel
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_unedited_export_decodes_to_same_skeleton(plan in novel_plan()) {
        let novel = build_novel(plan);
        let html = manuscript(&novel);
        let (skeleton, _) = read_manuscript(&html).unwrap();
        prop_assert!(Skeleton::narrative(&novel).verify_matches(&skeleton).is_ok());
    }

    #[test]
    fn prop_unedited_export_preserves_bodies(plan in novel_plan()) {
        let novel = build_novel(plan);
        let html = manuscript(&novel);
        let (_, patch) = read_manuscript(&html).unwrap();

        for (id, edit) in &patch.scenes {
            prop_assert_eq!(
                edit.body.as_deref().unwrap(),
                novel.scenes[id].body(),
                "body drifted for scene {}",
                id
            );
        }
        prop_assert_eq!(patch.scenes.len(), novel.scenes.len());
    }

    #[test]
    fn prop_counts_ignore_inline_markup(lines in prop::collection::vec("[A-Za-z0-9 !?']{1,24}", 1..4)) {
        let plain = lines.join("\n");
        let italic = lines
            .iter()
            .map(|l| format!("[i]{l}[/i]"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut a = Scene::new("1");
        a.set_body(plain);
        let mut b = Scene::new("2");
        b.set_body(italic);

        prop_assert_eq!(a.word_count(), b.word_count());
        prop_assert_eq!(a.letter_count(), b.letter_count());
    }
}

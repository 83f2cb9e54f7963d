//! Creating a new project from a plain, marker-free document.
//!
//! A manuscript written outside yWriter has no markers to round-trip, but
//! it has structure worth keeping: part and chapter headings, and scene
//! dividers. This reader builds a fresh [`Novel`] from that outline,
//! assigning every new node an id from an [`IdRegistry`] scoped to the
//! run.

use super::SCENE_DIVIDER;
use crate::error::{Error, Result};
use crate::markup::collapse_spans;
use crate::novel::{Chapter, ChapterKind, IdRegistry, NodeKind, Novel, Scene};
use crate::structure::{StructureEvent, grammar, scan};

/// Scenes shorter than this import with "outline" status instead of
/// "draft".
const LOW_WORD_COUNT: usize = 10;

/// Build a new project from a document without structural markers.
///
/// `<h1>`/`<h2>` headings start parts and chapters, `<h3>` headings and
/// `* * *` dividers start scenes, and everything else becomes scene text.
pub fn read_new_project(text: &str, title: &str) -> Result<Novel> {
    let mut builder = Builder::new(title);

    for event in scan(text, &grammar::NARRATIVE) {
        match event {
            StructureEvent::Begin(kind, id) => {
                return Err(Error::MalformedStructure(format!(
                    "document already contains a {}:{} marker; import it as a manuscript instead",
                    kind.prefix(),
                    id
                )));
            }
            StructureEvent::End(_) => {
                return Err(Error::MalformedStructure(
                    "document already contains structural end markers".to_string(),
                ));
            }
            StructureEvent::Heading(level @ 1..=2, text) => builder.begin_chapter(level, text),
            StructureEvent::Heading(3, text) => builder.begin_scene(Some(text)),
            StructureEvent::Heading(_, text) | StructureEvent::Text(text)
                if text.trim() == SCENE_DIVIDER =>
            {
                builder.begin_scene(None)
            }
            StructureEvent::Heading(..) => {}
            StructureEvent::Text(line) => builder.push_line(line),
        }
    }

    Ok(builder.finish())
}

struct Builder {
    novel: Novel,
    registry: IdRegistry,
    chapter: Option<String>,
    scene: Option<(String, Vec<String>)>,
    /// A divider or `<h3>` announced a scene whose text has not started.
    pending_scene_title: Option<Option<String>>,
}

impl Builder {
    fn new(title: &str) -> Self {
        let mut novel = Novel::new();
        novel.title = title.to_string();
        Self {
            novel,
            registry: IdRegistry::new(),
            chapter: None,
            scene: None,
            pending_scene_title: None,
        }
    }

    fn begin_chapter(&mut self, level: u8, title: String) {
        self.flush_scene();
        self.pending_scene_title = None;

        let id = self.registry.assign(NodeKind::Chapter);
        let mut chapter = Chapter::new(id.clone());
        chapter.title = title;
        chapter.kind = if level == 1 {
            ChapterKind::SectionStart
        } else {
            ChapterKind::Normal
        };

        self.novel.chapter_order.push(id.clone());
        self.novel.chapters.insert(id.clone(), chapter);
        self.chapter = Some(id);
    }

    fn begin_scene(&mut self, title: Option<String>) {
        self.flush_scene();
        self.pending_scene_title = Some(title);
    }

    fn push_line(&mut self, line: String) {
        // Front matter before the first heading carries no structure.
        if self.chapter.is_none() {
            return;
        }

        if self.scene.is_none() {
            let title = self.pending_scene_title.take().flatten();
            let id = self.registry.assign(NodeKind::Scene);
            let mut scene = Scene::new(id.clone());
            scene.title = title.unwrap_or_else(|| format!("Scene {id}"));

            let chapter_id = self.chapter.as_ref().expect("checked above");
            self.novel
                .chapters
                .get_mut(chapter_id)
                .expect("chapter registered on begin")
                .scenes
                .push(id.clone());
            self.novel.scenes.insert(id.clone(), scene);
            self.scene = Some((id, Vec::new()));
        }

        if let Some((_, lines)) = &mut self.scene {
            lines.push(line);
        }
    }

    fn flush_scene(&mut self) {
        if let Some((id, lines)) = self.scene.take() {
            let body = collapse_spans(&lines.join("\n"));
            let scene = self.novel.scenes.get_mut(&id).expect("scene registered");
            scene.set_body(body.trim().to_string());
            scene.status = Some(if scene.word_count() < LOW_WORD_COUNT {
                1
            } else {
                2
            });
        }
    }

    fn finish(mut self) -> Novel {
        self.flush_scene();
        self.novel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "<html><head><title>Draft</title></head><body>\n\
        <p>Front matter, ignored.</p>\n\
        <h1>Part One</h1>\n\
        <h2>Arrival</h2>\n\
        <p>The boat came in late. Nobody was waiting at the quay.</p>\n\
        <p>It rained.</p>\n\
        <h4>* * *</h4>\n\
        <p>Short.</p>\n\
        <h3>Named scene</h3>\n\
        <p>A scene with its own heading.</p>\n\
        </body></html>";

    #[test]
    fn builds_chapters_and_scenes() {
        let novel = read_new_project(PLAIN, "Draft").unwrap();

        assert_eq!(novel.chapter_order, vec!["1", "2"]);
        assert_eq!(novel.chapters["1"].kind, ChapterKind::SectionStart);
        assert_eq!(novel.chapters["1"].title, "Part One");
        assert!(novel.chapters["1"].scenes.is_empty());

        let chapter = &novel.chapters["2"];
        assert_eq!(chapter.title, "Arrival");
        assert_eq!(chapter.scenes, vec!["1", "2", "3"]);
    }

    #[test]
    fn scene_ids_come_from_the_registry() {
        let novel = read_new_project(PLAIN, "Draft").unwrap();
        assert_eq!(
            novel.scenes["1"].body(),
            "The boat came in late. Nobody was waiting at the quay.\nIt rained."
        );
        assert_eq!(novel.scenes["1"].title, "Scene 1");
        assert_eq!(novel.scenes["3"].title, "Named scene");
    }

    #[test]
    fn short_scenes_get_outline_status() {
        let novel = read_new_project(PLAIN, "Draft").unwrap();
        assert_eq!(novel.scenes["1"].status, Some(2));
        assert_eq!(novel.scenes["2"].status, Some(1));
    }

    #[test]
    fn front_matter_is_dropped() {
        let novel = read_new_project(PLAIN, "Draft").unwrap();
        assert!(
            novel
                .scenes
                .values()
                .all(|s| !s.body().contains("Front matter"))
        );
    }

    #[test]
    fn marker_bearing_document_is_refused() {
        let html = "<p>[ChID:1]</p><h2>One</h2><p>[/ChID]</p>";
        assert!(matches!(
            read_new_project(html, "Draft"),
            Err(Error::MalformedStructure(_))
        ));
    }

    #[test]
    fn validates_clean() {
        let novel = read_new_project(PLAIN, "Draft").unwrap();
        assert!(novel.validate().is_ok());
    }
}

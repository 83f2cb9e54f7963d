//! HTML document generation.

use std::fmt::Write as _;

use super::SCENE_DIVIDER;
use crate::markup::{escape_xml, yw_to_html};
use crate::novel::{Chapter, ChapterKind, Novel, Scene};

/// Style that keeps marker paragraphs out of the reader's way while
/// surviving every word processor's save cycle.
const MARKER_STYLE: &str = " style=\"font-size:x-small\"";

fn header(title: &str) -> String {
    format!(
        "<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
         <style type=\"text/css\">\n\
         body {{font: 1em monospace; margin: 3em;}}\n\
         h1, h2, h3, h4 {{font: 1em monospace; text-align: center;}}\n\
         p.textbody {{margin-top:0; margin-bottom:0;}}\n\
         </style>\n\
         <title>{}</title>\n</head>\n<body>\n",
        escape_xml(title)
    )
}

const FOOTER: &str = "</body>\n</html>\n";

// ============================================================================
// Narrative flavors
// ============================================================================

/// The editable manuscript: full scene bodies between invisible markers.
pub fn manuscript(novel: &Novel) -> String {
    narrative(novel, MARKER_STYLE)
}

/// The proof-reading variant: same structure, visibly marked so the
/// markers survive printing and retyping.
pub fn proof(novel: &Novel) -> String {
    narrative(novel, "")
}

fn narrative(novel: &Novel, marker_style: &str) -> String {
    let mut html = header(&novel.title);

    for chapter in used_chapters(novel) {
        let _ = writeln!(html, "<p{marker_style}>[ChID:{}]</p>", chapter.id);
        let heading = match chapter.kind {
            ChapterKind::SectionStart => "h1",
            ChapterKind::Normal => "h2",
        };
        let _ = writeln!(
            html,
            "<{heading}>{}</{heading}>",
            escape_xml(&chapter.title)
        );

        for (index, scene) in used_scenes(novel, chapter).enumerate() {
            if index > 0 && !scene.append_to_previous {
                let _ = writeln!(html, "<h4>{SCENE_DIVIDER}</h4>");
            }
            let _ = writeln!(html, "<p{marker_style}>[ScID:{}]</p>", scene.id);
            let _ = writeln!(html, "<p class=\"textbody\">{}</p>", yw_to_html(scene.body()));
            let _ = writeln!(html, "<p{marker_style}>[/ScID]</p>");
        }

        let _ = writeln!(html, "<p{marker_style}>[/ChID]</p>");
    }

    html.push_str(FOOTER);
    html
}

// ============================================================================
// Description flavors
// ============================================================================

/// Chapter summaries in tagged divisions.
pub fn chapter_descriptions(novel: &Novel) -> String {
    let mut html = header(&novel.title);

    for chapter in used_chapters(novel) {
        let _ = writeln!(html, "<div id=\"ChID:{}\">", chapter.id);
        let _ = writeln!(html, "<h2>{}</h2>", escape_xml(&chapter.title));
        description_paragraphs(&mut html, chapter.description.as_deref());
        html.push_str("</div>\n");
    }

    html.push_str(FOOTER);
    html
}

/// Scene summaries, nested under their chapters.
pub fn scene_descriptions(novel: &Novel) -> String {
    let mut html = header(&novel.title);

    for chapter in used_chapters(novel) {
        let _ = writeln!(html, "<div id=\"ChID:{}\">", chapter.id);
        let _ = writeln!(html, "<h2>{}</h2>", escape_xml(&chapter.title));
        for scene in used_scenes(novel, chapter) {
            let _ = writeln!(html, "<div id=\"ScID:{}\">", scene.id);
            let _ = writeln!(html, "<h3>{}</h3>", escape_xml(&scene.title));
            description_paragraphs(&mut html, scene.description.as_deref());
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n");
    }

    html.push_str(FOOTER);
    html
}

/// Character descriptions in tagged divisions.
pub fn character_sheet(novel: &Novel) -> String {
    entity_sheet(
        novel,
        "CrID",
        novel.character_order.iter().filter_map(|id| {
            let c = novel.characters.get(id)?;
            (!c.is_unused).then_some((c.id.as_str(), c.title.as_str(), c.description.as_deref()))
        }),
    )
}

/// Location descriptions in tagged divisions.
pub fn location_sheet(novel: &Novel) -> String {
    entity_sheet(
        novel,
        "LcID",
        novel.location_order.iter().filter_map(|id| {
            let l = novel.locations.get(id)?;
            (!l.is_unused).then_some((l.id.as_str(), l.title.as_str(), l.description.as_deref()))
        }),
    )
}

/// Item descriptions in tagged divisions.
pub fn item_sheet(novel: &Novel) -> String {
    entity_sheet(
        novel,
        "ItID",
        novel.item_order.iter().filter_map(|id| {
            let i = novel.items.get(id)?;
            (!i.is_unused).then_some((i.id.as_str(), i.title.as_str(), i.description.as_deref()))
        }),
    )
}

fn entity_sheet<'a>(
    novel: &Novel,
    prefix: &str,
    entries: impl Iterator<Item = (&'a str, &'a str, Option<&'a str>)>,
) -> String {
    let mut html = header(&novel.title);

    for (id, title, description) in entries {
        let _ = writeln!(html, "<div id=\"{prefix}:{id}\">");
        let _ = writeln!(html, "<h2>{}</h2>", escape_xml(title));
        description_paragraphs(&mut html, description);
        html.push_str("</div>\n");
    }

    html.push_str(FOOTER);
    html
}

// ============================================================================
// Helpers
// ============================================================================

fn used_chapters(novel: &Novel) -> impl Iterator<Item = &Chapter> {
    novel.chapters_in_order().filter(|ch| !ch.is_unused)
}

fn used_scenes<'a>(novel: &'a Novel, chapter: &'a Chapter) -> impl Iterator<Item = &'a Scene> {
    novel.scenes_of(chapter).filter(|sc| !sc.is_unused)
}

/// One `<p>` per description line. An absent or empty description emits
/// nothing: the enclosing markers alone say "present but empty".
fn description_paragraphs(html: &mut String, description: Option<&str>) {
    let Some(description) = description else {
        return;
    };
    if description.is_empty() {
        return;
    }
    for line in description.split('\n') {
        let _ = writeln!(html, "<p>{}</p>", escape_xml(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::novel::{Chapter, Scene};

    fn sample() -> Novel {
        let mut novel = Novel::new();
        novel.title = "Book & Title".to_string();

        let mut chapter = Chapter::new("1");
        chapter.title = "One".to_string();
        chapter.scenes = vec!["1".to_string(), "2".to_string()];
        novel.chapter_order.push("1".to_string());
        novel.chapters.insert("1".to_string(), chapter);

        let mut scene = Scene::new("1");
        scene.title = "First".to_string();
        scene.set_body("Hello.");
        novel.scenes.insert("1".to_string(), scene);

        let mut scene = Scene::new("2");
        scene.title = "Second".to_string();
        scene.set_body("");
        novel.scenes.insert("2".to_string(), scene);

        novel
    }

    #[test]
    fn manuscript_embeds_invisible_markers() {
        let html = manuscript(&sample());
        assert!(html.contains("<p style=\"font-size:x-small\">[ChID:1]</p>"));
        assert!(html.contains("<p style=\"font-size:x-small\">[ScID:1]</p>"));
        assert!(html.contains("<p style=\"font-size:x-small\">[/ScID]</p>"));
        assert!(html.contains("<p style=\"font-size:x-small\">[/ChID]</p>"));
    }

    #[test]
    fn proof_markers_are_visible() {
        let html = proof(&sample());
        assert!(html.contains("<p>[ChID:1]</p>"));
        assert!(!html.contains("font-size:x-small"));
    }

    #[test]
    fn empty_scene_emits_empty_paragraph_not_placeholder() {
        let html = manuscript(&sample());
        assert!(html.contains("<p class=\"textbody\"></p>"));
    }

    #[test]
    fn divider_between_scenes_but_not_after_heading() {
        let html = manuscript(&sample());
        let divider_pos = html.find("* * *").unwrap();
        let first_scene_pos = html.find("[ScID:1]").unwrap();
        assert!(divider_pos > first_scene_pos);
        assert_eq!(html.matches("* * *").count(), 1);
    }

    #[test]
    fn append_to_previous_suppresses_divider() {
        let mut novel = sample();
        novel.scenes.get_mut("2").unwrap().append_to_previous = true;
        let html = manuscript(&novel);
        assert!(!html.contains("* * *"));
    }

    #[test]
    fn title_is_escaped() {
        let html = manuscript(&sample());
        assert!(html.contains("<title>Book &amp; Title</title>"));
    }

    #[test]
    fn unused_chapters_are_excluded() {
        let mut novel = sample();
        novel.chapters.get_mut("1").unwrap().is_unused = true;
        let html = manuscript(&novel);
        assert!(!html.contains("[ChID:1]"));
    }
}

//! yw7 project file generation.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::CDATA_TAGS;
use crate::error::{Error, Result};
use crate::novel::{ChapterKind, Novel, SceneKind};
use crate::util::write_text_file;

/// Whether yWriter's advisory lock file is present for a project path.
///
/// The lock signals that the project is open in yWriter itself; writing
/// the file under it would invite corruption, so writeback refuses.
pub fn is_locked(path: &Path) -> bool {
    lock_path(path).is_file()
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Serialize the novel and write it to a `.yw7` file.
///
/// Fails with [`Error::ResourceLocked`] before touching the file if the
/// advisory lock is present.
pub fn write_yw7(novel: &Novel, path: &Path) -> Result<()> {
    if is_locked(path) {
        return Err(Error::ResourceLocked(path.display().to_string()));
    }
    write_text_file(path, &render_yw7(novel))
}

/// Render the novel as yw7 XML.
pub fn render_yw7(novel: &Novel) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<YWRITER7>\n");

    xml.push_str("<PROJECT>\n<Ver>7</Ver>\n");
    element(&mut xml, "Title", &novel.title);
    element(&mut xml, "AuthorName", &novel.author);
    element(&mut xml, "Desc", &novel.description);
    xml.push_str("</PROJECT>\n");

    xml.push_str("<CHAPTERS>\n");
    for id in &novel.chapter_order {
        let Some(chapter) = novel.chapters.get(id) else {
            continue;
        };
        xml.push_str("<CHAPTER>\n");
        element(&mut xml, "ID", &chapter.id);
        element(&mut xml, "Title", &chapter.title);
        if let Some(desc) = &chapter.description {
            element(&mut xml, "Desc", desc);
        }
        if chapter.kind == ChapterKind::SectionStart {
            element(&mut xml, "SectionStart", "-1");
        }
        if chapter.is_unused {
            element(&mut xml, "Unused", "-1");
        }
        let kind = if chapter.kind == ChapterKind::SectionStart { 1 } else { 0 };
        element(&mut xml, "Type", &kind.to_string());
        xml.push_str("<Scenes>\n");
        for scene_id in &chapter.scenes {
            element(&mut xml, "ScID", scene_id);
        }
        xml.push_str("</Scenes>\n</CHAPTER>\n");
    }
    xml.push_str("</CHAPTERS>\n");

    xml.push_str("<SCENES>\n");
    for chapter in novel.chapters_in_order() {
        for scene in novel.scenes_of(chapter) {
            xml.push_str("<SCENE>\n");
            element(&mut xml, "ID", &scene.id);
            element(&mut xml, "Title", &scene.title);
            if let Some(desc) = &scene.description {
                element(&mut xml, "Desc", desc);
            }
            if scene.is_unused {
                element(&mut xml, "Unused", "-1");
            }
            if scene.append_to_previous {
                element(&mut xml, "AppendToPrev", "-1");
            }
            if let Some(status) = scene.status {
                element(&mut xml, "Status", &status.to_string());
            }
            if let Some(notes) = &scene.notes {
                element(&mut xml, "Notes", notes);
            }
            if !scene.tags.is_empty() {
                element(&mut xml, "Tags", &scene.tags.join(";"));
            }
            match scene.kind {
                SceneKind::Normal => {}
                SceneKind::Notes => scene_type_field(&mut xml, 1),
                SceneKind::Todo => scene_type_field(&mut xml, 2),
            }
            element(&mut xml, "SceneContent", scene.body());
            element(&mut xml, "WordCount", &scene.word_count().to_string());
            element(&mut xml, "LetterCount", &scene.letter_count().to_string());
            xml.push_str("</SCENE>\n");
        }
    }
    xml.push_str("</SCENES>\n");

    xml.push_str("<CHARACTERS>\n");
    for id in &novel.character_order {
        let Some(character) = novel.characters.get(id) else {
            continue;
        };
        xml.push_str("<CHARACTER>\n");
        element(&mut xml, "ID", &character.id);
        element(&mut xml, "Title", &character.title);
        if let Some(full_name) = &character.full_name {
            element(&mut xml, "FullName", full_name);
        }
        if let Some(aka) = &character.aka {
            element(&mut xml, "AKA", aka);
        }
        if let Some(desc) = &character.description {
            element(&mut xml, "Desc", desc);
        }
        if let Some(bio) = &character.bio {
            element(&mut xml, "Bio", bio);
        }
        if let Some(goals) = &character.goals {
            element(&mut xml, "Goals", goals);
        }
        if let Some(notes) = &character.notes {
            element(&mut xml, "Notes", notes);
        }
        if !character.tags.is_empty() {
            element(&mut xml, "Tags", &character.tags.join(";"));
        }
        if character.is_major {
            element(&mut xml, "Major", "-1");
        }
        if character.is_unused {
            element(&mut xml, "Unused", "-1");
        }
        xml.push_str("</CHARACTER>\n");
    }
    xml.push_str("</CHARACTERS>\n");

    xml.push_str("<LOCATIONS>\n");
    for id in &novel.location_order {
        let Some(location) = novel.locations.get(id) else {
            continue;
        };
        world_element(
            &mut xml,
            "LOCATION",
            &location.id,
            &location.title,
            location.description.as_deref(),
            location.aka.as_deref(),
            &location.tags,
            location.is_unused,
        );
    }
    xml.push_str("</LOCATIONS>\n");

    xml.push_str("<ITEMS>\n");
    for id in &novel.item_order {
        let Some(item) = novel.items.get(id) else {
            continue;
        };
        world_element(
            &mut xml,
            "ITEM",
            &item.id,
            &item.title,
            item.description.as_deref(),
            item.aka.as_deref(),
            &item.tags,
            item.is_unused,
        );
    }
    xml.push_str("</ITEMS>\n");

    xml.push_str("</YWRITER7>\n");
    xml
}

#[allow(clippy::too_many_arguments)]
fn world_element(
    xml: &mut String,
    name: &str,
    id: &str,
    title: &str,
    description: Option<&str>,
    aka: Option<&str>,
    tags: &[String],
    is_unused: bool,
) {
    let _ = writeln!(xml, "<{name}>");
    element(xml, "ID", id);
    element(xml, "Title", title);
    if let Some(aka) = aka {
        element(xml, "AKA", aka);
    }
    if let Some(desc) = description {
        element(xml, "Desc", desc);
    }
    if !tags.is_empty() {
        element(xml, "Tags", &tags.join(";"));
    }
    if is_unused {
        element(xml, "Unused", "-1");
    }
    let _ = writeln!(xml, "</{name}>");
}

fn scene_type_field(xml: &mut String, value: u8) {
    let _ = writeln!(
        xml,
        "<Fields>\n<Field_SceneType>{value}</Field_SceneType>\n</Fields>"
    );
}

/// Write one leaf element, using a CDATA section for the text-bearing tags
/// yWriter expects it on. An empty CDATA section gets a single-space
/// placeholder: `<![CDATA[]]>` breaks yWriter's own parser.
fn element(xml: &mut String, name: &str, value: &str) {
    if CDATA_TAGS.contains(&name) {
        let value = if value.is_empty() { " " } else { value };
        let value = value.replace("]]>", "]]]]><![CDATA[>");
        let _ = writeln!(xml, "<{name}><![CDATA[{value}]]></{name}>");
    } else {
        let _ = writeln!(xml, "<{name}>{}</{name}>", escape(value));
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::novel::{Chapter, Scene};
    use crate::yw7::parse_yw7;

    fn sample() -> Novel {
        let mut novel = Novel::new();
        novel.title = "Book".to_string();
        novel.author = "Author".to_string();

        let mut chapter = Chapter::new("1");
        chapter.title = "One".to_string();
        chapter.scenes.push("1".to_string());
        novel.chapter_order.push("1".to_string());
        novel.chapters.insert("1".to_string(), chapter);

        let mut scene = Scene::new("1");
        scene.title = "Opening".to_string();
        scene.set_body("Hello\n\nWorld");
        novel.scenes.insert("1".to_string(), scene);

        novel
    }

    #[test]
    fn render_then_parse_round_trips() {
        let novel = sample();
        let parsed = parse_yw7(&render_yw7(&novel)).unwrap();
        assert_eq!(parsed.title, "Book");
        assert_eq!(parsed.chapters["1"].scenes, vec!["1"]);
        assert_eq!(parsed.scenes["1"].body(), "Hello\n\nWorld");
        assert_eq!(parsed.scenes["1"].word_count(), 2);
    }

    #[test]
    fn counts_are_written() {
        let xml = render_yw7(&sample());
        assert!(xml.contains("<WordCount>2</WordCount>"));
        assert!(xml.contains("<LetterCount>10</LetterCount>"));
    }

    #[test]
    fn empty_cdata_gets_placeholder_space() {
        let mut novel = sample();
        novel.scenes.get_mut("1").unwrap().set_body("");
        let xml = render_yw7(&novel);
        assert!(xml.contains("<SceneContent><![CDATA[ ]]></SceneContent>"));
        assert!(!xml.contains("<![CDATA[]]>"));

        // And the placeholder does not leak back into the model.
        let parsed = parse_yw7(&xml).unwrap();
        assert_eq!(parsed.scenes["1"].body(), "");
    }

    #[test]
    fn cdata_terminator_in_body_survives() {
        let mut novel = sample();
        novel.scenes.get_mut("1").unwrap().set_body("a ]]> b");
        let parsed = parse_yw7(&render_yw7(&novel)).unwrap();
        assert_eq!(parsed.scenes["1"].body(), "a ]]> b");
    }

    #[test]
    fn lock_file_path() {
        assert_eq!(
            lock_path(Path::new("/tmp/book.yw7")),
            PathBuf::from("/tmp/book.yw7.lock")
        );
    }
}

//! yw7 project file parsing.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::markup::unescape_entities;
use crate::novel::{Chapter, ChapterKind, Character, Item, Location, Novel, Scene, SceneKind};
use crate::util::read_text_file;

/// Read and parse a `.yw7` project file.
pub fn read_yw7(path: &Path) -> Result<Novel> {
    let xml = read_text_file(path)?;
    parse_yw7(&xml)
}

/// Parse yw7 XML into a [`Novel`].
///
/// Structural elements (`ID`, `Title`, a scene's `SceneContent`) are
/// required and fail with [`Error::MissingElement`]; descriptive metadata
/// is optional. Stored word and letter counts are ignored — they are
/// derived data and recomputed from the scene bodies.
pub fn parse_yw7(xml: &str) -> Result<Novel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut novel = Novel::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"PROJECT" => parse_project(&mut reader, &mut novel)?,
                b"CHAPTER" => {
                    let chapter = parse_chapter(&mut reader)?;
                    novel.chapter_order.push(chapter.id.clone());
                    novel.chapters.insert(chapter.id.clone(), chapter);
                }
                b"SCENE" => {
                    let scene = parse_scene(&mut reader)?;
                    novel.scenes.insert(scene.id.clone(), scene);
                }
                b"CHARACTER" => {
                    let character = parse_character(&mut reader)?;
                    novel.character_order.push(character.id.clone());
                    novel.characters.insert(character.id.clone(), character);
                }
                b"LOCATION" => {
                    let location = parse_world(&mut reader, b"LOCATION")?;
                    novel.location_order.push(location.id.clone());
                    novel.locations.insert(
                        location.id.clone(),
                        Location {
                            id: location.id,
                            title: location.title,
                            description: location.description,
                            aka: location.aka,
                            tags: location.tags,
                            is_unused: location.is_unused,
                        },
                    );
                }
                b"ITEM" => {
                    let item = parse_world(&mut reader, b"ITEM")?;
                    novel.item_order.push(item.id.clone());
                    novel.items.insert(
                        item.id.clone(),
                        Item {
                            id: item.id,
                            title: item.title,
                            description: item.description,
                            aka: item.aka,
                            tags: item.tags,
                            is_unused: item.is_unused,
                        },
                    );
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    novel.validate()?;
    Ok(novel)
}

// ============================================================================
// Section parsers
// ============================================================================

fn parse_project(reader: &mut Reader<&[u8]>, novel: &mut Novel) -> Result<()> {
    let mut fields = FieldReader::new(b"PROJECT");
    while let Some((name, value)) = fields.next_field(reader)? {
        match name.as_slice() {
            b"Title" => novel.title = value,
            b"AuthorName" => novel.author = value,
            b"Desc" => novel.description = value,
            _ => {}
        }
    }
    Ok(())
}

fn parse_chapter(reader: &mut Reader<&[u8]>) -> Result<Chapter> {
    let mut chapter = Chapter::default();
    let mut id = None;
    let mut title = None;

    let mut fields = FieldReader::new(b"CHAPTER");
    loop {
        match fields.next_field(reader)? {
            Some((name, value)) => match name.as_slice() {
                b"ID" => id = Some(value),
                b"Title" => title = Some(value),
                b"Desc" => chapter.description = Some(value),
                b"SectionStart" => chapter.kind = ChapterKind::SectionStart,
                b"Unused" => chapter.is_unused = true,
                _ => {}
            },
            None if fields.enters(b"Scenes") => {
                chapter.scenes = parse_scene_ids(reader)?;
                fields.clear_entered();
            }
            None if fields.enters(b"Fields") => {
                skip_container(reader, b"Fields")?;
                fields.clear_entered();
            }
            None => break,
        }
    }

    chapter.id = id.ok_or_else(|| Error::MissingElement("CHAPTER/ID".to_string()))?;
    chapter.title = title.ok_or_else(|| Error::MissingElement("CHAPTER/Title".to_string()))?;
    Ok(chapter)
}

fn parse_scene_ids(reader: &mut Reader<&[u8]>) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut fields = FieldReader::new(b"Scenes");
    while let Some((name, value)) = fields.next_field(reader)? {
        if name.as_slice() == b"ScID" {
            ids.push(value);
        }
    }
    Ok(ids)
}

fn parse_scene(reader: &mut Reader<&[u8]>) -> Result<Scene> {
    let mut scene = Scene::default();
    let mut id = None;
    let mut title = None;
    let mut body = None;

    let mut fields = FieldReader::new(b"SCENE");
    loop {
        match fields.next_field(reader)? {
            Some((name, value)) => match name.as_slice() {
                b"ID" => id = Some(value),
                b"Title" => title = Some(value),
                b"Desc" => scene.description = Some(value),
                b"SceneContent" => body = Some(value),
                b"Unused" => scene.is_unused = true,
                b"AppendToPrev" => scene.append_to_previous = true,
                b"Status" => scene.status = value.parse().ok(),
                b"Notes" => scene.notes = Some(value),
                b"Tags" => scene.tags = split_tags(&value),
                // WordCount / LetterCount are derived; ignored on read.
                _ => {}
            },
            None if fields.enters(b"Fields") => {
                scene.kind = parse_scene_kind(reader)?;
                fields.clear_entered();
            }
            None => break,
        }
    }

    let id = id.ok_or_else(|| Error::MissingElement("SCENE/ID".to_string()))?;
    let title = title.ok_or_else(|| Error::MissingElement("SCENE/Title".to_string()))?;
    let body = body.ok_or_else(|| Error::MissingElement("SCENE/SceneContent".to_string()))?;

    scene.id = id;
    scene.title = title;
    scene.set_body(body);
    Ok(scene)
}

/// Consume a container whose content this subset does not use.
fn skip_container(reader: &mut Reader<&[u8]>, container: &'static [u8]) -> Result<()> {
    let mut fields = FieldReader::new(container);
    while fields.next_field(reader)?.is_some() {}
    Ok(())
}

fn parse_scene_kind(reader: &mut Reader<&[u8]>) -> Result<SceneKind> {
    let mut kind = SceneKind::Normal;
    let mut fields = FieldReader::new(b"Fields");
    while let Some((name, value)) = fields.next_field(reader)? {
        if name.as_slice() == b"Field_SceneType" {
            kind = match value.trim() {
                "1" => SceneKind::Notes,
                "2" => SceneKind::Todo,
                _ => SceneKind::Normal,
            };
        }
    }
    Ok(kind)
}

fn parse_character(reader: &mut Reader<&[u8]>) -> Result<Character> {
    let mut character = Character::default();
    let mut id = None;
    let mut title = None;

    let mut fields = FieldReader::new(b"CHARACTER");
    while let Some((name, value)) = fields.next_field(reader)? {
        match name.as_slice() {
            b"ID" => id = Some(value),
            b"Title" => title = Some(value),
            b"Desc" => character.description = Some(value),
            b"AKA" => character.aka = Some(value),
            b"Tags" => character.tags = split_tags(&value),
            b"FullName" => character.full_name = Some(value),
            b"Bio" => character.bio = Some(value),
            b"Goals" => character.goals = Some(value),
            b"Notes" => character.notes = Some(value),
            b"Major" => character.is_major = true,
            b"Unused" => character.is_unused = true,
            _ => {}
        }
    }

    character.id = id.ok_or_else(|| Error::MissingElement("CHARACTER/ID".to_string()))?;
    character.title = title.ok_or_else(|| Error::MissingElement("CHARACTER/Title".to_string()))?;
    Ok(character)
}

/// Shared shape of LOCATION and ITEM elements.
struct WorldFields {
    id: String,
    title: String,
    description: Option<String>,
    aka: Option<String>,
    tags: Vec<String>,
    is_unused: bool,
}

fn parse_world(reader: &mut Reader<&[u8]>, element: &'static [u8]) -> Result<WorldFields> {
    let mut id = None;
    let mut title = None;
    let mut description = None;
    let mut aka = None;
    let mut tags = Vec::new();
    let mut is_unused = false;

    let mut fields = FieldReader::new(element);
    while let Some((name, value)) = fields.next_field(reader)? {
        match name.as_slice() {
            b"ID" => id = Some(value),
            b"Title" => title = Some(value),
            b"Desc" => description = Some(value),
            b"AKA" => aka = Some(value),
            b"Tags" => tags = split_tags(&value),
            b"Unused" => is_unused = true,
            _ => {}
        }
    }

    let label = String::from_utf8_lossy(element);
    Ok(WorldFields {
        id: id.ok_or_else(|| Error::MissingElement(format!("{label}/ID")))?,
        title: title.ok_or_else(|| Error::MissingElement(format!("{label}/Title")))?,
        description,
        aka,
        tags,
        is_unused,
    })
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Leaf field reading
// ============================================================================

/// Reads the leaf fields of one container element, in document order,
/// until the container's end tag.
///
/// A nested container (like `CHAPTER/Scenes`) is reported through
/// [`FieldReader::enters`] so the caller can hand the reader to a
/// sub-parser.
struct FieldReader {
    container: &'static [u8],
    current: Option<Vec<u8>>,
    buf: String,
    entered: Option<Vec<u8>>,
    done: bool,
}

impl FieldReader {
    fn new(container: &'static [u8]) -> Self {
        Self {
            container,
            current: None,
            buf: String::new(),
            entered: None,
            done: false,
        }
    }

    fn enters(&self, name: &[u8]) -> bool {
        self.entered.as_deref() == Some(name)
    }

    fn clear_entered(&mut self) {
        self.entered = None;
    }

    /// The next `(name, text)` leaf, or `None` at the container's end.
    fn next_field(&mut self, reader: &mut Reader<&[u8]>) -> Result<Option<(Vec<u8>, String)>> {
        if self.done {
            return Ok(None);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    if is_container(&name) {
                        self.entered = Some(name);
                        return Ok(None);
                    }
                    self.current = Some(name);
                    self.buf.clear();
                }
                Event::Empty(e) => {
                    // Flag elements may be written self-closing.
                    return Ok(Some((e.name().as_ref().to_vec(), String::new())));
                }
                Event::Text(e) => {
                    if self.current.is_some() {
                        self.buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::GeneralRef(e) => {
                    if self.current.is_some() {
                        let entity = String::from_utf8_lossy(e.as_ref());
                        self.buf
                            .push_str(&unescape_entities(&format!("&{entity};")));
                    }
                }
                Event::CData(e) => {
                    if self.current.is_some() {
                        self.buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == self.container {
                        self.done = true;
                        return Ok(None);
                    }
                    if let Some(name) = self.current.take() {
                        if e.name().as_ref() == name.as_slice() {
                            let mut value = std::mem::take(&mut self.buf);
                            // A single space inside CDATA is yWriter's
                            // placeholder for "empty"; it must not leak
                            // into the model.
                            if value == " " {
                                value.clear();
                            }
                            return Ok(Some((name, value)));
                        }
                        self.current = Some(name);
                    }
                }
                Event::Eof => {
                    let label = String::from_utf8_lossy(self.container);
                    return Err(Error::MissingElement(format!("unclosed {label}")));
                }
                _ => {}
            }
        }
    }
}

fn is_container(name: &[u8]) -> bool {
    matches!(name, b"Scenes" | b"Fields")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<YWRITER7>
<PROJECT>
<Ver>7</Ver>
<Title><![CDATA[Test Project]]></Title>
<AuthorName><![CDATA[A. Writer]]></AuthorName>
<Desc><![CDATA[About things.]]></Desc>
</PROJECT>
<CHAPTERS>
<CHAPTER>
<ID>1</ID>
<Title><![CDATA[Chapter One]]></Title>
<SortOrder>1</SortOrder>
<Type>0</Type>
<Scenes>
<ScID>1</ScID>
<ScID>2</ScID>
</Scenes>
</CHAPTER>
</CHAPTERS>
<SCENES>
<SCENE>
<ID>1</ID>
<Title><![CDATA[Opening]]></Title>
<SceneContent><![CDATA[It begins.]]></SceneContent>
<WordCount>999</WordCount>
<LetterCount>999</LetterCount>
</SCENE>
<SCENE>
<ID>2</ID>
<Title><![CDATA[Empty]]></Title>
<Unused>-1</Unused>
<SceneContent><![CDATA[ ]]></SceneContent>
</SCENE>
</SCENES>
<CHARACTERS>
<CHARACTER>
<ID>1</ID>
<Title><![CDATA[Ann]]></Title>
<FullName><![CDATA[Ann Example]]></FullName>
<Tags><![CDATA[protagonist;pilot]]></Tags>
<Major>-1</Major>
</CHARACTER>
</CHARACTERS>
<LOCATIONS>
<LOCATION>
<ID>1</ID>
<Title><![CDATA[Harbor]]></Title>
<Desc><![CDATA[Salt and rust.]]></Desc>
</LOCATION>
</LOCATIONS>
<ITEMS>
</ITEMS>
</YWRITER7>
"#;

    #[test]
    fn parses_project_metadata() {
        let novel = parse_yw7(MINIMAL).unwrap();
        assert_eq!(novel.title, "Test Project");
        assert_eq!(novel.author, "A. Writer");
        assert_eq!(novel.description, "About things.");
    }

    #[test]
    fn parses_chapter_scene_structure() {
        let novel = parse_yw7(MINIMAL).unwrap();
        assert_eq!(novel.chapter_order, vec!["1"]);
        assert_eq!(novel.chapters["1"].scenes, vec!["1", "2"]);
        assert_eq!(novel.scenes["1"].body(), "It begins.");
    }

    #[test]
    fn stored_counts_are_ignored_and_recomputed() {
        let novel = parse_yw7(MINIMAL).unwrap();
        assert_eq!(novel.scenes["1"].word_count(), 2);
    }

    #[test]
    fn cdata_placeholder_space_reads_as_empty() {
        let novel = parse_yw7(MINIMAL).unwrap();
        assert_eq!(novel.scenes["2"].body(), "");
        assert!(novel.scenes["2"].is_unused);
    }

    #[test]
    fn parses_characters_and_locations() {
        let novel = parse_yw7(MINIMAL).unwrap();
        let ann = &novel.characters["1"];
        assert_eq!(ann.full_name.as_deref(), Some("Ann Example"));
        assert_eq!(ann.tags, vec!["protagonist", "pilot"]);
        assert!(ann.is_major);
        assert_eq!(
            novel.locations["1"].description.as_deref(),
            Some("Salt and rust.")
        );
    }

    #[test]
    fn missing_id_is_reported() {
        let xml = "<YWRITER7><SCENES><SCENE><Title>T</Title><SceneContent></SceneContent></SCENE></SCENES></YWRITER7>";
        assert!(matches!(
            parse_yw7(xml),
            Err(Error::MissingElement(name)) if name == "SCENE/ID"
        ));
    }

    #[test]
    fn dangling_scene_reference_is_rejected() {
        let xml = r#"<YWRITER7>
<CHAPTERS><CHAPTER><ID>1</ID><Title>C</Title><Scenes><ScID>42</ScID></Scenes></CHAPTER></CHAPTERS>
<SCENES></SCENES>
</YWRITER7>"#;
        assert!(matches!(
            parse_yw7(xml),
            Err(Error::MalformedStructure(_))
        ));
    }
}

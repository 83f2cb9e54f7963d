//! The scene list table.

use std::fmt::Write as _;
use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::{SEPARATOR, decode_cell, encode_cell, parse_table, row_id};
use crate::error::{Error, Result};
use crate::merge::{DocumentPatch, ScenePatch};
use crate::novel::{NodeKind, Novel};
use crate::structure::{Skeleton, StructureEvent, build_document};

const HEADER: &str =
    "Scene link|Scene title|Scene description|Word count|Letter count|Tags|Scene notes";

/// Spaces must be encoded for the spreadsheet hyperlink to survive.
const HYPERLINK_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#');

/// Render the scene list: one row per used scene in a used chapter.
///
/// `document_path` is the table's own target path; the link cell points at
/// the sibling manuscript so a row jumps straight to its scene. Word and
/// letter counts are display-only — re-imports recompute them from the
/// scene bodies and never trust the table.
pub fn write_scene_list(novel: &Novel, document_path: &Path) -> String {
    let manuscript = manuscript_link_base(document_path);

    let mut table = String::with_capacity(1024);
    table.push_str(HEADER);
    table.push('\n');

    for chapter in novel.chapters_in_order().filter(|ch| !ch.is_unused) {
        for scene in novel.scenes_of(chapter).filter(|sc| !sc.is_unused) {
            let _ = writeln!(
                table,
                "=HYPERLINK(\"file:///{manuscript}#ScID:{id}\";\"ScID:{id}\"){sep}{title}{sep}{desc}{sep}{words}{sep}{letters}{sep}{tags}{sep}{notes}",
                id = scene.id,
                sep = SEPARATOR,
                title = encode_cell(&scene.title),
                desc = encode_cell(scene.description.as_deref().unwrap_or("")),
                words = scene.word_count(),
                letters = scene.letter_count(),
                tags = scene.tags.join(";"),
                notes = encode_cell(scene.notes.as_deref().unwrap_or("")),
            );
        }
    }

    table
}

fn manuscript_link_base(document_path: &Path) -> String {
    let path = document_path.display().to_string().replace('\\', "/");
    let path = match path.strip_suffix("_scenelist.csv") {
        Some(stem) => format!("{stem}_manuscript.html"),
        None => path,
    };
    utf8_percent_encode(&path, HYPERLINK_PATH).to_string()
}

/// Parse an edited scene list back into a skeleton and patch.
pub fn read_scene_list(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let rows = parse_table(text, HEADER)?;

    let mut events = Vec::new();
    let mut patch = DocumentPatch::default();

    for fields in rows {
        let id = row_id(fields[0], NodeKind::Scene.prefix()).ok_or_else(|| {
            Error::MalformedStructure(format!("row without a scene marker: {:?}", fields[0]))
        })?;

        events.push(StructureEvent::Begin(NodeKind::Scene, id.clone()));
        events.push(StructureEvent::End(Some(NodeKind::Scene)));

        patch.scenes.push((
            id,
            ScenePatch {
                title: Some(decode_cell(fields[1])),
                description: Some(decode_cell(fields[2])),
                tags: Some(split_tags(fields[5])),
                notes: Some(decode_cell(fields[6])),
                ..Default::default()
            },
        ));
    }

    let doc = build_document(events)?;
    Ok((doc.skeleton, patch))
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

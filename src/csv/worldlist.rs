//! Character, location, and item tables.

use std::fmt::Write as _;

use super::{SEPARATOR, decode_cell, encode_cell, parse_table, row_id};
use crate::error::{Error, Result};
use crate::merge::{DocumentPatch, EntityPatch};
use crate::novel::{NodeKind, Novel};
use crate::structure::{Skeleton, StructureEvent, build_document};

const CHARACTER_HEADER: &str =
    "ID|Name|Full name|Aka|Description|Bio|Goals|Importance|Tags|Notes";
const LOCATION_HEADER: &str = "ID|Name|Aka|Description|Tags";
const ITEM_HEADER: &str = "ID|Name|Aka|Description|Tags";

const MAJOR_MARKER: &str = "Major";
const MINOR_MARKER: &str = "Minor";

// ============================================================================
// Writers
// ============================================================================

/// Render the character table, one row per character.
pub fn write_character_list(novel: &Novel) -> String {
    let mut table = String::with_capacity(1024);
    table.push_str(CHARACTER_HEADER);
    table.push('\n');

    for id in &novel.character_order {
        let Some(c) = novel.characters.get(id) else {
            continue;
        };
        if c.is_unused {
            continue;
        }
        let _ = writeln!(
            table,
            "CrID:{id}{sep}{name}{sep}{full}{sep}{aka}{sep}{desc}{sep}{bio}{sep}{goals}{sep}{importance}{sep}{tags}{sep}{notes}",
            id = c.id,
            sep = SEPARATOR,
            name = encode_cell(&c.title),
            full = encode_cell(c.full_name.as_deref().unwrap_or("")),
            aka = encode_cell(c.aka.as_deref().unwrap_or("")),
            desc = encode_cell(c.description.as_deref().unwrap_or("")),
            bio = encode_cell(c.bio.as_deref().unwrap_or("")),
            goals = encode_cell(c.goals.as_deref().unwrap_or("")),
            importance = if c.is_major { MAJOR_MARKER } else { MINOR_MARKER },
            tags = c.tags.join(";"),
            notes = encode_cell(c.notes.as_deref().unwrap_or("")),
        );
    }

    table
}

/// Render the location table.
pub fn write_location_list(novel: &Novel) -> String {
    let entries = novel.location_order.iter().filter_map(|id| {
        let l = novel.locations.get(id)?;
        (!l.is_unused).then_some((
            l.id.as_str(),
            l.title.as_str(),
            l.aka.as_deref(),
            l.description.as_deref(),
            l.tags.as_slice(),
        ))
    });
    simple_table(LOCATION_HEADER, NodeKind::Location, entries)
}

/// Render the item table.
pub fn write_item_list(novel: &Novel) -> String {
    let entries = novel.item_order.iter().filter_map(|id| {
        let i = novel.items.get(id)?;
        (!i.is_unused).then_some((
            i.id.as_str(),
            i.title.as_str(),
            i.aka.as_deref(),
            i.description.as_deref(),
            i.tags.as_slice(),
        ))
    });
    simple_table(ITEM_HEADER, NodeKind::Item, entries)
}

fn simple_table<'a>(
    header: &str,
    kind: NodeKind,
    entries: impl Iterator<Item = (&'a str, &'a str, Option<&'a str>, Option<&'a str>, &'a [String])>,
) -> String {
    let mut table = String::with_capacity(512);
    table.push_str(header);
    table.push('\n');

    for (id, title, aka, description, tags) in entries {
        let _ = writeln!(
            table,
            "{prefix}:{id}{sep}{name}{sep}{aka}{sep}{desc}{sep}{tags}",
            prefix = kind.prefix(),
            sep = SEPARATOR,
            name = encode_cell(title),
            aka = encode_cell(aka.unwrap_or("")),
            desc = encode_cell(description.unwrap_or("")),
            tags = tags.join(";"),
        );
    }

    table
}

// ============================================================================
// Readers
// ============================================================================

/// Parse an edited character table.
pub fn read_character_list(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let rows = parse_table(text, CHARACTER_HEADER)?;

    let mut events = Vec::new();
    let mut patch = DocumentPatch::default();

    for fields in rows {
        let id = expect_row_id(fields[0], NodeKind::Character)?;
        events.push(StructureEvent::Begin(NodeKind::Character, id.clone()));
        events.push(StructureEvent::End(Some(NodeKind::Character)));

        patch.characters.push((
            id,
            EntityPatch {
                title: Some(decode_cell(fields[1])),
                full_name: Some(decode_cell(fields[2])),
                aka: Some(decode_cell(fields[3])),
                description: Some(decode_cell(fields[4])),
                bio: Some(decode_cell(fields[5])),
                goals: Some(decode_cell(fields[6])),
                is_major: Some(fields[7].trim() == MAJOR_MARKER),
                tags: Some(split_tags(fields[8])),
                notes: Some(decode_cell(fields[9])),
            },
        ));
    }

    let doc = build_document(events)?;
    Ok((doc.skeleton, patch))
}

/// Parse an edited location table.
pub fn read_location_list(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let (skeleton, entries) = read_simple_table(text, LOCATION_HEADER, NodeKind::Location)?;
    Ok((
        skeleton,
        DocumentPatch {
            locations: entries,
            ..Default::default()
        },
    ))
}

/// Parse an edited item table.
pub fn read_item_list(text: &str) -> Result<(Skeleton, DocumentPatch)> {
    let (skeleton, entries) = read_simple_table(text, ITEM_HEADER, NodeKind::Item)?;
    Ok((
        skeleton,
        DocumentPatch {
            items: entries,
            ..Default::default()
        },
    ))
}

fn read_simple_table(
    text: &str,
    header: &str,
    kind: NodeKind,
) -> Result<(Skeleton, Vec<(String, EntityPatch)>)> {
    let rows = parse_table(text, header)?;

    let mut events = Vec::new();
    let mut entries = Vec::new();

    for fields in rows {
        let id = expect_row_id(fields[0], kind)?;
        events.push(StructureEvent::Begin(kind, id.clone()));
        events.push(StructureEvent::End(Some(kind)));

        entries.push((
            id,
            EntityPatch {
                title: Some(decode_cell(fields[1])),
                aka: Some(decode_cell(fields[2])),
                description: Some(decode_cell(fields[3])),
                tags: Some(split_tags(fields[4])),
                ..Default::default()
            },
        ));
    }

    let doc = build_document(events)?;
    Ok((doc.skeleton, entries))
}

fn expect_row_id(cell: &str, kind: NodeKind) -> Result<String> {
    row_id(cell, kind.prefix()).ok_or_else(|| {
        Error::MalformedStructure(format!(
            "row without a {} marker: {cell:?}",
            kind.label()
        ))
    })
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

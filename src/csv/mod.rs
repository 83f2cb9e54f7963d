//! Spreadsheet-style interchange tables.
//!
//! Pipe-delimited, one row per node, the first cell carrying the node's
//! `<kind>:<id>` marker. Embedded line breaks travel as tab characters so
//! a row stays one physical line. The same structural engine verifies
//! these documents; the grammar is just simpler — every row is an implicit
//! begin/content/end.

mod scenelist;
mod worldlist;

pub use scenelist::{read_scene_list, write_scene_list};
pub use worldlist::{
    read_character_list, read_item_list, read_location_list, write_character_list,
    write_item_list, write_location_list,
};

use crate::error::{Error, Result};

/// File extension of the table documents.
pub const EXTENSION: &str = "csv";

/// Delimits data fields within a record.
pub const SEPARATOR: char = '|';

/// Substitutes embedded line breaks.
pub const LINEBREAK: char = '\t';

/// Encode one cell: line breaks become tabs so the row stays one line.
pub(crate) fn encode_cell(text: &str) -> String {
    text.replace('\n', &LINEBREAK.to_string())
}

/// Decode one cell: tabs back to line breaks.
pub(crate) fn decode_cell(text: &str) -> String {
    text.replace(LINEBREAK, "\n")
}

/// Split a table into rows, validating the header and the field count of
/// every record.
pub(crate) fn parse_table<'a>(text: &'a str, header: &str) -> Result<Vec<Vec<&'a str>>> {
    let mut lines = text.lines();

    match lines.next() {
        Some(first) if first == header => {}
        _ => {
            return Err(Error::MalformedStructure(
                "table header does not match this list format".to_string(),
            ));
        }
    }

    let expected = header.split(SEPARATOR).count();
    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        if fields.len() != expected {
            return Err(Error::MalformedStructure(format!(
                "record {} has {} fields, expected {}",
                index + 1,
                fields.len(),
                expected
            )));
        }
        rows.push(fields);
    }

    Ok(rows)
}

/// Extract the id from a first cell carrying `<prefix>:<id>` (possibly
/// inside a hyperlink formula).
pub(crate) fn row_id(cell: &str, prefix: &str) -> Option<String> {
    let marker = format!("{prefix}:");
    let start = cell.rfind(&marker)? + marker.len();
    let digits: String = cell[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    (!digits.is_empty()).then_some(digits)
}

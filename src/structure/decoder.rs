//! Scanner and state machine turning markup into a decoded document.
//!
//! The scanner walks the token stream and, driven by a [`Grammar`], emits
//! generic structural events (begin-node, end-node, heading, text-line).
//! The state machine consumes those events, enforcing the marker pairing
//! rules, and produces the document's [`Skeleton`] plus each node's
//! accumulated text content.

use std::collections::HashMap;

use super::grammar::{Grammar, MarkerSyntax};
use super::skeleton::{Skeleton, SkeletonNode};
use super::tokenizer::{HtmlToken, attr_value, tokenize};
use crate::error::{Error, Result};
use crate::markup::unescape_entities;
use crate::novel::NodeKind;

/// A structural event produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureEvent {
    /// A begin marker carrying kind and id.
    Begin(NodeKind, String),
    /// An end marker. Bracket markers name their kind (`[/ScID]`); a
    /// division's `</div>` closes the innermost open node.
    End(Option<NodeKind>),
    /// A heading line with its level (candidate title, or — in a document
    /// without markers — a new chapter or scene boundary).
    Heading(u8, String),
    /// One paragraph of text content. May be empty: an empty paragraph is
    /// a real blank line of the node's content.
    Text(String),
}

/// Decode a document: tokenize, scan per the grammar, and run the marker
/// state machine.
pub fn decode(text: &str, grammar: &Grammar) -> Result<DecodedDocument> {
    build_document(scan(text, grammar))
}

// ============================================================================
// Scanner
// ============================================================================

/// Scan markup into structural events according to a grammar table.
pub fn scan(text: &str, grammar: &Grammar) -> Vec<StructureEvent> {
    let mut scanner = Scanner::new(grammar);
    for token in tokenize(text) {
        scanner.token(token);
    }
    scanner.finish()
}

struct Scanner<'g> {
    grammar: &'g Grammar,
    events: Vec<StructureEvent>,
    para: String,
    /// Some(tag) while inside a block element (p, h1..h4).
    block: Option<String>,
    /// Open `<span>` tags; the payload is the lang code, if any.
    spans: Vec<Option<String>>,
    /// Open `<div>` tags; true for structural marker divisions.
    divs: Vec<bool>,
}

impl<'g> Scanner<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            events: Vec::new(),
            para: String::new(),
            block: None,
            spans: Vec::new(),
            divs: Vec::new(),
        }
    }

    fn token(&mut self, token: HtmlToken<'_>) {
        match token {
            HtmlToken::Start { name, raw } => self.start_tag(&name, raw),
            HtmlToken::End { name } => self.end_tag(&name),
            HtmlToken::Comment(text) => {
                // Annotations travel as comments; restore the yw7 form.
                let text = text.strip_prefix(' ').unwrap_or(text);
                let text = text.strip_suffix(' ').unwrap_or(text);
                self.para.push_str("/*");
                self.para.push_str(text);
                self.para.push_str("*/");
            }
            HtmlToken::Text(text) => self.para.push_str(text),
        }
    }

    fn start_tag(&mut self, name: &str, raw: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "h4" => {
                self.flush();
                self.block = Some(name.to_string());
            }
            "div" => {
                self.flush();
                let marker = if self.grammar.syntax == MarkerSyntax::TaggedDivision {
                    attr_value(raw, "id").and_then(|v| parse_prefixed_id(v, self.grammar))
                } else {
                    None
                };
                match marker {
                    Some((kind, id)) => {
                        self.events.push(StructureEvent::Begin(kind, id));
                        self.divs.push(true);
                    }
                    None => self.divs.push(false),
                }
            }
            "em" | "i" => self.para.push_str("[i]"),
            "strong" | "b" => self.para.push_str("[b]"),
            "span" => {
                let lang = attr_value(raw, "lang").map(str::to_string);
                if let Some(code) = &lang {
                    self.para.push_str("[lang=");
                    self.para.push_str(code);
                    self.para.push(']');
                }
                self.spans.push(lang);
            }
            "body" | "br" => {}
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "p" | "h1" | "h2" | "h3" | "h4" => self.flush(),
            "div" => {
                self.flush();
                if self.divs.pop() == Some(true) {
                    self.events.push(StructureEvent::End(None));
                }
            }
            "em" | "i" => self.para.push_str("[/i]"),
            "strong" | "b" => self.para.push_str("[/b]"),
            "span" => {
                if let Some(Some(code)) = self.spans.pop() {
                    self.para.push_str("[/lang=");
                    self.para.push_str(&code);
                    self.para.push(']');
                }
            }
            _ => {}
        }
    }

    /// Close the current paragraph and emit its event.
    fn flush(&mut self) {
        let block = self.block.take();
        let line = unescape_entities(self.para.trim());
        self.para.clear();

        if block.is_none() {
            // Inter-tag whitespace; anything else (head titles, footers)
            // is outside every block and carries no structure.
            return;
        }

        if self.grammar.syntax == MarkerSyntax::BracketLine
            && let Some(event) = parse_bracket_marker(&line, self.grammar)
        {
            self.events.push(event);
            return;
        }

        if let Some(level) = block.as_deref().and_then(heading_level) {
            if !line.is_empty() {
                self.events.push(StructureEvent::Heading(level, line));
            }
            return;
        }

        self.events.push(StructureEvent::Text(line));
    }

    fn finish(mut self) -> Vec<StructureEvent> {
        self.flush();
        self.events
    }
}

/// Parse `"ChID:3"`-style values (division ids, table cells).
pub(crate) fn parse_prefixed_id(value: &str, grammar: &Grammar) -> Option<(NodeKind, String)> {
    let (prefix, id) = value.split_once(':')?;
    let kind = NodeKind::from_prefix(prefix)?;
    if !grammar.accepts(kind) || id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((kind, id.to_string()))
}

fn heading_level(block: &str) -> Option<u8> {
    match block {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        _ => None,
    }
}

/// Recognize `[ChID:3]` and `[/ChID]` marker lines.
fn parse_bracket_marker(line: &str, grammar: &Grammar) -> Option<StructureEvent> {
    let inner = line.strip_prefix('[')?;

    if let Some(rest) = inner.strip_prefix('/') {
        let prefix = rest.split(']').next()?;
        let kind = NodeKind::from_prefix(prefix)?;
        return grammar.accepts(kind).then_some(StructureEvent::End(Some(kind)));
    }

    let body = inner.split(']').next()?;
    let (kind, id) = parse_prefixed_id(body, grammar)?;
    Some(StructureEvent::Begin(kind, id))
}

// ============================================================================
// State machine
// ============================================================================

/// A decoded document: the structural skeleton plus per-node text.
#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    pub skeleton: Skeleton,
    content: HashMap<(NodeKind, String), String>,
    titles: HashMap<(NodeKind, String), String>,
}

impl DecodedDocument {
    /// The accumulated text of a decoded node. `Some("")` means the node
    /// was present with empty content; `None` means it was absent.
    pub fn content_of(&self, kind: NodeKind, id: &str) -> Option<&str> {
        self.content
            .get(&(kind, id.to_string()))
            .map(String::as_str)
    }

    /// The heading found inside a decoded node, if any.
    pub fn title_of(&self, kind: NodeKind, id: &str) -> Option<&str> {
        self.titles.get(&(kind, id.to_string())).map(String::as_str)
    }
}

/// Run the marker pairing rules over an event stream.
///
/// At most one node per kind may be open at a time, and nodes must close
/// innermost-first. Violations are [`Error::MalformedStructure`]; this is
/// the only place that judges marker pairing, for every document flavor.
pub fn build_document(events: Vec<StructureEvent>) -> Result<DecodedDocument> {
    let mut open: Vec<(NodeKind, String)> = Vec::new();
    let mut nodes: Vec<SkeletonNode> = Vec::new();
    let mut lines: HashMap<(NodeKind, String), Vec<String>> = HashMap::new();
    let mut doc = DecodedDocument::default();

    for event in events {
        match event {
            StructureEvent::Begin(kind, id) => {
                if let Some((_, other)) = open.iter().find(|(k, _)| *k == kind) {
                    return Err(Error::MalformedStructure(format!(
                        "{}:{} begins while {}:{} is still open",
                        kind.prefix(),
                        id,
                        kind.prefix(),
                        other
                    )));
                }
                let key = (kind, id.clone());
                if lines.contains_key(&key) {
                    return Err(Error::MalformedStructure(format!(
                        "duplicate marker {}:{}",
                        kind.prefix(),
                        id
                    )));
                }
                nodes.push(SkeletonNode {
                    kind,
                    id: id.clone(),
                    parent: open.last().map(|(_, pid)| pid.clone()),
                });
                lines.insert(key, Vec::new());
                open.push((kind, id));
            }

            StructureEvent::End(expected) => match open.pop() {
                None => {
                    return Err(Error::MalformedStructure(
                        "end marker without a matching begin".to_string(),
                    ));
                }
                Some((kind, id)) => {
                    if let Some(e) = expected
                        && e != kind
                    {
                        return Err(Error::MalformedStructure(format!(
                            "[/{}] closes open {}:{}",
                            e.prefix(),
                            kind.prefix(),
                            id
                        )));
                    }
                    let key = (kind, id);
                    let text = lines.get(&key).map(|l| l.join("\n")).unwrap_or_default();
                    doc.content.insert(key, text);
                }
            },

            StructureEvent::Heading(_, line) => {
                if let Some(key) = open.last() {
                    doc.titles.entry(key.clone()).or_insert(line);
                }
            }

            StructureEvent::Text(line) => {
                if let Some(key) = open.last()
                    && let Some(buf) = lines.get_mut(key)
                {
                    buf.push(line);
                }
            }
        }
    }

    if let Some((kind, id)) = open.last() {
        return Err(Error::MalformedStructure(format!(
            "{}:{} is never closed",
            kind.prefix(),
            id
        )));
    }

    doc.skeleton = Skeleton::from_nodes(nodes);
    Ok(doc)
}

//! Inline markup transcoding.
//!
//! yw7 text carries its own inline markup: `[i]…[/i]`, `[b]…[/b]`,
//! `[lang=xx]…[/lang=xx]`, comments `/*…*/`, and `\n` as a paragraph
//! break. This module converts that markup to and from the HTML documents'
//! native inline markup. It is stateless with respect to document
//! structure: markers and sectioning are the structure module's business.

mod entity;
mod span;

pub use entity::{escape_xml, unescape_entities};
pub use span::{collapse_spans, split_spans};

/// Convert yw7 scene markup to the inner markup of an HTML paragraph run.
///
/// The result is the text *between* the enclosing `<p>` and `</p>` written
/// by the exporter: line breaks become paragraph boundaries, and spans that
/// crossed a line break have already been split by [`split_spans`] so that
/// no `<em>`/`<strong>` crosses a paragraph element.
pub fn yw_to_html(text: &str) -> String {
    let text = escape_xml(text);
    let text = split_spans(&text);

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut rest = text.as_str();

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        if let Some((tag, after)) = take_tag(tail) {
            match tag {
                "[i]" => out.push_str("<em>"),
                "[/i]" => out.push_str("</em>"),
                "[b]" => out.push_str("<strong>"),
                "[/b]" => out.push_str("</strong>"),
                _ if tag.starts_with("[lang=") => {
                    out.push_str("<span lang=\"");
                    out.push_str(&tag[6..tag.len() - 1]);
                    out.push_str("\">");
                }
                _ if tag.starts_with("[/lang=") => out.push_str("</span>"),
                // Unsupported inline tags (highlight, alignment, strike,
                // underline) are dropped from generated documents.
                _ if is_dropped_tag(tag) => {}
                _ => out.push_str(tag),
            }
            rest = after;
        } else {
            out.push('[');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    let mut text = out.replace("/*", "<!-- ").replace("*/", " -->");

    if text.contains('\n') {
        text = text.replace('\n', "</p>\n<p>");
        text = text.replace("<p></p>", "<p><br /></p>");
    }
    text
}

/// Split off a leading `[...]` tag, returning it and the remainder.
fn take_tag(text: &str) -> Option<(&str, &str)> {
    debug_assert!(text.starts_with('['));
    let close = text.find(']')?;
    if close < 2 || text[1..close].contains('\n') {
        return None;
    }
    Some((&text[..=close], &text[close + 1..]))
}

fn is_dropped_tag(tag: &str) -> bool {
    let inner = tag.trim_start_matches("[/").trim_start_matches('[');
    let mut chars = inner.chars();
    matches!(chars.next(), Some('h' | 'c' | 'r' | 's' | 'u'))
        && chars.all(|c| c.is_ascii_digit() || c == ']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(yw_to_html("Hello world."), "Hello world.");
    }

    #[test]
    fn italics_and_bold() {
        assert_eq!(
            yw_to_html("[i]one[/i] and [b]two[/b]"),
            "<em>one</em> and <strong>two</strong>"
        );
    }

    #[test]
    fn language_spans() {
        assert_eq!(
            yw_to_html("[lang=de]Hallo[/lang=de]"),
            "<span lang=\"de\">Hallo</span>"
        );
    }

    #[test]
    fn comments_become_html_comments() {
        assert_eq!(yw_to_html("a /*note*/ b"), "a <!-- note --> b");
    }

    #[test]
    fn paragraph_breaks() {
        assert_eq!(yw_to_html("a\nb"), "a</p>\n<p>b");
        assert_eq!(yw_to_html("a\n\nb"), "a</p>\n<p><br /></p>\n<p>b");
    }

    #[test]
    fn span_across_break_is_split() {
        assert_eq!(
            yw_to_html("line one[i]\nline two[/i]"),
            "line one<em></em></p>\n<p><em>line two</em>"
        );
    }

    #[test]
    fn xml_escaping_first() {
        assert_eq!(yw_to_html("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn unsupported_tags_dropped() {
        assert_eq!(yw_to_html("[u]under[/u] [h3]x[/h3]"), "under x");
    }

    #[test]
    fn literal_brackets_survive() {
        assert_eq!(yw_to_html("array[0]"), "array[0]");
        assert_eq!(yw_to_html("a[]b"), "a[]b");
    }
}

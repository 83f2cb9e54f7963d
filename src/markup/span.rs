//! Splitting and rejoining inline spans at paragraph boundaries.
//!
//! The HTML documents represent each line as its own paragraph element, and
//! an inline span cannot cross a paragraph boundary there. On export, a
//! span left open at a line break is closed at the break and reopened on
//! the next line; on import, the adjacent reopened span is collapsed back
//! into one logical span, leaving the yw7 text unchanged by the round trip.

/// Close italic and bold spans at each line break and reopen them on the
/// following line, so that no span crosses a line boundary.
pub fn split_spans(text: &str) -> String {
    let mut italic_open = false;
    let mut bold_open = false;

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            let line = rebalance(line, "[i]", "[/i]", &mut italic_open);
            rebalance(&line, "[b]", "[/b]", &mut bold_open)
        })
        .collect();

    lines.join("\n")
}

/// Balance one tag pair within a single line. `carried` tracks a span left
/// open on the previous line.
fn rebalance(line: &str, open: &str, close: &str, carried: &mut bool) -> String {
    let mut line = line.to_string();

    if *carried {
        line.insert_str(0, open);
        *carried = false;
    }

    while line.matches(open).count() > line.matches(close).count() {
        line.push_str(close);
        *carried = true;
    }
    while line.matches(close).count() > line.matches(open).count() {
        line.insert_str(0, open);
    }

    // An empty pair left at the split point is kept: collapse_spans needs
    // it to reconstruct the span exactly where the author opened it.
    line
}

/// Rejoin spans that were split at line breaks: `[/i][i]` and `[/i]\n[i]`
/// collapse so a logically continuous span becomes one span again.
pub fn collapse_spans(text: &str) -> String {
    let mut tags: Vec<String> = vec!["i".to_string(), "b".to_string()];
    for lang in lang_codes(text) {
        tags.push(format!("lang={lang}"));
    }

    let mut text = text.to_string();
    for tag in &tags {
        text = text.replace(&format!("[/{tag}][{tag}]"), "");
        text = text.replace(&format!("[/{tag}]\n[{tag}]"), "\n");
    }
    text
}

/// Distinct language codes appearing in `[lang=..]` tags.
fn lang_codes(text: &str) -> Vec<String> {
    let mut codes = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("[lang=") {
        let tail = &rest[start + 6..];
        match tail.find(']') {
            Some(end) => {
                let code = &tail[..end];
                if !code.is_empty() && !codes.iter().any(|c| c == code) {
                    codes.push(code.to_string());
                }
                rest = &tail[end + 1..];
            }
            None => break,
        }
    }
    codes
}

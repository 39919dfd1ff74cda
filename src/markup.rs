//! Inline text markup for slot texts.
//!
//! Slot texts may contain `<b>`, `<i>`, `<u>` and any configured sub-tags.
//! They are split into lines and turned into spans that the renderer writes
//! as nested `<tspan>` elements. Spaces become non-breaking so the SVG keeps
//! them, and a tag left open at the end of a line is closed there and
//! reopened on the next line so every line's tspans nest correctly.

use std::collections::BTreeMap;

/// Non-breaking space, used for all spaces and for empty lines.
pub const NBSP: char = '\u{a0}';

/// One piece of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Start of a styled run for the named tag.
    Open(String),
    /// End of the innermost styled run.
    Close,
    /// Literal text with spaces already made non-breaking.
    Text(String),
}

/// Known inline tags and the SVG attributes each one maps to.
#[derive(Debug, Clone)]
pub struct InlineMarkup {
    tags: BTreeMap<String, Vec<(String, String)>>,
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for InlineMarkup {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl InlineMarkup {
    /// Built-in tags plus `sub_tag_styles` (tag name to inline CSS).
    pub fn new(sub_tag_styles: &BTreeMap<String, String>) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(
            "i".to_string(),
            attrs(&[("class", "i"), ("font-style", "italic")]),
        );
        tags.insert(
            "b".to_string(),
            attrs(&[("class", "b"), ("font-weight", "bold")]),
        );
        tags.insert(
            "u".to_string(),
            attrs(&[("class", "u"), ("text-decoration", "underline")]),
        );
        for (tag, style) in sub_tag_styles {
            tags.insert(tag.clone(), vec![("style".to_string(), style.clone())]);
        }
        Self { tags }
    }

    /// Attributes for the `<tspan>` opened by `tag`.
    pub fn attributes(&self, tag: &str) -> Option<&[(String, String)]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    /// Split `text` into lines of spans.
    pub fn lines(&self, text: &str) -> Vec<Vec<Span>> {
        let mut open: Vec<String> = Vec::new();
        let mut lines = Vec::new();

        for raw in text.split('\n') {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            let mut spans: Vec<Span> = open.iter().cloned().map(Span::Open).collect();

            if raw.is_empty() {
                spans.push(Span::Text(NBSP.to_string()));
            } else {
                self.parse_line(raw, &mut open, &mut spans);
            }

            spans.extend(open.iter().map(|_| Span::Close));
            lines.push(spans);
        }
        lines
    }

    fn parse_line(&self, line: &str, open: &mut Vec<String>, spans: &mut Vec<Span>) {
        let mut text = String::new();
        let mut rest = line;

        while let Some(lt) = rest.find('<') {
            push_text(&mut text, &rest[..lt]);
            let after = &rest[lt..];

            match self.match_tag(after) {
                Some((tag, closing, len)) => {
                    flush(&mut text, spans);
                    if closing {
                        close_tag(tag, open, spans);
                    } else {
                        open.push(tag.to_string());
                        spans.push(Span::Open(tag.to_string()));
                    }
                    rest = &after[len..];
                }
                None => {
                    text.push('<');
                    rest = &after[1..];
                }
            }
        }
        push_text(&mut text, rest);
        flush(&mut text, spans);
    }

    /// Match a known `<tag>` or `</tag>` at the start of `s`.
    fn match_tag<'a>(&self, s: &'a str) -> Option<(&'a str, bool, usize)> {
        let end = s.find('>')?;
        let inner = &s[1..end];
        let (name, closing) = match inner.strip_prefix('/') {
            Some(name) => (name, true),
            None => (inner, false),
        };
        self.tags
            .contains_key(name)
            .then_some((name, closing, end + 1))
    }
}

fn push_text(buf: &mut String, s: &str) {
    buf.extend(s.chars().map(|c| if c == ' ' { NBSP } else { c }));
}

fn flush(buf: &mut String, spans: &mut Vec<Span>) {
    if !buf.is_empty() {
        spans.push(Span::Text(std::mem::take(buf)));
    }
}

/// Close `tag`, closing and reopening whatever was opened inside it.
fn close_tag(tag: &str, open: &mut Vec<String>, spans: &mut Vec<Span>) {
    let Some(pos) = open.iter().rposition(|t| t == tag) else {
        // Stray closing tag, nothing to close
        return;
    };
    let inner: Vec<String> = open.drain(pos..).skip(1).collect();
    spans.extend((0..=inner.len()).map(|_| Span::Close));
    for t in inner {
        spans.push(Span::Open(t.clone()));
        open.push(t);
    }
}

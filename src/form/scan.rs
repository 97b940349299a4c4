//! Byte-level location of `<input>` tags, so a page can be re-rendered without
//! reserializing the whole document.
//!
//! Element semantics (which inputs exist, their attribute values) come from the
//! HTML parser in [`super::html`]; this module only finds where each `<input>`
//! tag sits in the source text. It follows the tokenizer rules that matter for
//! that: comments, raw-text elements and quoted attribute values are skipped.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#)
        .expect("attribute pattern is valid")
});

/// Elements whose content is text, never markup.
const RAW_TEXT_ELEMENTS: [&str; 9] = [
    "script", "style", "textarea", "title", "noscript", "xmp", "iframe", "noembed", "noframes",
];

/// Byte ranges of every `<input ...>` start tag that the parser would turn into an element,
/// in document order.
pub fn input_tags(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'<') {
        let start = i + offset;
        let rest = &bytes[start + 1..];

        if rest.starts_with(b"!--") {
            i = find(bytes, start + 4, b"-->").map_or(bytes.len(), |p| p + 3);
            continue;
        }

        if !rest.first().is_some_and(u8::is_ascii_alphabetic) {
            // End tags, doctype, processing instructions: skip to the closing '>'
            i = if rest.first().is_some_and(|b| matches!(b, b'/' | b'!' | b'?')) {
                tag_end(bytes, start + 1)
            } else {
                start + 1
            };
            continue;
        }

        let name_len = rest
            .iter()
            .position(|b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'))
            .unwrap_or(rest.len());
        let name = source[start + 1..start + 1 + name_len].to_ascii_lowercase();
        let end = tag_end(bytes, start + 1 + name_len);

        // A tag cut off by the end of input is dropped by the parser too
        if name == "input" && source[start..end].ends_with('>') {
            tags.push(start..end);
        }

        i = end;
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            i = find_end_tag(source, end, &name);
        }
    }

    tags
}

/// Byte ranges of `checked` attributes inside one tag, relative to the tag start.
pub fn checked_spans(tag: &str) -> Vec<Range<usize>> {
    let name_end = tag
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(tag.len());

    ATTRIBUTE
        .captures_iter(&tag[name_end..])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let key = caps.get(1)?;
            key.as_str()
                .eq_ignore_ascii_case("checked")
                .then(|| name_end + whole.start()..name_end + whole.end())
        })
        .collect()
}

/// Index just past the '>' closing the tag whose attributes start at `from`.
/// Quoted attribute values may contain '>'.
fn tag_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    let mut expect_value = false;

    while i < bytes.len() {
        match bytes[i] {
            b'>' => return i + 1,
            b'=' => expect_value = true,
            quote @ (b'"' | b'\'') if expect_value => {
                match bytes[i + 1..].iter().position(|&b| b == quote) {
                    Some(p) => i += p + 1,
                    None => return bytes.len(),
                }
                expect_value = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => expect_value = false,
        }
        i += 1;
    }

    bytes.len()
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Index just past `</name ...>`, or the end of input when it never closes.
fn find_end_tag(source: &str, from: usize, name: &str) -> usize {
    let bytes = source.as_bytes();
    let mut i = from;
    while let Some(p) = find(bytes, i, b"</") {
        let after = p + 2;
        let candidate = bytes.get(after..after + name.len());
        let boundary = bytes
            .get(after + name.len())
            .map_or(true, |b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'));
        if candidate.is_some_and(|c| c.eq_ignore_ascii_case(name.as_bytes())) && boundary {
            return tag_end(bytes, after + name.len());
        }
        i = after;
    }
    bytes.len()
}

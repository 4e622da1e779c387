// file: src/parser/scanner.rs
// description: dependency-free bibliography scanner with brace-depth tracking
// reference: BibTeX entry syntax

use crate::error::Result;
use crate::models::Bibliography;
use crate::parser::patterns::{collapse_whitespace, strip_brace_groups};
use crate::parser::{BibliographyParser, push_if_recent};
use std::collections::BTreeMap;
use tracing::debug;

/// Record types that carry no citation.
const SKIPPED_TYPES: [&str; 3] = ["string", "preamble", "comment"];

/// Hand-rolled scanner used when the robust parser is unavailable or gives up.
///
/// Understands `name = {value}`, `name = "value"` and bare `name = value`
/// fields. Anything else inside a record is skipped up to the next top-level
/// comma without affecting the rest of the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub entry_type: &'a str,
    pub key: &'a str,
    pub body: &'a str,
}

impl FallbackParser {
    pub fn new() -> Self {
        Self
    }
}

impl BibliographyParser for FallbackParser {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn parse(&self, source: &str, min_year: i32) -> Result<Bibliography> {
        let cleaned = strip_comments(source);
        let mut bibliography = Bibliography::new();

        for record in Records::new(&cleaned) {
            let entry_type = record.entry_type.to_lowercase();
            if SKIPPED_TYPES.contains(&entry_type.as_str()) {
                continue;
            }

            let fields = scan_fields(record.body);
            push_if_recent(&mut bibliography, record.key, &entry_type, fields, min_year);
        }

        Ok(bibliography)
    }
}

/// Drops everything from an unescaped `%` to the end of each line.
pub fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let bytes = line.as_bytes();
            let cut = bytes
                .iter()
                .enumerate()
                .position(|(i, &b)| b == b'%' && (i == 0 || bytes[i - 1] != b'\\'));
            match cut {
                Some(i) => &line[..i],
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Iterates `@type{key, body}` records in source order.
pub struct Records<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Records<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let bytes = text.as_bytes();

        loop {
            let at = self.pos + text.get(self.pos..)?.find('@')?;
            let type_start = at + 1;
            let type_end = word_end(bytes, type_start);
            self.pos = type_start;

            if type_end == type_start {
                continue;
            }

            let open = skip_whitespace(bytes, type_end);
            if bytes.get(open) != Some(&b'{') {
                continue;
            }

            let key_start = open + 1;
            let comma = match text[key_start..].find([',', '@', '}']) {
                Some(offset) if bytes[key_start + offset] == b',' => key_start + offset,
                _ => {
                    debug!("Skipping record without a key at byte {}", at);
                    continue;
                }
            };

            let key = text[key_start..comma].trim();
            if key.is_empty() {
                continue;
            }

            let body_start = comma + 1;
            let body_end = match matching_brace(bytes, body_start) {
                Some(close) => {
                    self.pos = close + 1;
                    close
                }
                None => {
                    // unterminated record: the body stops at the next record
                    let end = text[body_start..]
                        .find('@')
                        .map_or(text.len(), |offset| body_start + offset);
                    self.pos = end;
                    end
                }
            };

            return Some(RawRecord {
                entry_type: &text[type_start..type_end],
                key,
                body: &text[body_start..body_end],
            });
        }
    }
}

/// Extracts the fields of one record body. Field names are lowercased and
/// values are unwrapped one brace level, trimmed and whitespace-collapsed.
pub fn scan_fields(body: &str) -> BTreeMap<String, String> {
    let bytes = body.as_bytes();
    let mut fields = BTreeMap::new();
    let mut pos = 0;

    loop {
        pos = skip_separators(bytes, pos);
        if pos >= bytes.len() {
            break;
        }

        match scan_field(body, pos) {
            Ok((name, value, next)) => {
                let value = collapse_whitespace(&strip_brace_groups(value));
                fields.insert(name.to_lowercase(), value);
                pos = next;
            }
            Err(next) => {
                debug!("Skipping malformed field: {:?}", body[pos..next].trim());
                pos = next;
            }
        }
    }

    fields
}

/// Scans `name = value` starting at `start`. On malformed input returns the
/// position to resume from, always past `start`.
fn scan_field(body: &str, start: usize) -> std::result::Result<(&str, &str, usize), usize> {
    let bytes = body.as_bytes();
    let resync = || next_top_level_comma(bytes, start);

    let name_end = word_end(bytes, start);
    if name_end == start {
        return Err(resync());
    }
    let name = &body[start..name_end];

    let eq = skip_whitespace(bytes, name_end);
    if bytes.get(eq) != Some(&b'=') {
        return Err(resync());
    }

    let value_start = skip_whitespace(bytes, eq + 1);
    match bytes.get(value_start) {
        Some(b'{') => match matching_brace(bytes, value_start + 1) {
            Some(close) => Ok((name, &body[value_start + 1..close], close + 1)),
            None => Err(bytes.len()),
        },
        Some(b'"') => match closing_quote(bytes, value_start + 1) {
            Some(close) => Ok((name, &body[value_start + 1..close], close + 1)),
            None => Err(bytes.len()),
        },
        Some(_) => {
            let end = body[value_start..]
                .find(',')
                .map_or(bytes.len(), |offset| value_start + offset);
            let value = body[value_start..end].trim();
            if value.is_empty() {
                Err(resync())
            } else {
                Ok((name, value, end))
            }
        }
        None => Err(bytes.len()),
    }
}

/// Index of the `}` closing a group whose `{` sits just before `from`.
fn matching_brace(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if i > 0 && bytes[i - 1] == b'\\' {
            continue;
        }
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn closing_quote(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] == b'"' && bytes[i - 1] != b'\\')
}

/// Position just after the next comma outside braces, or the end.
fn next_top_level_comma(bytes: &[u8], from: usize) -> usize {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return i + 1,
            _ => {}
        }
    }
    bytes.len()
}

fn word_end(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    end
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn skip_separators(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b',') {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let source = "% header\n@article{a, % trailing\n  note = {50\\% off}}";
        let cleaned = strip_comments(source);

        assert!(!cleaned.contains("header"));
        assert!(!cleaned.contains("trailing"));
        assert!(cleaned.contains("50\\% off"));
    }

    #[test]
    fn test_records_split() {
        let text = "@article{a2023, title={One}}\n\n@Book { b2024 ,\n year = 2024 }";
        let records: Vec<_> = Records::new(text).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry_type, "article");
        assert_eq!(records[0].key, "a2023");
        assert_eq!(records[0].body.trim(), "title={One}");
        assert_eq!(records[1].entry_type, "Book");
        assert_eq!(records[1].key, "b2024");
    }

    #[test]
    fn test_at_sign_inside_braced_value() {
        let text = "@misc{m, note = {mail me@example.org}, year = 2023}";
        let records: Vec<_> = Records::new(text).collect();

        assert_eq!(records.len(), 1);
        let fields = scan_fields(records[0].body);
        assert_eq!(fields["note"], "mail me@example.org");
        assert_eq!(fields["year"], "2023");
    }

    #[test]
    fn test_unterminated_record_stops_at_next() {
        let text = "@article{a, year = 2023,\n@article{b, year = 2024}";
        let keys: Vec<_> = Records::new(text).map(|r| r.key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_field_forms() {
        let body = r#"
            Title = {A {Study} of {X}},
            author = "Jane Doe and John Roe",
            year = 2023,
            doi = 10.1/xyz,
            author2 = {Author, {Jr.}}
        "#;
        let fields = scan_fields(body);

        assert_eq!(fields["title"], "A Study of X");
        assert_eq!(fields["author"], "Jane Doe and John Roe");
        assert_eq!(fields["year"], "2023");
        assert_eq!(fields["doi"], "10.1/xyz");
        assert_eq!(fields["author2"], "Author, Jr.");
    }

    #[test]
    fn test_malformed_field_skipped() {
        let body = "title = {Fine}, = {no name}, broken {x, y}, year = 2022";
        let fields = scan_fields(body);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["title"], "Fine");
        assert_eq!(fields["year"], "2022");
    }

    #[test]
    fn test_multiline_value_collapsed() {
        let fields = scan_fields("title = {A long\n      title}");
        assert_eq!(fields["title"], "A long title");
    }

    #[test]
    fn test_string_records_skipped() {
        let source = "@string{jt = \"Journal\"}\n@comment{year = 2030, x}\n@misc{k, year = 2023}";
        let bib = FallbackParser::new().parse(source, 2022).unwrap();

        assert_eq!(bib.len(), 1);
        assert!(bib.contains_key("k"));
    }
}

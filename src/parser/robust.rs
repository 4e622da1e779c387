// file: src/parser/robust.rs
// description: full-grammar bibliography parsing backed by the biblatex crate
// reference: https://docs.rs/biblatex

use crate::error::Result;
use crate::models::Bibliography;
use crate::parser::patterns::collapse_whitespace;
use crate::parser::scanner::{FallbackParser, Records, strip_comments};
use crate::parser::{BibliographyParser, push_if_recent};
use biblatex::ChunksExt;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Delegates to `biblatex`, which resolves `@string` abbreviations and LaTeX
/// escapes. Documents the strict grammar rejects are re-read with the
/// scanner so one bad record never drops the whole file.
///
/// `biblatex` maps type tags onto its own vocabulary (`@conference` becomes
/// `inproceedings`, unknown tags become `unknown`), so the type of each entry
/// is taken from the tag written in the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustParser {
    fallback: FallbackParser,
}

impl RobustParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BibliographyParser for RobustParser {
    fn name(&self) -> &'static str {
        "biblatex"
    }

    fn parse(&self, source: &str, min_year: i32) -> Result<Bibliography> {
        let parsed = match biblatex::Bibliography::parse(source) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Strict bibliography parse failed ({}), retrying with the fallback scanner", e);
                return self.fallback.parse(source, min_year);
            }
        };

        let cleaned = strip_comments(source);
        let types = source_types(&cleaned);
        let mut bibliography = Bibliography::new();

        for entry in parsed.iter() {
            let fields: BTreeMap<String, String> = entry
                .fields
                .iter()
                .map(|(name, chunks)| {
                    (name.to_lowercase(), collapse_whitespace(&chunks.format_verbatim()))
                })
                .collect();

            let entry_type = match types.get(entry.key.as_str()) {
                Some(tag) => tag.clone(),
                None => entry.entry_type.to_string().to_lowercase(),
            };
            push_if_recent(&mut bibliography, &entry.key, &entry_type, fields, min_year);
        }

        Ok(bibliography)
    }
}

/// Lowercased type tag of every keyed record, the last record winning for a
/// repeated key.
fn source_types(text: &str) -> HashMap<&str, String> {
    Records::new(text)
        .map(|record| (record.key, record.entry_type.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robust_parses_standard_entry() {
        let source = r#"
@inproceedings{lee2023,
  author    = {Ann Lee and Bo Kim},
  title     = {Fast Things},
  booktitle = {Proceedings of Speed},
  year      = {2023},
}
"#;
        let bib = RobustParser::new().parse(source, 2022).unwrap();
        let entry = bib.get("lee2023").unwrap();

        assert_eq!(entry.entry_type, "inproceedings");
        assert_eq!(entry.year, 2023);
        assert_eq!(entry.field("booktitle"), Some("Proceedings of Speed"));
        assert_eq!(entry.field("author"), Some("Ann Lee and Bo Kim"));
    }

    #[test]
    fn test_robust_keeps_source_type_tags() {
        let source = r#"
@Conference{conf2023, author = {A B}, title = {T}, booktitle = {Proc X}, year = {2023}}
@www{site2023, title = {Home}, year = {2023}}
@electronic{elec2023, title = {Slides}, year = {2023}}
@customtype{odd2023, title = {Odd}, year = {2023}}
"#;
        let bib = RobustParser::new().parse(source, 2022).unwrap();

        assert_eq!(bib.get("conf2023").unwrap().entry_type, "conference");
        assert_eq!(bib.get("site2023").unwrap().entry_type, "www");
        assert_eq!(bib.get("elec2023").unwrap().entry_type, "electronic");
        assert_eq!(bib.get("odd2023").unwrap().entry_type, "customtype");
    }

    #[test]
    fn test_source_types_last_record_wins() {
        let types = source_types("@article{k, year = 2023}\n@MISC{k, year = 2024}");
        assert_eq!(types["k"], "misc");
    }

    #[test]
    fn test_robust_resolves_string_abbreviations() {
        let source = r#"
@string{jot = "Journal of Tests"}
@article{doe2024, author = {Jane Doe}, title = {T}, journal = jot, year = 2024}
"#;
        let bib = RobustParser::new().parse(source, 2022).unwrap();
        assert_eq!(bib.get("doe2024").unwrap().field("journal"), Some("Journal of Tests"));
    }

    #[test]
    fn test_robust_falls_back_on_grammar_error() {
        let source = "@article{ok2023, title = {Fine}, year = 2023}\n@article{bad, title = {unclosed, year = 2024";
        let bib = RobustParser::new().parse(source, 2022).unwrap();
        assert!(bib.contains_key("ok2023"));
    }
}

// file: tests/parsers.rs
// description: shared fixtures run against every bibliography parser
// reference: parser contract tests

use bibpage::{BibliographyParser, CitationFormatter, FallbackParser};
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/citations.bib");

fn parsers() -> Vec<Box<dyn BibliographyParser>> {
    let mut parsers: Vec<Box<dyn BibliographyParser>> = vec![Box::new(FallbackParser::new())];
    #[cfg(feature = "biblatex")]
    parsers.push(Box::new(bibpage::RobustParser::new()));
    parsers
}

#[test]
fn test_recency_filter_applies_to_every_parser() {
    for parser in parsers() {
        let bib = parser.parse(FIXTURE, 2022).unwrap();
        let mut keys: Vec<_> = bib.keys().collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "conf2023", "doe2023", "kim2022", "lee2024", "me2025", "site2024", "tool2023"
            ],
            "parser {}",
            parser.name()
        );
        assert!(bib.iter().all(|entry| entry.year >= 2022));
    }
}

#[test]
fn test_cutoff_is_configurable() {
    for parser in parsers() {
        let bib = parser.parse(FIXTURE, 2019).unwrap();
        assert!(bib.contains_key("old2019"), "parser {}", parser.name());

        let bib = parser.parse(FIXTURE, 2025).unwrap();
        assert_eq!(bib.keys().collect::<Vec<_>>(), vec!["me2025"]);
    }
}

#[test]
fn test_entry_types_and_years() {
    for parser in parsers() {
        let bib = parser.parse(FIXTURE, 2022).unwrap();

        let doe = bib.get("doe2023").unwrap();
        assert_eq!(doe.entry_type, "article");
        assert_eq!(doe.year, 2023);

        let lee = bib.get("lee2024").unwrap();
        assert_eq!(lee.entry_type, "inproceedings");
        assert_eq!(lee.year, 2024);

        assert_eq!(bib.get("kim2022").unwrap().entry_type, "incollection");
        assert_eq!(bib.get("conf2023").unwrap().entry_type, "conference");
        assert_eq!(bib.get("site2024").unwrap().entry_type, "www");
        assert_eq!(bib.get("tool2023").unwrap().entry_type, "customtype");
    }
}

#[test]
fn test_parsers_produce_identical_citations() {
    let formatter = CitationFormatter::new();
    let expected = vec![
        (
            "doe2023",
            "- **Jane Doe and John Roe**. *A Study of X*. In *Journal of Tests*. (2023) [DOI](https://doi.org/10.1/xyz)",
        ),
        (
            "lee2024",
            "- **Ann Lee**. *Fast Things*. In Proceedings of Speed. (2024) [PDF](https://example.org/lee.pdf)",
        ),
        (
            "kim2022",
            "- **Bo Kim, Cy Park, Di Wu, et al.**. *Collected Wisdom*. In The Big Book. (2022)",
        ),
        ("me2025", "- **Sam Student**. *Thoughts*. (2025)"),
        ("conf2023", "- **Ria Sen and Tom Hale**. *Meeting Notes*. (2023)"),
        (
            "site2024",
            "- **Sam Student**. *Project Homepage*. (2024) [PDF](https://example.org/project)",
        ),
        ("tool2023", "- *Widget Toolkit*. (2023)"),
    ];

    for parser in parsers() {
        let bib = parser.parse(FIXTURE, 2022).unwrap();
        for (key, citation) in &expected {
            let entry = bib.get(key).unwrap();
            assert_eq!(
                formatter.format(entry),
                *citation,
                "parser {} key {}",
                parser.name(),
                key
            );
        }
    }
}

#[test]
fn test_empty_source() {
    for parser in parsers() {
        assert!(parser.parse("", 2022).unwrap().is_empty());
        assert!(parser.parse("% only a comment\n", 2022).unwrap().is_empty());
    }
}

#[test]
fn test_fallback_later_duplicate_wins() {
    let source = "@article{dup, title = {First}, year = 2023}\n@misc{dup, title = {Second}, year = 2024}";
    let bib = FallbackParser::new().parse(source, 2022).unwrap();

    assert_eq!(bib.len(), 1);
    let entry = bib.get("dup").unwrap();
    assert_eq!(entry.field("title"), Some("Second"));
    assert_eq!(entry.entry_type, "misc");
}

#[test]
fn test_fallback_keeps_going_after_malformed_entry() {
    let source = r#"
@article{broken, title = {Unclosed, year = 2023
@article{good2023, title = "Fine", year = 2023}
@article{weird2024, title = {Ok}, = {orphan}, year = 2024}
"#;
    let bib = FallbackParser::new().parse(source, 2022).unwrap();

    assert!(bib.contains_key("good2023"));
    assert!(bib.contains_key("weird2024"));
    assert!(!bib.contains_key("broken"));
}

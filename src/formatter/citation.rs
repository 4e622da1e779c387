// file: src/formatter/citation.rs
// description: renders one bibliography entry as a markdown citation line
// reference: internal citation style

use crate::models::Entry;
use crate::parser::patterns::strip_brace_groups;

const AUTHOR_SEPARATOR: &str = " and ";
const DOI_RESOLVER: &str = "https://doi.org/";

/// Formats an author list: two names joined with "and", three or four with an
/// Oxford comma, five or more truncated to the first three and "et al.".
pub fn format_authors(authors: &str) -> String {
    if authors.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = authors.split(AUTHOR_SEPARATOR).map(str::trim).collect();

    match names.as_slice() {
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] if names.len() <= 4 => format!("{}, and {}", init.join(", "), last),
        _ => format!("{}, et al.", names[..3].join(", ")),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CitationFormatter;

impl CitationFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn title(&self, entry: &Entry) -> String {
        entry
            .field("title")
            .map(|title| strip_brace_groups(title.trim()).into_owned())
            .unwrap_or_default()
    }

    pub fn venue(&self, entry: &Entry) -> Option<String> {
        match entry.entry_type.as_str() {
            "inproceedings" | "inbook" | "incollection" => entry
                .non_empty_field("booktitle")
                .map(|booktitle| format!("In {}", booktitle)),
            "article" => entry
                .non_empty_field("journal")
                .map(|journal| format!("In *{}*", journal)),
            _ => None,
        }
    }

    pub fn links(&self, entry: &Entry) -> Vec<String> {
        let mut links = Vec::new();

        if let Some(url) = entry.field("url") {
            links.push(format!("[PDF]({})", url.trim()));
        }
        if let Some(doi) = entry.field("doi") {
            links.push(format!("[DOI]({}{})", DOI_RESOLVER, doi.trim()));
        }

        links
    }

    pub fn citation(&self, entry: &Entry) -> String {
        let mut parts = Vec::new();

        let authors = format_authors(entry.field("author").unwrap_or_default());
        if !authors.is_empty() {
            parts.push(format!("**{}**", authors));
        }

        let title = self.title(entry);
        if !title.is_empty() {
            parts.push(format!("*{}*", title));
        }

        if let Some(venue) = self.venue(entry) {
            parts.push(venue);
        }

        parts.push(format!("({})", entry.year));

        let mut citation = parts.join(". ");

        let links = self.links(entry);
        if !links.is_empty() {
            citation.push(' ');
            citation.push_str(&links.join(" | "));
        }

        citation
    }

    /// The citation as a markdown list item.
    pub fn format(&self, entry: &Entry) -> String {
        format!("- {}", self.citation(entry))
    }
}

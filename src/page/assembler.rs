// file: src/page/assembler.rs
// description: groups entries by category and renders the publications page
// reference: Quarto markdown with raw html blocks

use crate::config::PageConfig;
use crate::formatter::CitationFormatter;
use crate::models::{Bibliography, CategoryIndex, Entry};
use crate::page::widget::{
    CONTAINER_OPEN, DIV_CLOSE, RAW_HTML_CLOSE, RAW_HTML_OPEN, SEARCH_INPUT, SEARCH_SCRIPT,
    category_open,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const OTHER_CATEGORY_TAG: &str = "other";

/// Heading shown for a category tag.
pub fn display_name(tag: &str) -> String {
    let known = match tag {
        "thesis" => "Theses",
        "books" => "Books",
        "chapters" => "Book Chapters",
        "journals" => "Journal Articles",
        "magazines" => "Magazine Articles",
        "conferences" => "Conference Papers",
        "workshops" => "Workshop Papers",
        "posters" => "Poster Papers",
        "demos" => "Demo Papers",
        "techreports" => "Technical Reports",
        "patents" => "Patents",
        _ => return title_case(tag),
    };
    known.to_string()
}

fn title_case(tag: &str) -> String {
    let mut result = String::with_capacity(tag.len());
    let mut previous_alpha = false;

    for c in tag.chars() {
        if previous_alpha {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_alpha = c.is_alphabetic();
    }

    result
}

/// Entries split into display buckets, each sorted newest first.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// One bucket per displayed category, in display order.
    pub categorized: IndexMap<String, Vec<&'a Entry>>,
    pub uncategorized: Vec<&'a Entry>,
    /// Categories outside the display order whose entries were moved to the
    /// uncategorized bucket, with the number of entries moved.
    pub rerouted: BTreeMap<String, usize>,
}

impl Partition<'_> {
    pub fn rendered_count(&self) -> usize {
        self.categorized.values().map(Vec::len).sum::<usize>() + self.uncategorized.len()
    }
}

pub struct PageAssembler {
    title: String,
    category_order: Vec<String>,
    other_heading: String,
    formatter: CitationFormatter,
}

impl PageAssembler {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            title: config.title.clone(),
            category_order: config.category_order.clone(),
            other_heading: config.other_heading.clone(),
            formatter: CitationFormatter::new(),
        }
    }

    pub fn partition<'a>(
        &self,
        bibliography: &'a Bibliography,
        index: &CategoryIndex,
    ) -> Partition<'a> {
        let mut partition = Partition {
            categorized: self
                .category_order
                .iter()
                .map(|category| (category.clone(), Vec::new()))
                .collect(),
            ..Partition::default()
        };

        for entry in bibliography.iter() {
            match index.first_match(&entry.key, &self.category_order) {
                Some(category) => match partition.categorized.get_mut(category) {
                    Some(bucket) => bucket.push(entry),
                    None => {
                        *partition.rerouted.entry(category.to_string()).or_default() += 1;
                        partition.uncategorized.push(entry);
                    }
                },
                None => partition.uncategorized.push(entry),
            }
        }

        for bucket in partition.categorized.values_mut() {
            bucket.sort_by(|a, b| b.year.cmp(&a.year));
        }
        partition.uncategorized.sort_by(|a, b| b.year.cmp(&a.year));

        for (category, count) in &partition.rerouted {
            warn!(
                "Category '{}' is not in the display order; {} entries listed under {}",
                category, count, self.other_heading
            );
        }

        partition
    }

    pub fn render(&self, bibliography: &Bibliography, index: &CategoryIndex) -> String {
        let partition = self.partition(bibliography, index);
        self.render_partition(&partition, |_| {})
    }

    /// Renders the full document, calling `on_entry` after each citation.
    pub fn render_partition<F>(&self, partition: &Partition<'_>, mut on_entry: F) -> String
    where
        F: FnMut(&Entry),
    {
        let mut lines: Vec<String> = vec![
            "---".to_string(),
            format!("title: {}", quote_yaml(&self.title)),
            "---".to_string(),
            String::new(),
        ];

        push_raw_html(&mut lines, SEARCH_INPUT);
        lines.push(String::new());
        push_raw_html(&mut lines, &[CONTAINER_OPEN]);
        lines.push(String::new());

        for (category, entries) in &partition.categorized {
            if entries.is_empty() {
                continue;
            }
            debug!("Rendering {} entries under '{}'", entries.len(), category);
            self.push_section(&mut lines, &display_name(category), category, entries, &mut on_entry);
        }

        if !partition.uncategorized.is_empty() {
            self.push_section(
                &mut lines,
                &self.other_heading,
                OTHER_CATEGORY_TAG,
                &partition.uncategorized,
                &mut on_entry,
            );
        }

        push_raw_html(&mut lines, &[DIV_CLOSE]);
        lines.push(String::new());
        push_raw_html(&mut lines, SEARCH_SCRIPT);

        lines.join("\n")
    }

    fn push_section<F>(
        &self,
        lines: &mut Vec<String>,
        heading: &str,
        tag: &str,
        entries: &[&Entry],
        on_entry: &mut F,
    ) where
        F: FnMut(&Entry),
    {
        lines.push(format!("### {}", heading));
        lines.push(String::new());
        push_raw_html(lines, &[category_open(tag).as_str()]);
        lines.push(String::new());

        for entry in entries {
            lines.push(self.formatter.format(entry));
            lines.push(String::new());
            on_entry(*entry);
        }

        push_raw_html(lines, &[DIV_CLOSE]);
        lines.push(String::new());
    }
}

fn push_raw_html(lines: &mut Vec<String>, block: &[&str]) {
    lines.push(RAW_HTML_OPEN.to_string());
    lines.extend(block.iter().map(|line| line.to_string()));
    lines.push(RAW_HTML_CLOSE.to_string());
}

// JSON strings are valid YAML scalars
fn quote_yaml(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

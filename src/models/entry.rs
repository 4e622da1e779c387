// file: src/models/entry.rs
// description: bibliography entry model and the ordered entry collection
// reference: internal data structures

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// One bibliographic record after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub entry_type: String,
    pub year: i32,
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(key: impl Into<String>, entry_type: &str, year: i32) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.to_lowercase(),
            year,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value trimmed, `None` when absent or blank.
    pub fn non_empty_field(&self, name: &str) -> Option<&str> {
        self.field(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Entries keyed by citation key, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bibliography {
    entries: IndexMap<String, Entry>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. A repeated key replaces the earlier record but keeps
    /// its original position.
    pub fn insert(&mut self, entry: Entry) {
        match self.entries.entry(entry.key.clone()) {
            MapEntry::Occupied(mut slot) => {
                warn!("Duplicate bibliography key '{}', keeping the later record", entry.key);
                slot.insert(entry);
            }
            MapEntry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<Entry> for Bibliography {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut bibliography = Bibliography::new();
        for entry in iter {
            bibliography.insert(entry);
        }
        bibliography
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_is_lowercased() {
        let entry = Entry::new("foo2023", "InProceedings", 2023);
        assert_eq!(entry.entry_type, "inproceedings");
    }

    #[test]
    fn test_non_empty_field() {
        let entry = Entry::new("k", "misc", 2023)
            .with_field("Journal", "   ")
            .with_field("title", "  Title ");

        assert_eq!(entry.non_empty_field("journal"), None);
        assert_eq!(entry.non_empty_field("title"), Some("Title"));
        assert_eq!(entry.non_empty_field("missing"), None);
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let bib: Bibliography = vec![
            Entry::new("a", "article", 2022),
            Entry::new("b", "article", 2023),
            Entry::new("a", "book", 2024),
        ]
        .into_iter()
        .collect();

        assert_eq!(bib.len(), 2);
        assert_eq!(bib.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(bib.get("a").unwrap().entry_type, "book");
        assert_eq!(bib.get("a").unwrap().year, 2024);
    }
}

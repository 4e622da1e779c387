// file: src/models/category.rs
// description: category tag to entry key index
// reference: internal data structures

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryIndex {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `keys` into `category`, creating it even when `keys` is empty.
    pub fn add<I, S>(&mut self, category: &str, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(category.to_string())
            .or_default()
            .extend(keys.into_iter().map(Into::into));
    }

    pub fn keys_for(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    pub fn contains(&self, category: &str, key: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|keys| keys.contains(key))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// First category containing `key`, scanning `priority` before the
    /// remaining categories in lexical order.
    pub fn first_match<'a>(&'a self, key: &str, priority: &'a [String]) -> Option<&'a str> {
        let preferred = priority
            .iter()
            .map(String::as_str)
            .find(|category| self.contains(category, key));

        preferred.or_else(|| {
            self.categories
                .iter()
                .filter(|(category, _)| !priority.contains(*category))
                .find(|(_, keys)| keys.contains(key))
                .map(|(category, _)| category.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_add_unions_sets() {
        let mut index = CategoryIndex::new();
        index.add("journals", ["a", "b"]);
        index.add("journals", ["b", "c"]);

        let keys: Vec<_> = index.keys_for("journals").unwrap().iter().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_category_still_exists() {
        let mut index = CategoryIndex::new();
        index.add("posters", Vec::<String>::new());
        assert_eq!(index.len(), 1);
        assert!(index.keys_for("posters").unwrap().is_empty());
    }

    #[test]
    fn test_first_match_follows_priority() {
        let mut index = CategoryIndex::new();
        index.add("conferences", ["k"]);
        index.add("books", ["k"]);

        let priority = order(&["books", "conferences"]);
        assert_eq!(index.first_match("k", &priority), Some("books"));

        let reversed = order(&["conferences", "books"]);
        assert_eq!(index.first_match("k", &reversed), Some("conferences"));
    }

    #[test]
    fn test_first_match_falls_back_to_unlisted() {
        let mut index = CategoryIndex::new();
        index.add("preprints", ["k"]);

        let priority = order(&["books"]);
        assert_eq!(index.first_match("k", &priority), Some("preprints"));
        assert_eq!(index.first_match("missing", &priority), None);
    }
}

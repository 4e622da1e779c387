// file: src/parser/categories.rs
// description: builds the category index from \addtocategory directives
// reference: https://docs.rs/regex

use crate::error::{PipelineError, Result};
use crate::models::CategoryIndex;
use crate::parser::patterns::ADD_TO_CATEGORY;
use crate::parser::read_source;
use std::path::Path;
use tracing::{debug, warn};

pub struct CategoryIndexBuilder;

impl CategoryIndexBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> CategoryIndex {
        let mut index = CategoryIndex::new();

        for caps in ADD_TO_CATEGORY.captures_iter(content) {
            let category = &caps[1];
            let keys: Vec<&str> = caps[2]
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .collect();

            debug!("Category '{}' gains {} entries", category, keys.len());
            index.add(category, keys);
        }

        index
    }

    /// Loads the categorization file; a missing file yields an empty index.
    pub fn load(&self, path: &Path) -> Result<CategoryIndex> {
        match read_source(path) {
            Ok(content) => Ok(self.parse(&content)),
            Err(PipelineError::MissingInputFile { path }) => {
                warn!("Warning: {} not found", path.display());
                Ok(CategoryIndex::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for CategoryIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

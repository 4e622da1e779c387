// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::parser::ParserKind;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Categories rendered on the page, in display order.
pub const DEFAULT_CATEGORY_ORDER: [&str; 11] = [
    "books",
    "chapters",
    "journals",
    "conferences",
    "workshops",
    "techreports",
    "posters",
    "demos",
    "thesis",
    "magazines",
    "patents",
];

pub const DEFAULT_MIN_YEAR: i32 = 2022;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub parser: ParserConfig,
    pub page: PageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub bibliography: PathBuf,
    pub categories: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub kind: ParserKind,
    #[serde(default = "default_min_year")]
    pub min_year: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    pub title: String,
    #[serde(default = "default_category_order")]
    pub category_order: Vec<String>,
    #[serde(default = "default_other_heading")]
    pub other_heading: String,
}

fn default_min_year() -> i32 {
    DEFAULT_MIN_YEAR
}

fn default_category_order() -> Vec<String> {
    DEFAULT_CATEGORY_ORDER.iter().map(|c| c.to_string()).collect()
}

fn default_other_heading() -> String {
    "Other Publications".to_string()
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BIBPAGE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let cv_dir = PathBuf::from("../Oshani-CV");
        Self {
            paths: PathsConfig {
                bibliography: cv_dir.join("citations.bib"),
                categories: cv_dir.join("bib-entries.sty"),
                output: PathBuf::from("publications.qmd"),
            },
            parser: ParserConfig {
                kind: ParserKind::Auto,
                min_year: DEFAULT_MIN_YEAR,
            },
            page: PageConfig {
                title: "Publications".to_string(),
                category_order: default_category_order(),
                other_heading: default_other_heading(),
            },
        }
    }

    /// Points the three paths somewhere else, keeping every other setting.
    pub fn with_paths(
        mut self,
        bibliography: impl Into<PathBuf>,
        categories: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        self.paths = PathsConfig {
            bibliography: bibliography.into(),
            categories: categories.into(),
            output: output.into(),
        };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page.category_order.is_empty() {
            return Err(PipelineError::Config(
                "category_order must list at least one category".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.page.category_order {
            Validator::validate_category_tag(category)?;
            if !seen.insert(category.as_str()) {
                return Err(PipelineError::Config(format!(
                    "category_order lists '{}' more than once",
                    category
                )));
            }
        }

        if self.page.title.trim().is_empty() {
            return Err(PipelineError::Config(
                "page title must not be empty".to_string(),
            ));
        }

        if !(0..=9999).contains(&self.parser.min_year) {
            return Err(PipelineError::Config(format!(
                "min_year {} is out of range",
                self.parser.min_year
            )));
        }

        Ok(())
    }
}

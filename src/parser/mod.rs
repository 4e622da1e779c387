// file: src/parser/mod.rs
// description: bibliography and category parsing module exports
// reference: internal module structure

pub mod categories;
pub mod patterns;
#[cfg(feature = "biblatex")]
pub mod robust;
pub mod scanner;

pub use categories::CategoryIndexBuilder;
#[cfg(feature = "biblatex")]
pub use robust::RobustParser;
pub use scanner::FallbackParser;

use crate::error::{PipelineError, Result};
use crate::models::{Bibliography, Entry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Turns bibliography source text into year-filtered entries.
///
/// Implementations must agree on the output for well-formed input: keys are
/// kept verbatim, entry types and field names are lowercased, and only
/// records whose `year` parses to at least `min_year` are returned.
pub trait BibliographyParser {
    fn name(&self) -> &'static str;

    fn parse(&self, source: &str, min_year: i32) -> Result<Bibliography>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Robust parser when compiled in, scanner otherwise
    #[default]
    Auto,
    Robust,
    Fallback,
}

pub fn select_parser(kind: ParserKind) -> Result<Box<dyn BibliographyParser>> {
    match kind {
        ParserKind::Fallback => Ok(Box::new(FallbackParser::new())),
        ParserKind::Robust => robust_parser().ok_or_else(|| {
            PipelineError::Config(
                "robust parser requested but bibpage was built without the `biblatex` feature"
                    .to_string(),
            )
        }),
        ParserKind::Auto => Ok(robust_parser().unwrap_or_else(|| {
            warn!("biblatex support not compiled in, using fallback parser (may miss some entries)");
            Box::new(FallbackParser::new())
        })),
    }
}

#[cfg(feature = "biblatex")]
fn robust_parser() -> Option<Box<dyn BibliographyParser>> {
    Some(Box::new(RobustParser::new()))
}

#[cfg(not(feature = "biblatex"))]
fn robust_parser() -> Option<Box<dyn BibliographyParser>> {
    None
}

/// Integer value of a `year` field, 0 when absent or not a number.
pub fn parse_year(value: Option<&str>) -> i32 {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0)
}

/// Adds the record to `bibliography` when its year passes the cutoff.
pub(crate) fn push_if_recent(
    bibliography: &mut Bibliography,
    key: &str,
    entry_type: &str,
    fields: BTreeMap<String, String>,
    min_year: i32,
) {
    let year = parse_year(fields.get("year").map(String::as_str));
    if year < min_year {
        return;
    }

    let mut entry = Entry::new(key, entry_type, year);
    entry.fields = fields;
    bibliography.insert(entry);
}

/// Reads a whole input file. A missing file maps to `MissingInputFile`.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PipelineError::MissingInputFile {
            path: path.to_path_buf(),
        },
        _ => PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Parses the bibliography at `path`; a missing file yields an empty result.
pub fn load_bibliography(
    parser: &dyn BibliographyParser,
    path: &Path,
    min_year: i32,
) -> Result<Bibliography> {
    let source = match read_source(path) {
        Ok(source) => source,
        Err(PipelineError::MissingInputFile { path }) => {
            warn!("Warning: {} not found", path.display());
            return Ok(Bibliography::new());
        }
        Err(e) => return Err(e),
    };

    info!("Parsing {} with the {} parser", path.display(), parser.name());
    parser.parse(&source, min_year)
}

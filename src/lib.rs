// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod formatter;
pub mod models;
pub mod page;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{Config, PageConfig, ParserConfig, PathsConfig};
pub use error::{PipelineError, Result};
pub use exporter::json::{ExportManifest, ExportedEntry, JsonExporter};
pub use formatter::{CitationFormatter, format_authors};
pub use models::{Bibliography, CategoryIndex, Entry};
pub use page::{PageAssembler, Partition, display_name};
#[cfg(feature = "biblatex")]
pub use parser::RobustParser;
pub use parser::{
    BibliographyParser, CategoryIndexBuilder, FallbackParser, ParserKind, select_parser,
};
pub use pipeline::{Inputs, Pipeline, ProgressTracker, RunStats};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _assembler = PageAssembler::new(&config.page);
        let _formatter = CitationFormatter::new();
    }
}

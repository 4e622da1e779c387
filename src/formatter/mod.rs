// file: src/formatter/mod.rs
// description: citation formatting module exports
// reference: internal module structure

pub mod citation;

pub use citation::{CitationFormatter, format_authors};

// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod category;
pub mod entry;

pub use category::CategoryIndex;
pub use entry::{Bibliography, Entry};

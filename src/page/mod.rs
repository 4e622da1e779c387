// file: src/page/mod.rs
// description: page assembly module exports
// reference: internal module structure

pub mod assembler;
pub mod widget;

pub use assembler::{OTHER_CATEGORY_TAG, PageAssembler, Partition, display_name};

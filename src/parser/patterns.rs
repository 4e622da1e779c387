// file: src/parser/patterns.rs
// description: compiled regex patterns shared by the parsers and formatter
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    // \addtocategory{journals}{key1, key2}
    pub static ref ADD_TO_CATEGORY: Regex = Regex::new(
        r"\\addtocategory\{(\w+)\}\s*\{([^}]+)\}"
    ).expect("ADD_TO_CATEGORY regex is valid");

    pub static ref BRACE_GROUP: Regex = Regex::new(
        r"\{([^}]+)\}"
    ).expect("BRACE_GROUP regex is valid");

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).expect("WHITESPACE_RUN regex is valid");
}

/// Replaces every `{X}` group with `X`, one level deep.
pub fn strip_brace_groups(text: &str) -> Cow<'_, str> {
    BRACE_GROUP.replace_all(text, "$1")
}

/// Collapses line breaks and indentation inside a field value.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

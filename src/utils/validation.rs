// file: src/utils/validation.rs
// description: input validation for paths and category tags
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// The output must be a file path whose parent directory already exists.
    pub fn validate_output_path(path: &Path) -> Result<()> {
        if path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        if !parent.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Category tags must be usable inside `\addtocategory{...}`.
    pub fn validate_category_tag(tag: &str) -> Result<()> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(PipelineError::Validation(format!(
                "Invalid category tag '{}': use letters, digits or '_'",
                tag
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_output_path() {
        let temp = TempDir::new().unwrap();

        assert!(Validator::validate_output_path(&temp.path().join("out.qmd")).is_ok());
        assert!(Validator::validate_output_path(temp.path()).is_err());
        assert!(Validator::validate_output_path(&temp.path().join("nope/out.qmd")).is_err());
        assert!(Validator::validate_output_path(Path::new("out.qmd")).is_ok());
    }

    #[test]
    fn test_validate_category_tag() {
        assert!(Validator::validate_category_tag("journals").is_ok());
        assert!(Validator::validate_category_tag("tech_reports").is_ok());
        assert!(Validator::validate_category_tag("tech-reports").is_err());
        assert!(Validator::validate_category_tag("").is_err());
    }
}

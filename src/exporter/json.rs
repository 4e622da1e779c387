// file: src/exporter/json.rs
// description: json export of parsed entries and their category assignment

use crate::error::Result;
use crate::models::Entry;
use crate::page::{OTHER_CATEGORY_TAG, Partition};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedEntry<'a> {
    pub category: &'a str,
    #[serde(flatten)]
    pub entry: &'a Entry,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest<'a> {
    pub exported_at: String,
    pub min_year: i32,
    pub total_entries: usize,
    pub entries: Vec<ExportedEntry<'a>>,
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Entries in page order, each tagged with the bucket it renders under.
    pub fn manifest<'a>(&self, partition: &'a Partition<'a>, min_year: i32) -> ExportManifest<'a> {
        let categorized = partition.categorized.iter().flat_map(|(category, entries)| {
            entries.iter().map(move |entry| ExportedEntry {
                category: category.as_str(),
                entry: *entry,
            })
        });

        let uncategorized = partition.uncategorized.iter().map(|entry| ExportedEntry {
            category: OTHER_CATEGORY_TAG,
            entry: *entry,
        });

        let entries: Vec<_> = categorized.chain(uncategorized).collect();

        ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            min_year,
            total_entries: entries.len(),
            entries,
        }
    }

    pub fn export(&self, partition: &Partition<'_>, min_year: i32, pretty: bool) -> Result<usize> {
        info!("Starting JSON export to {}", self.output_path.display());

        let manifest = self.manifest(partition, min_year);
        let json = if pretty {
            serde_json::to_string_pretty(&manifest)?
        } else {
            serde_json::to_string(&manifest)?
        };

        fs::write(&self.output_path, json)?;

        info!("Export complete: {} entries exported", manifest.total_entries);
        Ok(manifest.total_entries)
    }
}

// file: src/pipeline/runner.rs
// description: runs category loading, parsing, page assembly and output in sequence
// reference: sequential publication page generation

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{Bibliography, CategoryIndex};
use crate::page::PageAssembler;
use crate::parser::{BibliographyParser, CategoryIndexBuilder, load_bibliography, select_parser};
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::utils::logging::format_step;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

const TOTAL_STEPS: usize = 4;

/// The parsed inputs of one run.
pub struct Inputs {
    pub categories: CategoryIndex,
    pub bibliography: Bibliography,
}

pub struct Pipeline {
    config: Config,
    parser: Box<dyn BibliographyParser>,
    show_progress: bool,
    colored: bool,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let parser = select_parser(config.parser.kind)?;

        Ok(Self {
            config,
            parser,
            show_progress: false,
            colored: true,
        })
    }

    /// Draw a progress bar while formatting citations.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Use the colored progress bar style.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parser_name(&self) -> &'static str {
        self.parser.name()
    }

    pub fn load_inputs(&self) -> Result<Inputs> {
        info!("{}", format_step(1, TOTAL_STEPS, "Reading categories"));
        let categories = CategoryIndexBuilder::new().load(&self.config.paths.categories)?;
        info!("Found {} categories", categories.len());

        info!("{}", format_step(2, TOTAL_STEPS, "Parsing bibliography"));
        let min_year = self.config.parser.min_year;
        let bibliography =
            load_bibliography(self.parser.as_ref(), &self.config.paths.bibliography, min_year)?;
        info!("Found {} publications from {} onwards", bibliography.len(), min_year);

        Ok(Inputs {
            categories,
            bibliography,
        })
    }

    /// Builds the page in memory without touching the output path.
    pub fn render(&self, inputs: &Inputs) -> (String, RunStats) {
        info!("{}", format_step(3, TOTAL_STEPS, "Generating publications page"));
        let assembler = PageAssembler::new(&self.config.page);
        let partition = assembler.partition(&inputs.bibliography, &inputs.categories);

        let mut tracker = if self.show_progress {
            ProgressTracker::with_color(partition.rendered_count(), self.colored)
        } else {
            ProgressTracker::hidden()
        };

        let document =
            assembler.render_partition(&partition, |entry| tracker.inc_formatted(&entry.key));
        tracker.finish();

        let stats = RunStats {
            entries_parsed: inputs.bibliography.len(),
            categories_found: inputs.categories.len(),
            entries_rendered: tracker.formatted(),
            uncategorized: partition.uncategorized.len(),
            per_category: partition
                .categorized
                .iter()
                .map(|(category, entries)| (category.clone(), entries.len()))
                .collect(),
            rerouted: partition.rerouted.values().sum(),
            output_bytes: document.len(),
            output_sha256: sha256_hex(&document),
            output_changed: true,
            duration_ms: tracker.elapsed_ms(),
        };

        (document, stats)
    }

    /// Full run: read inputs, render, and overwrite the output file.
    pub fn run(&self) -> Result<RunStats> {
        let inputs = self.load_inputs()?;
        let (document, mut stats) = self.render(&inputs);

        info!("{}", format_step(4, TOTAL_STEPS, "Writing output"));
        let output = &self.config.paths.output;
        stats.output_changed = previous_digest(output).as_deref() != Some(stats.output_sha256.as_str());
        write_document(output, &document)?;

        info!("Generated {}", output.display());
        Ok(stats)
    }
}

/// Writes the complete document with a single call.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn previous_digest(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|content| sha256_hex(&content))
}

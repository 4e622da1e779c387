// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks run metrics

use crate::utils::logging::{format_info, format_success, format_warning};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub entries_parsed: usize,
    pub categories_found: usize,
    pub entries_rendered: usize,
    pub uncategorized: usize,
    pub per_category: IndexMap<String, usize>,
    pub rerouted: usize,
    pub output_bytes: usize,
    pub output_sha256: String,
    pub output_changed: bool,
    pub duration_ms: u128,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categorized(&self) -> usize {
        self.per_category.values().sum()
    }

    /// Human-readable summary, one line per item.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format_success(&format!(
            "Rendered {} publications ({} categorized, {} other)",
            self.entries_rendered,
            self.categorized(),
            self.uncategorized
        ))];

        for (category, count) in self.per_category.iter().filter(|(_, c)| **c > 0) {
            lines.push(format_info(&format!("{}: {}", category, count)));
        }

        if self.rerouted > 0 {
            lines.push(format_warning(&format!(
                "{} entries belong only to categories outside the display order",
                self.rerouted
            )));
        }

        if !self.output_changed {
            lines.push(format_info("Output unchanged since the previous run"));
        }

        lines
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    formatted: usize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_entries: usize, colored: bool) -> Self {
        Self::from_bar(create_progress_bar(total_entries as u64, colored))
    }

    /// Tracker that counts without drawing anything.
    pub fn hidden() -> Self {
        Self::from_bar(ProgressBar::hidden())
    }

    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            formatted: 0,
            start_time: Instant::now(),
        }
    }

    pub fn inc_formatted(&mut self, key: &str) {
        self.formatted += 1;
        self.bar.set_message(key.to_string());
        self.bar.inc(1);
    }

    pub fn formatted(&self) -> usize {
        self.formatted
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(total: u64, colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let template = if colored {
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "{spinner} [{bar:40}] {pos}/{len} {msg}"
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts() {
        let mut tracker = ProgressTracker::hidden();
        tracker.inc_formatted("a");
        tracker.inc_formatted("b");
        assert_eq!(tracker.formatted(), 2);
    }

    #[test]
    fn test_stats_summary() {
        let mut stats = RunStats::new();
        stats.entries_rendered = 3;
        stats.uncategorized = 1;
        stats.per_category.insert("journals".to_string(), 2);
        stats.per_category.insert("books".to_string(), 0);
        stats.output_changed = true;

        assert_eq!(stats.categorized(), 2);
        let summary = stats.summary_lines().join("\n");
        assert!(summary.contains("Rendered 3 publications"));
        assert!(summary.contains("journals: 2"));
        assert!(!summary.contains("books"));
        assert!(!summary.contains("unchanged"));
    }
}

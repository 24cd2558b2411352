//! Content statistics for the build summary.
//!
//! Walks the same entries the README tree shows and tallies files,
//! directories, bytes, extensions, and the years mentioned anywhere in a
//! file's relative path.

use crate::config::NavConfig;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern is valid"));

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ContentStats {
    pub total_files: usize,
    pub total_dirs: usize,
    pub total_size: u64,
    pub years: BTreeSet<String>,
    /// Lower-cased extension (without the dot) to file count; `""` for none.
    pub file_types: BTreeMap<String, usize>,
}

impl ContentStats {
    /// `(first, last)` year covered, if any.
    pub fn year_span(&self) -> Option<(&str, &str)> {
        let first = self.years.first()?;
        let last = self.years.last()?;
        Some((first.as_str(), last.as_str()))
    }

    /// Extensions ordered by descending count, then name.
    pub fn file_types_by_count(&self) -> Vec<(&str, usize)> {
        let mut types: Vec<(&str, usize)> = self
            .file_types
            .iter()
            .map(|(ext, n)| (ext.as_str(), *n))
            .collect();
        types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        types
    }
}

/// Walk `root`, skipping what the README tree skips, and tally its contents.
pub fn collect_stats(root: &Path, config: &NavConfig) -> Result<ContentStats, walkdir::Error> {
    let mut stats = ContentStats::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !config.is_tree_ignored(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            stats.total_dirs += 1;
            continue;
        }

        stats.total_files += 1;
        stats.total_size += entry.metadata()?.len();

        let ext = entry
            .path()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        *stats.file_types.entry(ext).or_insert(0) += 1;

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if let Some(year) = YEAR.find(&rel.to_string_lossy()) {
            stats.years.insert(year.as_str().to_string());
        }
    }

    tracing::debug!(
        files = stats.total_files,
        dirs = stats.total_dirs,
        "collected content stats"
    );
    Ok(stats)
}

/// Human-readable byte size: `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

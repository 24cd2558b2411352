//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Diagnostics go through `tracing` to
//! stderr; this module is the user-facing report.
//!
//! # Output Format
//!
//! ## Sidebar
//!
//! ```text
//! Groups
//! 001 2024 (2 documents)
//!     A Signal Source
//!     B Power Supply
//!     Skipped: 0_cover.jpg
//! 002 2023 (0 documents)
//!
//! Wrote _sidebar.md (2 documents)
//! ```
//!
//! ## Stats
//!
//! ```text
//! Stats
//!     Files: 12
//!     Directories: 3
//!     Years: 3 (2021 - 2024)
//!     Size: 4.2 MB
//!     Types: pdf 9, jpg 3
//! ```

use crate::naming;
use crate::readme::ReadmeUpdate;
use crate::scan::{ContentTree, Group};
use crate::site::AssembleResult;
use crate::stats::{self, ContentStats};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{n} {stem}ies")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Sidebar
// ============================================================================

/// Group inventory: headers, linked titles, and the files left unlinked.
///
/// Collections continue the numbering after the year groups.
pub fn format_content_tree(tree: &ContentTree) -> Vec<String> {
    let mut lines = vec!["Groups".to_string()];
    for (i, group) in tree.groups.iter().enumerate() {
        push_group(&mut lines, i + 1, group, naming::display_title);
    }
    let offset = tree.groups.len();
    for (i, collection) in tree.collections.iter().enumerate() {
        let year_title = collection.year_title.as_deref();
        push_group(&mut lines, offset + i + 1, &collection.group, |file| {
            naming::collection_title(file, year_title)
        });
    }
    lines
}

fn push_group(
    lines: &mut Vec<String>,
    pos: usize,
    group: &Group,
    title: impl Fn(&str) -> String,
) {
    lines.push(format!(
        "{} {} ({})",
        format_index(pos),
        group.label,
        plural(group.files.len(), "document")
    ));
    for file in &group.files {
        lines.push(format!("    {}", title(file)));
    }
    if !group.skipped.is_empty() {
        lines.push(format!("    Skipped: {}", group.skipped.join(", ")));
    }
}

pub fn format_sidebar_written(path: &Path, documents: usize) -> String {
    format!(
        "Wrote {} ({})",
        path.display(),
        plural(documents, "document")
    )
}

pub fn print_sidebar_output(tree: &ContentTree, path: &Path) {
    for line in format_content_tree(tree) {
        println!("{}", line);
    }
    println!();
    println!("{}", format_sidebar_written(path, tree.link_count()));
}

// ============================================================================
// README tree
// ============================================================================

pub fn format_readme_output(update: &ReadmeUpdate) -> Vec<String> {
    let status = match (update.changed, update.appended) {
        (false, _) => "unchanged",
        (true, true) => "markers appended",
        (true, false) => "updated",
    };
    vec![
        format!("README {}: {}", status, update.path.display()),
        format!(
            "    {}, {}",
            plural(update.counts.directories, "directory"),
            plural(update.counts.files, "file")
        ),
    ]
}

pub fn print_readme_output(update: &ReadmeUpdate) {
    for line in format_readme_output(update) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats
// ============================================================================

pub fn format_stats_output(stats: &ContentStats) -> Vec<String> {
    let span = match stats.year_span() {
        Some((first, last)) => format!("{} ({} - {})", stats.years.len(), first, last),
        None => "0 (N/A)".to_string(),
    };
    let types = stats
        .file_types_by_count()
        .into_iter()
        .map(|(ext, n)| {
            let ext = if ext.is_empty() { "(none)" } else { ext };
            format!("{ext} {n}")
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        "Stats".to_string(),
        format!("    Files: {}", stats.total_files),
        format!("    Directories: {}", stats.total_dirs),
        format!("    Years: {}", span),
        format!("    Size: {}", stats::format_file_size(stats.total_size)),
    ];
    if !types.is_empty() {
        lines.push(format!("    Types: {}", types));
    }
    lines
}

pub fn print_stats_output(stats: &ContentStats) {
    for line in format_stats_output(stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Assemble
// ============================================================================

pub fn format_assemble_output(result: &AssembleResult, output: &Path) -> Vec<String> {
    vec![
        format!("Template: {}", plural(result.template_files, "file")),
        format!("Content: {}", plural(result.content_files, "file")),
        format_sidebar_written(&result.sidebar_path, result.sidebar.document_count()),
        format!("Site ready: {}", output.display()),
    ]
}

pub fn print_assemble_output(result: &AssembleResult, output: &Path) {
    for line in format_assemble_output(result, output) {
        println!("{}", line);
    }
}

//! Plain-text file tree for the README.
//!
//! Renders the content root the way `tree` does, wrapped in a code fence:
//!
//! ```text
//! .
//! ├── 2024
//! │   ├── 0_cover.jpg
//! │   └── A_Signal_Source.pdf
//! └── 2023
//!     └── B_Power_Supply.pdf
//!
//! 2 directories, 3 files
//! ```
//!
//! Directories are listed before files, each case-insensitively by name.
//! Entries in the Ignore Set, the README ignore list, and hidden entries are
//! left out at every depth. Names that are not valid UTF-8 are shown lossily.

use crate::config::NavConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Totals reported under the tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeCounts {
    pub directories: usize,
    pub files: usize,
}

/// Rendered tree block plus its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    pub text: String,
    pub counts: TreeCounts,
}

/// Render the fenced file tree of `root` with its totals.
pub fn render_tree(root: &Path, config: &NavConfig) -> std::io::Result<FileTree> {
    let mut lines = vec!["```".to_string(), ".".to_string()];
    let mut counts = TreeCounts::default();

    add_directory(root, "", config, &mut lines, &mut counts)?;

    lines.push(String::new());
    lines.push(format!(
        "{} directories, {} files",
        counts.directories, counts.files
    ));
    lines.push("```".to_string());

    Ok(FileTree {
        text: lines.join("\n"),
        counts,
    })
}

fn add_directory(
    dir: &Path,
    prefix: &str,
    config: &NavConfig,
    lines: &mut Vec<String>,
    counts: &mut TreeCounts,
) -> std::io::Result<()> {
    let mut children: Vec<(String, PathBuf, bool)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if config.is_tree_ignored(&name) {
            continue;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        children.push((name, path, is_dir));
    }
    children.sort_by(|(a, _, a_dir), (b, _, b_dir)| {
        b_dir
            .cmp(a_dir)
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
            .then_with(|| a.cmp(b))
    });

    let last = children.len().saturating_sub(1);
    for (i, (name, path, is_dir)) in children.into_iter().enumerate() {
        let (connector, continuation) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!("{prefix}{connector}{name}"));
        if is_dir {
            counts.directories += 1;
            let child_prefix = format!("{prefix}{continuation}");
            add_directory(&path, &child_prefix, config, lines, counts)?;
        } else {
            counts.files += 1;
        }
    }
    Ok(())
}

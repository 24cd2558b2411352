//! Keeps the file tree inside the README current.
//!
//! The tree lives between two HTML comment markers:
//!
//! ~~~text
//! <!-- readme-tree start -->
//! ```
//! .
//! └── 2024
//! ...
//! ```
//! <!-- readme-tree end -->
//! ~~~
//!
//! Everything outside the markers is preserved byte for byte. A README without
//! markers gets them appended, tree included, at the end.

use crate::config::{NavConfig, ReadmeConfig};
use crate::tree::{self, TreeCounts};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadmeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("README not found: {0}")]
    Missing(PathBuf),
}

/// Outcome of a README update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadmeUpdate {
    pub path: PathBuf,
    pub counts: TreeCounts,
    /// False when the README already held the current tree.
    pub changed: bool,
    /// True when markers were missing and got appended.
    pub appended: bool,
}

/// Replace the marked region of `content` with `tree`.
///
/// Returns the new content and whether the markers had to be appended.
pub fn splice_tree(content: &str, tree: &str, markers: &ReadmeConfig) -> (String, bool) {
    let start = content.find(&markers.start_marker);
    let end = start.and_then(|s| {
        let after = s + markers.start_marker.len();
        content[after..].find(&markers.end_marker).map(|e| after + e)
    });

    match (start, end) {
        (Some(start), Some(end)) => {
            let before = &content[..start + markers.start_marker.len()];
            let after = &content[end..];
            (format!("{before}\n{tree}\n{after}"), false)
        }
        _ => (
            format!(
                "{content}\n\n{}\n{tree}\n{}\n",
                markers.start_marker, markers.end_marker
            ),
            true,
        ),
    }
}

/// Regenerate the tree for `root` and write it into the configured README.
pub fn update_readme(root: &Path, config: &NavConfig) -> Result<ReadmeUpdate, ReadmeError> {
    let path = root.join(&config.readme.file);
    if !path.is_file() {
        return Err(ReadmeError::Missing(path));
    }

    let content = fs::read_to_string(&path)?;
    let tree = tree::render_tree(root, config)?;
    let (updated, appended) = splice_tree(&content, &tree.text, &config.readme);

    let changed = updated != content;
    if changed {
        fs::write(&path, &updated)?;
    }
    tracing::info!(
        path = %path.display(),
        changed,
        appended,
        "updated README tree"
    );

    Ok(ReadmeUpdate {
        path,
        counts: tree.counts,
        changed,
        appended,
    })
}

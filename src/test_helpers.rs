//! Shared test utilities for the yearnav test suite.
//!
//! Builds throwaway content trees and offers lookups over scan results.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = content_tree(&[
//!     ("2024/A_Signal_Source.pdf", ""),
//!     ("README.md", "# Archive"),
//! ]);
//! let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
//! assert_eq!(group_labels(&tree), vec!["2024"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::{ContentTree, Group};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding `(relative path, contents)` files.
///
/// Parent directories are created as needed.
pub fn content_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_files(tmp.path(), files);
    tmp
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Content tree lookups: panic with a clear message on miss
// =========================================================================

/// Group labels in scan order.
pub fn group_labels(tree: &ContentTree) -> Vec<&str> {
    tree.groups.iter().map(|g| g.label.as_str()).collect()
}

/// Find a group by label. Panics if not found.
pub fn find_group<'a>(tree: &'a ContentTree, label: &str) -> &'a Group {
    tree.groups
        .iter()
        .find(|g| g.label == label)
        .unwrap_or_else(|| {
            let labels = group_labels(tree);
            panic!("group '{label}' not found. Available: {labels:?}")
        })
}

//! Content tree scanning.
//!
//! Reads a checked-out content branch into a [`ContentTree`]: one [`Group`]
//! per top-level year directory, each listing the files that get a sidebar
//! link, followed by any configured [`Collection`]s.
//!
//! A top-level directory is a year group only when its name matches
//! `content.group_pattern` (`^\d{4}$` by default). When none does and
//! `content.fallback_dir` is set, the matching subdirectories of that
//! directory are the groups instead.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── README.md                    # Ignored (Ignore Set)
//! ├── .github/                     # Ignored (Ignore Set)
//! ├── assets/                      # Ignored (Ignore Set)
//! ├── docs/                        # Not a year: left out
//! ├── 2024/                        # Group
//! │   ├── 0_cover.jpg              # Reserved prefix: kept, not linked
//! │   ├── A_Signal_Source.pdf      # Linked as "A Signal Source"
//! │   └── B_Power_Supply.pdf
//! ├── 2023/                        # Group (empty groups still get a header)
//! └── 综合测评/                    # Collection, when configured
//! ```
//!
//! ## Ordering
//!
//! Directory listing order is filesystem-dependent, so both levels are sorted
//! explicitly: groups descending by label (newest year first), files ascending
//! by name. Collections keep their configured order.
//!
//! The checkout is assumed to be complete and consistent when the scan runs;
//! sequencing the checkout against this step is up to the CI runner.

use crate::config::ContentConfig;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content root does not exist: {0}")]
    RootMissing(PathBuf),
    #[error("Content root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("Invalid group pattern: {0}")]
    GroupPattern(#[from] regex::Error),
}

/// Year-grouped documents found under the content root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentTree {
    /// Groups in descending label order.
    pub groups: Vec<Group>,
    /// Sections rendered after the groups.
    pub collections: Vec<Collection>,
}

/// A year directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub label: String,
    /// Path relative to the content root, `/`-separated.
    pub dir: String,
    /// Linkable filenames in ascending order.
    pub files: Vec<String>,
    /// Files present on disk but left out of navigation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// A configured non-year section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    #[serde(flatten)]
    pub group: Group,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_title: Option<String>,
}

impl ContentTree {
    pub fn link_count(&self) -> usize {
        self.groups
            .iter()
            .chain(self.collections.iter().map(|c| &c.group))
            .map(|g| g.files.len())
            .sum()
    }
}

/// Scan a content root into year groups and collections.
pub fn scan(root: &Path, rules: &ContentConfig) -> Result<ContentTree, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }

    let pattern = rules.group_regex()?;
    let mut groups = find_groups(root, None, &pattern, rules)?;
    if let Some(fallback) = rules.fallback_dir.as_deref().filter(|_| groups.is_empty()) {
        let dir = root.join(fallback);
        if dir.is_dir() {
            tracing::debug!(dir = %fallback, "no year directories at the root, using fallback");
            groups = find_groups(&dir, Some(fallback), &pattern, rules)?;
        }
    }
    groups.sort_by(|a, b| b.label.cmp(&a.label));

    let mut collections = Vec::new();
    for collection in &rules.collections {
        let path = root.join(&collection.dir);
        if !path.is_dir() {
            tracing::debug!(dir = %collection.dir, "collection directory absent");
            continue;
        }
        collections.push(Collection {
            group: scan_group(collection.dir.clone(), collection.dir.clone(), &path, rules)?,
            year_title: collection.year_title.clone(),
        });
    }

    tracing::info!(
        root = %root.display(),
        groups = groups.len(),
        collections = collections.len(),
        "scanned content tree"
    );
    Ok(ContentTree {
        groups,
        collections,
    })
}

/// Subdirectories of `dir` whose names match the group pattern.
///
/// `prefix` is the route prefix of `dir` itself, `None` for the content root.
fn find_groups(
    dir: &Path,
    prefix: Option<&str>,
    pattern: &Regex,
    rules: &ContentConfig,
) -> Result<Vec<Group>, ScanError> {
    let mut groups = Vec::new();
    for (label, path) in list_names(dir)? {
        if rules.is_ignored(&label) || rules.is_hidden(&label) {
            tracing::debug!(name = %label, "ignoring entry");
            continue;
        }
        if !path.is_dir() || (prefix.is_none() && rules.is_collection(&label)) {
            continue;
        }
        if !pattern.is_match(&label) {
            tracing::debug!(name = %label, "not a year group");
            continue;
        }
        let route_dir = match prefix {
            Some(p) => format!("{p}/{label}"),
            None => label.clone(),
        };
        groups.push(scan_group(label, route_dir, &path, rules)?);
    }
    Ok(groups)
}

fn scan_group(
    label: String,
    dir: String,
    path: &Path,
    rules: &ContentConfig,
) -> Result<Group, ScanError> {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for (name, entry) in list_names(path)? {
        if !entry.is_file() {
            continue;
        }
        if rules.is_excluded_file(&name) {
            tracing::debug!(group = %label, file = %name, "not linking excluded file");
            skipped.push(name);
        } else {
            files.push(name);
        }
    }

    files.sort();
    skipped.sort();
    Ok(Group {
        label,
        dir,
        files,
        skipped,
    })
}

/// List a directory as `(name, path)` pairs, skipping names that are not UTF-8.
fn list_names(dir: &Path) -> Result<Vec<(String, PathBuf)>, ScanError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        match entry.file_name().into_string() {
            Ok(name) => names.push((name, path)),
            Err(raw) => tracing::warn!(?raw, dir = %dir.display(), "skipping non-UTF-8 name"),
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn groups_sorted_descending() {
        let tmp = content_tree(&[
            ("2019/a.pdf", ""),
            ("2023/a.pdf", ""),
            ("2021/a.pdf", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2023", "2021", "2019"]);
    }

    #[test]
    fn files_sorted_ascending() {
        let tmp = content_tree(&[
            ("2024/C_Timer.pdf", ""),
            ("2024/A_Source.pdf", ""),
            ("2024/B_Filter.pdf", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(
            find_group(&tree, "2024").files,
            vec!["A_Source.pdf", "B_Filter.pdf", "C_Timer.pdf"]
        );
    }

    #[test]
    fn ignore_set_applies_to_top_level() {
        let tmp = content_tree(&[
            ("2024/a.pdf", ""),
            (".github/workflows/docs.yml", ""),
            ("assets/logo.png", ""),
            ("README.md", "# Archive"),
            ("tree.bak", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
    }

    #[test]
    fn top_level_files_are_not_groups() {
        let tmp = content_tree(&[("2024/a.pdf", ""), ("index.html", "")]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
    }

    #[test]
    fn hidden_top_level_dirs_skipped() {
        let tmp = content_tree(&[("2024/a.pdf", ""), (".vscode/settings.json", "")]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
    }

    #[test]
    fn reserved_and_hidden_files_are_skipped_not_linked() {
        let tmp = content_tree(&[
            ("2024/0_cover.jpg", ""),
            ("2024/.DS_Store", ""),
            ("2024/A_Source.pdf", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        let group = find_group(&tree, "2024");
        assert_eq!(group.files, vec!["A_Source.pdf"]);
        assert_eq!(group.skipped, vec![".DS_Store", "0_cover.jpg"]);
        assert!(tmp.path().join("2024/0_cover.jpg").exists());
    }

    #[test]
    fn nested_directories_in_group_not_linked() {
        let tmp = content_tree(&[("2024/A_Source.pdf", ""), ("2024/extra/B.pdf", "")]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(find_group(&tree, "2024").files, vec!["A_Source.pdf"]);
    }

    #[test]
    fn empty_group_kept() {
        let tmp = content_tree(&[("2024/a.pdf", "")]);
        fs::create_dir(tmp.path().join("2022")).unwrap();
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024", "2022"]);
        assert!(find_group(&tree, "2022").files.is_empty());
    }

    #[test]
    fn non_year_dirs_do_not_outrank_years() {
        let tmp = content_tree(&[
            ("2024/A_Source.pdf", ""),
            ("2023/B.pdf", ""),
            ("综合测评/2023综合测评.pdf", ""),
            ("docs/guide.md", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024", "2023"]);
        assert!(tree.collections.is_empty());
    }

    #[test]
    fn configured_collections_follow_groups() {
        let tmp = content_tree(&[
            ("2024/A_Source.pdf", ""),
            ("综合测评/2023综合测评.pdf", ""),
            ("综合测评/0_rules.pdf", ""),
            ("docs/guide.md", ""),
        ]);
        let rules = ContentConfig {
            collections: vec![
                CollectionConfig {
                    dir: "综合测评".into(),
                    year_title: Some("{year}年综合测评".into()),
                },
                CollectionConfig {
                    dir: "absent".into(),
                    year_title: None,
                },
            ],
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
        assert_eq!(tree.collections.len(), 1);
        let collection = &tree.collections[0];
        assert_eq!(collection.group.label, "综合测评");
        assert_eq!(collection.group.files, vec!["2023综合测评.pdf"]);
        assert_eq!(collection.group.skipped, vec!["0_rules.pdf"]);
        assert_eq!(tree.link_count(), 2);
    }

    #[test]
    fn collection_matching_pattern_is_not_also_a_group() {
        let tmp = content_tree(&[("2024/a.pdf", ""), ("1999/b.pdf", "")]);
        let rules = ContentConfig {
            collections: vec![CollectionConfig {
                dir: "1999".into(),
                year_title: None,
            }],
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
        assert_eq!(tree.collections[0].group.label, "1999");
    }

    #[test]
    fn fallback_dir_used_without_top_level_years() {
        let tmp = content_tree(&[
            ("真题/2023/A.pdf", ""),
            ("真题/2024/B.pdf", ""),
            ("真题/notes/c.pdf", ""),
        ]);
        let rules = ContentConfig {
            fallback_dir: Some("真题".into()),
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024", "2023"]);
        assert_eq!(find_group(&tree, "2024").dir, "真题/2024");
    }

    #[test]
    fn fallback_dir_unused_when_years_exist() {
        let tmp = content_tree(&[("2022/a.pdf", ""), ("真题/2024/B.pdf", "")]);
        let rules = ContentConfig {
            fallback_dir: Some("真题".into()),
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["2022"]);
        assert_eq!(find_group(&tree, "2022").dir, "2022");
    }

    #[test]
    fn custom_group_pattern() {
        let tmp = content_tree(&[("2024/a.pdf", ""), ("season-3/b.pdf", "")]);
        let rules = ContentConfig {
            group_pattern: r"^season-\d+$".into(),
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["season-3"]);
    }

    #[test]
    fn invalid_group_pattern_is_error() {
        let tmp = content_tree(&[("2024/a.pdf", "")]);
        let rules = ContentConfig {
            group_pattern: "(".into(),
            ..ContentConfig::default()
        };
        assert!(matches!(
            scan(tmp.path(), &rules),
            Err(ScanError::GroupPattern(_))
        ));
    }

    #[test]
    fn custom_ignore_set() {
        let tmp = content_tree(&[("2024/a.pdf", ""), ("2019/b.pdf", "")]);
        let rules = ContentConfig {
            ignore: vec!["2019".into()],
            ..ContentConfig::default()
        };
        let tree = scan(tmp.path(), &rules).unwrap();
        assert_eq!(group_labels(&tree), vec!["2024"]);
    }

    #[test]
    fn link_count_sums_groups() {
        let tmp = content_tree(&[
            ("2024/a.pdf", ""),
            ("2024/b.pdf", ""),
            ("2024/0_c.jpg", ""),
            ("2023/a.pdf", ""),
        ]);
        let tree = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(tree.link_count(), 3);
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("absent"), &ContentConfig::default());
        assert!(matches!(result, Err(ScanError::RootMissing(_))));
    }

    #[test]
    fn file_root_is_error() {
        let tmp = content_tree(&[("README.md", "")]);
        let result = scan(&tmp.path().join("README.md"), &ContentConfig::default());
        assert!(matches!(result, Err(ScanError::RootNotDirectory(_))));
    }
}

//! Navigation document generation.
//!
//! Turns a [`ContentTree`] into the docsify `_sidebar.md`:
//!
//! ```text
//! * [Home](/)
//! * **2024**
//!   * [A Signal Source](#/2024/A_Signal_Source.pdf)
//!   * [B Power Supply](#/2024/B_Power_Supply.pdf)
//! * **2023**
//! ```
//!
//! The home entry (plus any configured fixed links) always comes first. Each
//! group contributes a header line even when it has no linkable files.
//! Collections follow the year groups with the same layout.
//!
//! The whole document is rendered in memory and written through a temporary
//! sibling file that is renamed over the target, so a failed run never leaves
//! a truncated sidebar behind.

use crate::config::{NavConfig, SidebarConfig};
use crate::naming;
use crate::scan::{self, ContentTree, ScanError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidebarError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One line of the navigation document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavEntry {
    /// Top-level link (home and fixed links).
    Link { title: String, link: String },
    /// Year group header.
    Group { label: String },
    /// Document link nested under the preceding group.
    Document { title: String, link: String },
}

/// Ordered navigation document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sidebar {
    pub entries: Vec<NavEntry>,
}

impl Sidebar {
    /// Build the navigation document for a scanned tree.
    pub fn build(tree: &ContentTree, settings: &SidebarConfig) -> Self {
        let mut entries = vec![NavEntry::Link {
            title: settings.home_title.clone(),
            link: settings.home_link.clone(),
        }];
        entries.extend(settings.links.iter().map(|l| NavEntry::Link {
            title: l.title.clone(),
            link: l.link.clone(),
        }));

        for group in &tree.groups {
            entries.push(NavEntry::Group {
                label: format!("{}{}", group.label, settings.group_suffix),
            });
            entries.extend(group.files.iter().map(|file| NavEntry::Document {
                title: naming::display_title(file),
                link: naming::route(&group.dir, file),
            }));
        }

        for collection in &tree.collections {
            let group = &collection.group;
            entries.push(NavEntry::Group {
                label: group.label.clone(),
            });
            entries.extend(group.files.iter().map(|file| NavEntry::Document {
                title: naming::collection_title(file, collection.year_title.as_deref()),
                link: naming::route(&group.dir, file),
            }));
        }

        Self { entries }
    }

    /// Number of document links.
    pub fn document_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, NavEntry::Document { .. }))
            .count()
    }

    /// Render as markdown, one entry per line, with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                NavEntry::Link { title, link } => {
                    out.push_str(&format!("* [{title}]({link})\n"));
                }
                NavEntry::Group { label } => {
                    out.push_str(&format!("* **{label}**\n"));
                }
                NavEntry::Document { title, link } => {
                    out.push_str(&format!("  * [{title}]({link})\n"));
                }
            }
        }
        out
    }
}

/// Scan `root` and build its sidebar without touching the filesystem.
pub fn generate(root: &Path, config: &NavConfig) -> Result<Sidebar, SidebarError> {
    let tree = scan::scan(root, &config.content)?;
    Ok(Sidebar::build(&tree, &config.sidebar))
}

/// A sidebar written into its content root.
#[derive(Debug)]
pub struct WrittenSidebar {
    pub tree: ContentTree,
    pub sidebar: Sidebar,
    pub path: PathBuf,
}

/// Scan `root`, then write the sidebar to the configured path inside it.
pub fn generate_to_root(root: &Path, config: &NavConfig) -> Result<WrittenSidebar, SidebarError> {
    let tree = scan::scan(root, &config.content)?;
    let sidebar = Sidebar::build(&tree, &config.sidebar);
    let path = root.join(&config.sidebar.output);
    write_sidebar(&sidebar, &path)?;
    Ok(WrittenSidebar {
        tree,
        sidebar,
        path,
    })
}

/// Overwrite `target` with the rendered sidebar.
pub fn write_sidebar(sidebar: &Sidebar, target: &Path) -> Result<(), SidebarError> {
    let rendered = sidebar.render();
    write_replacing(target, rendered.as_bytes()).map_err(|source| SidebarError::Write {
        path: target.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %target.display(),
        documents = sidebar.document_count(),
        "wrote sidebar"
    );
    Ok(())
}

/// Write via a temporary sibling and rename it over `target`.
fn write_replacing(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = target.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    if let Err(e) = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, target)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectionConfig, FixedLink};
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn render_root(tmp: &TempDir) -> String {
        generate(tmp.path(), &NavConfig::default()).unwrap().render()
    }

    #[test]
    fn renders_full_document() {
        let tmp = content_tree(&[
            ("2023/A_Signal_Source.pdf", ""),
            ("2024/B_Power_Supply.pdf", ""),
            ("2024/A_Filter.pdf", ""),
            ("2024/0_cover.jpg", ""),
        ]);
        assert_eq!(
            render_root(&tmp),
            "* [Home](/)\n\
             * **2024**\n\
             \x20 * [A Filter](#/2024/A_Filter.pdf)\n\
             \x20 * [B Power Supply](#/2024/B_Power_Supply.pdf)\n\
             * **2023**\n\
             \x20 * [A Signal Source](#/2023/A_Signal_Source.pdf)\n"
        );
    }

    #[test]
    fn title_and_path_for_report() {
        let tmp = content_tree(&[("2024/My_Report.pdf", "")]);
        let sidebar = generate(tmp.path(), &NavConfig::default()).unwrap();
        assert_eq!(
            sidebar.entries[2],
            NavEntry::Document {
                title: "My Report".into(),
                link: "#/2024/My_Report.pdf".into(),
            }
        );
    }

    #[test]
    fn reserved_prefix_file_never_linked() {
        let tmp = content_tree(&[("2024/0_cover.jpg", ""), ("2023/0_cover.jpg", "")]);
        let rendered = render_root(&tmp);
        assert!(!rendered.contains("0_cover"));
        assert!(!rendered.contains("cover"));
    }

    #[test]
    fn home_link_first_even_for_empty_root() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(render_root(&tmp), "* [Home](/)\n");
    }

    #[test]
    fn empty_group_emits_header_only() {
        let tmp = content_tree(&[("2024/a.pdf", "")]);
        std::fs::create_dir(tmp.path().join("2022")).unwrap();
        let rendered = render_root(&tmp);
        assert!(rendered.ends_with("* **2022**\n"));
    }

    #[test]
    fn link_lines_match_included_files() {
        let tmp = content_tree(&[
            ("2024/a.pdf", ""),
            ("2024/b.docx", ""),
            ("2024/.hidden", ""),
            ("2023/0_scan.png", ""),
            ("2023/c.pdf", ""),
            ("assets/logo.png", ""),
        ]);
        let rendered = render_root(&tmp);
        let links = rendered.lines().filter(|l| l.starts_with("  * ")).count();
        assert_eq!(links, 3);
    }

    #[test]
    fn headers_descend_and_links_ascend() {
        let tmp = content_tree(&[
            ("2019/z.pdf", ""),
            ("2021/m.pdf", ""),
            ("2021/b.pdf", ""),
            ("2020/k.pdf", ""),
        ]);
        let sidebar = generate(tmp.path(), &NavConfig::default()).unwrap();

        let headers: Vec<&str> = sidebar
            .entries
            .iter()
            .filter_map(|e| match e {
                NavEntry::Group { label } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert!(headers.windows(2).all(|w| w[0] > w[1]));

        let in_2021: Vec<&str> = sidebar
            .entries
            .iter()
            .skip_while(|e| !matches!(e, NavEntry::Group { label } if label == "2021"))
            .skip(1)
            .take_while(|e| matches!(e, NavEntry::Document { .. }))
            .map(|e| match e {
                NavEntry::Document { link, .. } => link.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(in_2021, vec!["#/2021/b.pdf", "#/2021/m.pdf"]);
    }

    #[test]
    fn fixed_links_and_suffix() {
        let tmp = content_tree(&[("2024/a.pdf", "")]);
        let mut config = NavConfig::default();
        config.sidebar.home_title = "**Home**".into();
        config.sidebar.group_suffix = " edition".into();
        config.sidebar.links = vec![FixedLink {
            title: "Usage".into(),
            link: "#usage".into(),
        }];
        let rendered = generate(tmp.path(), &config).unwrap().render();
        assert_eq!(
            rendered,
            "* [**Home**](/)\n* [Usage](#usage)\n* **2024 edition**\n  * [a](#/2024/a.pdf)\n"
        );
    }

    #[test]
    fn non_year_directories_come_after_years() {
        let tmp = content_tree(&[
            ("2024/A_Source.pdf", ""),
            ("2023/B.pdf", ""),
            ("综合测评/2023综合测评.pdf", ""),
            ("docs/guide.md", ""),
        ]);
        let mut config = NavConfig::default();
        config.content.collections = vec![CollectionConfig {
            dir: "综合测评".into(),
            year_title: Some("{year}年综合测评".into()),
        }];
        assert_eq!(
            generate(tmp.path(), &config).unwrap().render(),
            "* [Home](/)\n\
             * **2024**\n\
             \x20 * [A Source](#/2024/A_Source.pdf)\n\
             * **2023**\n\
             \x20 * [B](#/2023/B.pdf)\n\
             * **综合测评**\n\
             \x20 * [2023年综合测评](#/综合测评/2023综合测评.pdf)\n"
        );
    }

    #[test]
    fn fallback_groups_link_into_fallback_dir() {
        let tmp = content_tree(&[("真题/2024/A_Source.pdf", "")]);
        let mut config = NavConfig::default();
        config.content.fallback_dir = Some("真题".into());
        assert_eq!(
            generate(tmp.path(), &config).unwrap().render(),
            "* [Home](/)\n* **2024**\n  * [A Source](#/真题/2024/A_Source.pdf)\n"
        );
    }

    #[test]
    fn write_overwrites_existing_sidebar() {
        let tmp = content_tree(&[("2024/a.pdf", ""), ("_sidebar.md", "stale content\n")]);
        let result = generate_to_root(tmp.path(), &NavConfig::default()).unwrap();
        let written = std::fs::read_to_string(&result.path).unwrap();
        assert_eq!(written, result.sidebar.render());
        assert!(!written.contains("stale"));
        assert!(!tmp.path().join("_sidebar.md.tmp").exists());
    }

    #[test]
    fn generation_is_deterministic() {
        let tmp = content_tree(&[
            ("2024/b.pdf", ""),
            ("2024/a.pdf", ""),
            ("2023/c.pdf", ""),
        ]);
        let path = generate_to_root(tmp.path(), &NavConfig::default())
            .unwrap()
            .path;
        let first = std::fs::read(&path).unwrap();
        generate_to_root(tmp.path(), &NavConfig::default()).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("absent");
        let result = generate_to_root(&root, &NavConfig::default());
        assert!(matches!(
            result,
            Err(SidebarError::Scan(ScanError::RootMissing(_)))
        ));
        assert!(!root.join("_sidebar.md").exists());
    }

    #[test]
    fn unwritable_target_is_write_error() {
        let tmp = content_tree(&[("2024/a.pdf", "")]);
        let mut config = NavConfig::default();
        // A directory in the way of the target path.
        std::fs::create_dir(tmp.path().join("blocked")).unwrap();
        config.sidebar.output = "blocked".into();
        let result = generate_to_root(tmp.path(), &config);
        assert!(matches!(result, Err(SidebarError::Write { .. })));
    }
}

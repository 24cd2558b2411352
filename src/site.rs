//! Site assembly for publishing.
//!
//! Merges the site shell (template branch checkout) with the documents
//! (content branch checkout) into a fresh output directory and writes the
//! sidebar into it:
//!
//! ```text
//! template/           content/              output/
//! ├── index.html      ├── README.md         ├── index.html
//! └── .nojekyll       ├── 2024/             ├── .nojekyll
//!                     │   ├── 0_cover.jpg   ├── README.md
//!                     │   └── A.pdf         ├── 2024/ (0_cover.jpg, A.pdf)
//!                     └── .git/             └── _sidebar.md
//! ```
//!
//! Content files overwrite template files of the same path. Only `.git`
//! metadata is left behind; reserved-prefix and hidden files are published
//! even though the sidebar does not link them.
//!
//! The output may not lie inside either input: copying a tree into itself
//! never terminates.

use crate::config::NavConfig;
use crate::sidebar::{self, Sidebar, SidebarError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const VCS_DIR: &str = ".git";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Sidebar(#[from] SidebarError),
    #[error("Template directory not found: {0}")]
    TemplateMissing(PathBuf),
    #[error("Output directory is not empty: {0}")]
    OutputNotEmpty(PathBuf),
    #[error("Output directory {output} is inside {source_dir}")]
    OutputInsideSource { output: PathBuf, source_dir: PathBuf },
}

/// Summary of an assembled site.
#[derive(Debug)]
pub struct AssembleResult {
    pub template_files: usize,
    pub content_files: usize,
    pub sidebar: Sidebar,
    pub sidebar_path: PathBuf,
}

/// Copy `template` then `content` into an empty `output` and write the sidebar there.
pub fn assemble(
    template: &Path,
    content: &Path,
    output: &Path,
    config: &NavConfig,
) -> Result<AssembleResult, SiteError> {
    if !template.is_dir() {
        return Err(SiteError::TemplateMissing(template.to_path_buf()));
    }
    // Build the sidebar before touching the output so a bad content root
    // leaves nothing behind.
    let sidebar = sidebar::generate(content, config)?;

    let resolved = resolve(output)?;
    for source_dir in [content, template] {
        if resolved.starts_with(fs::canonicalize(source_dir)?) {
            return Err(SiteError::OutputInsideSource {
                output: output.to_path_buf(),
                source_dir: source_dir.to_path_buf(),
            });
        }
    }
    if output.exists() && fs::read_dir(output)?.next().is_some() {
        return Err(SiteError::OutputNotEmpty(output.to_path_buf()));
    }
    fs::create_dir_all(output)?;

    let template_files = copy_tree(template, output)?;
    tracing::info!(files = template_files, from = %template.display(), "copied template");
    let content_files = copy_tree(content, output)?;
    tracing::info!(files = content_files, from = %content.display(), "copied content");

    let sidebar_path = output.join(&config.sidebar.output);
    sidebar::write_sidebar(&sidebar, &sidebar_path)?;

    Ok(AssembleResult {
        template_files,
        content_files,
        sidebar,
        sidebar_path,
    })
}

/// Canonical form of a path that may not exist yet: the longest existing
/// ancestor is canonicalized and the missing components appended.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => break,
        }
    }
    let base = if existing.as_os_str().is_empty() {
        std::env::current_dir()?
    } else {
        fs::canonicalize(existing)?
    };
    Ok(missing.into_iter().rev().fold(base, |acc, name| acc.join(name)))
}

/// Copy everything under `src` into `dst` except VCS metadata. Returns the file count.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != VCS_DIR);

    for entry in walker {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

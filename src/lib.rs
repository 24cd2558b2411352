//! # yearnav
//!
//! Navigation and README tooling for document archives published with
//! [docsify](https://docsify.js.org). The archive is a content branch with one
//! directory per year; this crate turns it into a sidebar, keeps the README's
//! file tree current, and assembles the publishable site.
//!
//! # Pipeline
//!
//! ```text
//! 1. Tree      content/README.md   ← file tree spliced between markers
//! 2. Sidebar   content/            → _sidebar.md
//! 3. Assemble  template/ + content/ → site/  (published by CI)
//! ```
//!
//! The CI workflow runs stage 1 and commits the README, then runs stage 3
//! (which includes stage 2) and hands the output to the Pages publisher.
//! Checkout, commit, and publish are workflow steps, not part of this crate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `yearnav.toml` loading, merging over stock defaults, validation |
//! | [`scan`] | Reads year groups and their files from the content root |
//! | [`naming`] | Display titles and routes derived from filenames |
//! | [`sidebar`] | Builds, renders, and writes the navigation document |
//! | [`tree`] | Renders the README file tree |
//! | [`readme`] | Splices the tree into the README between markers |
//! | [`stats`] | File, directory, size, extension, and year totals |
//! | [`site`] | Merges template and content into the publish directory |
//! | [`output`] | CLI report formatting |
//!
//! # Conventions
//!
//! - Top-level directories named like a year are groups, newest (highest
//!   label) first; configured collections follow them.
//! - Files inside a group are linked in filename order; `0_`-prefixed and
//!   hidden files are published but not linked.
//! - `My_Report.pdf` in `2024/` becomes `[My Report](#/2024/My_Report.pdf)`.

pub mod config;
pub mod naming;
pub mod output;
pub mod readme;
pub mod scan;
pub mod sidebar;
pub mod site;
pub mod stats;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;

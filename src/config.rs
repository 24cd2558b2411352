//! Generator configuration.
//!
//! Handles loading, validating, and merging `yearnav.toml`. Stock defaults are
//! the fixed naming rules of a year-grouped archive; a config file in the
//! content root (or passed with `--config`) overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! ignore = [".git", ".github", "assets", "README.md", "tree.bak", "node_modules", "__pycache__"]
//! group_pattern = '^\d{4}$' # Top-level directories that become year groups
//! # fallback_dir = "真题"    # Searched for year groups when the root has none
//! reserved_prefix = "0_"    # Non-document assets inside a year folder
//! hidden_prefix = "."
//! collections = []          # Sections after the years: [{ dir = "综合测评", year_title = "{year}年综合测评" }]
//!
//! [sidebar]
//! output = "_sidebar.md"
//! home_title = "Home"
//! home_link = "/"
//! group_suffix = ""         # Appended to each year header
//! links = []                # Extra fixed links: [{ title = "Usage", link = "#usage" }]
//!
//! [readme]
//! file = "README.md"
//! start_marker = "<!-- readme-tree start -->"
//! end_marker = "<!-- readme-tree end -->"
//! ignore = ["_sidebar.md", "index.html", "yearnav.toml"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the content root.
pub const CONFIG_FILE: &str = "yearnav.toml";

/// Names never treated as year groups.
pub const DEFAULT_IGNORE: &[&str] = &[
    ".git",
    ".github",
    "assets",
    "README.md",
    "tree.bak",
    "node_modules",
    "__pycache__",
];

/// Top-level directory names that become year groups.
pub const GROUP_PATTERN: &str = r"^\d{4}$";

/// Placeholder replaced by the year found in a collection filename.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Filename prefix marking non-document assets (covers, scans) in a year folder.
pub const RESERVED_PREFIX: &str = "0_";

pub const HIDDEN_PREFIX: &str = ".";

pub const SIDEBAR_FILE: &str = "_sidebar.md";

pub const README_FILE: &str = "README.md";

pub const TREE_START_MARKER: &str = "<!-- readme-tree start -->";
pub const TREE_END_MARKER: &str = "<!-- readme-tree end -->";

/// Generated or infrastructure files left out of the README tree only.
pub const DEFAULT_README_IGNORE: &[&str] = &[SIDEBAR_FILE, "index.html", CONFIG_FILE];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full generator configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub content: ContentConfig,
    pub sidebar: SidebarConfig,
    pub readme: ReadmeConfig,
}

/// Rules for reading the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Top-level names excluded from grouping (and from the README tree).
    pub ignore: Vec<String>,
    /// Regex a top-level directory name must match to become a group.
    pub group_pattern: String,
    /// Directory searched for groups when no top-level directory matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_dir: Option<String>,
    /// Files starting with this prefix get no sidebar link.
    pub reserved_prefix: String,
    /// Hidden-file marker; hidden files get no sidebar link.
    pub hidden_prefix: String,
    /// Directories listed after the year groups, in this order.
    pub collections: Vec<CollectionConfig>,
}

/// A non-year section rendered after the year groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Top-level directory name, also the section header.
    pub dir: String,
    /// Link title for files whose name carries a year, e.g. `"{year} review"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_title: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            group_pattern: GROUP_PATTERN.to_string(),
            fallback_dir: None,
            reserved_prefix: RESERVED_PREFIX.to_string(),
            hidden_prefix: HIDDEN_PREFIX.to_string(),
            collections: Vec::new(),
        }
    }
}

impl ContentConfig {
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|n| n == name)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        name.starts_with(&self.hidden_prefix)
    }

    /// Whether a file inside a group is left out of the sidebar.
    pub fn is_excluded_file(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix) || self.is_hidden(name)
    }

    pub fn is_collection(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c.dir == name)
    }

    pub fn group_regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.group_pattern)
    }
}

/// A fixed link placed right after the home entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedLink {
    pub title: String,
    pub link: String,
}

/// Sidebar output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// Path of the navigation file, relative to the content root.
    pub output: String,
    pub home_title: String,
    pub home_link: String,
    /// Text appended to every group header label.
    pub group_suffix: String,
    pub links: Vec<FixedLink>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            output: SIDEBAR_FILE.to_string(),
            home_title: "Home".to_string(),
            home_link: "/".to_string(),
            group_suffix: String::new(),
            links: Vec::new(),
        }
    }
}

/// README tree settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadmeConfig {
    pub file: String,
    pub start_marker: String,
    pub end_marker: String,
    /// Names hidden from the README tree on top of `content.ignore`.
    pub ignore: Vec<String>,
}

impl Default for ReadmeConfig {
    fn default() -> Self {
        Self {
            file: README_FILE.to_string(),
            start_marker: TREE_START_MARKER.to_string(),
            end_marker: TREE_END_MARKER.to_string(),
            ignore: DEFAULT_README_IGNORE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NavConfig {
    /// Validate values that would otherwise produce a broken sidebar or README.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = self.content.group_regex() {
            return Err(ConfigError::Validation(format!(
                "content.group_pattern is not a valid regex: {e}"
            )));
        }
        if self.content.fallback_dir.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "content.fallback_dir must not be empty".into(),
            ));
        }
        for collection in &self.content.collections {
            if collection.dir.is_empty() {
                return Err(ConfigError::Validation(
                    "content.collections entries need a dir".into(),
                ));
            }
            if collection
                .year_title
                .as_ref()
                .is_some_and(|t| !t.contains(YEAR_PLACEHOLDER))
            {
                return Err(ConfigError::Validation(format!(
                    "year_title for collection '{}' must contain {YEAR_PLACEHOLDER}",
                    collection.dir
                )));
            }
        }
        if self.content.reserved_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "content.reserved_prefix must not be empty".into(),
            ));
        }
        if self.content.hidden_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "content.hidden_prefix must not be empty".into(),
            ));
        }
        if self.sidebar.output.is_empty() {
            return Err(ConfigError::Validation(
                "sidebar.output must not be empty".into(),
            ));
        }
        if self.readme.file.is_empty() {
            return Err(ConfigError::Validation(
                "readme.file must not be empty".into(),
            ));
        }
        if self.readme.start_marker.is_empty() || self.readme.end_marker.is_empty() {
            return Err(ConfigError::Validation(
                "readme markers must not be empty".into(),
            ));
        }
        if self.readme.start_marker == self.readme.end_marker {
            return Err(ConfigError::Validation(
                "readme.start_marker and readme.end_marker must differ".into(),
            ));
        }
        Ok(())
    }

    /// Whether a name is left out of the README tree and the stats walk.
    pub fn is_tree_ignored(&self, name: &str) -> bool {
        self.content.is_ignored(name)
            || self.content.is_hidden(name)
            || self.readme.ignore.iter().any(|n| n == name)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(NavConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value (arrays included)
/// replaces the base value entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<NavConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NavConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a content root.
///
/// An explicit path must exist; otherwise `yearnav.toml` in the root is used
/// when present and stock defaults when not.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<NavConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => load_raw_config(&root.join(CONFIG_FILE))?,
    };
    let config = resolve_config(overlay)?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Returns a fully-commented stock `yearnav.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# yearnav configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file as yearnav.toml in the content root, or pass --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content tree
# ---------------------------------------------------------------------------
[content]
# Top-level names never treated as year groups. Also hidden from the README tree.
ignore = [".git", ".github", "assets", "README.md", "tree.bak", "node_modules", "__pycache__"]

# Regex a top-level directory name must match to become a year group.
# Other directories are left out of the sidebar unless listed in collections.
group_pattern = '^\d{4}$'

# Searched for year groups when no top-level directory matches group_pattern.
# Links then point into it, e.g. #/真题/2024/A.pdf.
# fallback_dir = "真题"

# Files in a year folder starting with this prefix are kept but not linked.
reserved_prefix = "0_"

# Hidden files are kept but not linked.
hidden_prefix = "."

# Directories rendered as sections after the year groups, in this order.
# Files whose name contains a four-digit year are titled from year_title.
# collections = [{ dir = "综合测评", year_title = "{year}年综合测评" }]
collections = []

# ---------------------------------------------------------------------------
# Sidebar (_sidebar.md for docsify)
# ---------------------------------------------------------------------------
[sidebar]
# Output path relative to the content root.
output = "_sidebar.md"

# The first entry of every sidebar.
home_title = "Home"
home_link = "/"

# Appended to every year header, e.g. " edition".
group_suffix = ""

# Extra fixed links placed right after the home entry.
# links = [{ title = "Usage", link = "#usage" }]
links = []

# ---------------------------------------------------------------------------
# README file tree
# ---------------------------------------------------------------------------
[readme]
file = "README.md"
start_marker = "<!-- readme-tree start -->"
end_marker = "<!-- readme-tree end -->"

# Names hidden from the README tree in addition to content.ignore.
ignore = ["_sidebar.md", "index.html", "yearnav.toml"]
"##
}

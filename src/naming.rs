//! Display titles and routes derived from document filenames.
//!
//! Documents in a year folder are named with underscores standing in for
//! spaces. The display title is the filename with its extension stripped and
//! every underscore turned into a space; nothing else is normalized:
//!
//! - `My_Report.pdf` → "My Report"
//! - `A_Signal_Source.v2.pdf` → "A Signal Source.v2"
//! - `notes` → "notes"
//!
//! The sidebar route keeps the original filename, extension included:
//! `#/2024/My_Report.pdf`.
//!
//! Files in a collection may instead take their title from the first
//! four-digit run in the name: with `year_title = "{year} review"`,
//! `2023_review.pdf` becomes "2023 review".

use crate::config::YEAR_PLACEHOLDER;
use regex::Regex;
use std::sync::LazyLock;

static FILENAME_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("static regex"));

/// Strip the last extension from a filename.
///
/// A leading dot does not start an extension, so `.profile` is returned as is.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(pos) => &filename[..pos],
    }
}

/// Display title for a document filename.
pub fn display_title(filename: &str) -> String {
    strip_extension(filename).replace('_', " ")
}

/// Title for a file in a collection.
///
/// Falls back to [`display_title`] when there is no template or the name has
/// no four-digit run.
pub fn collection_title(filename: &str, year_title: Option<&str>) -> String {
    let year = FILENAME_YEAR.find(strip_extension(filename));
    match (year_title, year) {
        (Some(template), Some(year)) => template.replace(YEAR_PLACEHOLDER, year.as_str()),
        _ => display_title(filename),
    }
}

/// Client-side route for a document; `dir` is relative to the content root.
pub fn route(dir: &str, filename: &str) -> String {
    format!("#/{dir}/{filename}")
}

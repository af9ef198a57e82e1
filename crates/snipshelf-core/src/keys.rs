//! Storage key and file-name conventions.
//!
//! Pure string functions. These define where the collection lives in the
//! key-value store and what exported files are called.

/// The single key the whole snippet collection is stored under.
pub const SNIPPETS: &str = "codeSnippets";

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "snipshelf";

pub const CONFIG_FILE: &str = "config.json";

/// `snippets-<YYYY-MM-DD>.json`, dated in UTC.
pub fn export_file_name(at: jiff::Timestamp) -> String {
    format!("snippets-{}.json", at.strftime("%Y-%m-%d"))
}

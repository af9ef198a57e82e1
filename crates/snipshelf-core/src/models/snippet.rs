use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Language label shown when a snippet has none.
pub const PLAIN_TEXT: &str = "Plain Text";

/// Identifier of a snippet. Derived from the creation time in milliseconds,
/// so ids of snippets created later normally compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(pub u64);

impl SnippetId {
    /// Pick an id for a snippet created at `now` that is not in `taken`.
    ///
    /// Normally this sorts after every taken id. Once the largest taken id is
    /// `u64::MAX` that is impossible, and the smallest free id is used instead.
    pub fn next(now: jiff::Timestamp, taken: &HashSet<SnippetId>) -> Self {
        let millis = u64::try_from(now.as_millisecond()).unwrap_or(0);
        let after = match taken.iter().max() {
            Some(SnippetId(max)) if *max >= millis => max.checked_add(1),
            _ => Some(millis),
        };
        if let Some(id) = after {
            return SnippetId(id);
        }

        // Some id in 0..=taken.len() is always free.
        let mut id = 0;
        while taken.contains(&SnippetId(id)) {
            id += 1;
        }
        SnippetId(id)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnippetId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(SnippetId)
            .map_err(|_| CoreError::InvalidId(s.to_string()))
    }
}

/// A stored code snippet.
///
/// Field names serialize in camelCase. Records written by older versions may
/// lack `language`, `tags`, `updatedAt` or `favorite` (or carry `null`); those
/// fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Snippet {
    #[ts(type = "number")]
    pub id: SnippetId,
    pub title: String,
    /// Empty means unspecified.
    #[serde(default)]
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    pub code: String,
    #[serde(default)]
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub updated_at: Option<jiff::Timestamp>,
    #[serde(default)]
    #[serde(deserialize_with = "null_as_default")]
    pub favorite: bool,
}

impl Snippet {
    /// Build a fresh, non-favorite snippet from form input.
    pub fn new(id: SnippetId, draft: &SnippetDraft, now: jiff::Timestamp) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            language: draft.language.clone(),
            code: draft.code.clone(),
            tags: draft.tags(),
            created_at: now,
            updated_at: None,
            favorite: false,
        }
    }

    /// Replace the editable fields. `id`, `created_at` and `favorite` are kept.
    pub fn apply(&mut self, draft: &SnippetDraft, now: jiff::Timestamp) {
        self.title = draft.title.clone();
        self.language = draft.language.clone();
        self.code = draft.code.clone();
        self.tags = draft.tags();
        self.updated_at = Some(now);
    }

    pub fn language(&self) -> Option<&str> {
        if self.language.is_empty() {
            None
        } else {
            Some(&self.language)
        }
    }

    pub fn display_language(&self) -> &str {
        self.language().unwrap_or(PLAIN_TEXT)
    }

    /// Number of lines in `code`. An empty body still counts as one line.
    pub fn line_count(&self) -> usize {
        self.code.split('\n').count()
    }

    /// Tags joined back into the form they are edited in.
    pub fn tags_text(&self) -> String {
        self.tags.join(", ")
    }
}

/// The user-editable fields of a snippet, as entered in a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetDraft {
    pub title: String,
    pub language: String,
    pub code: String,
    /// Comma-separated tags, e.g. `"http, auth , "`.
    pub tags_text: String,
}

impl SnippetDraft {
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        code: impl Into<String>,
        tags_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            code: code.into(),
            tags_text: tags_text.into(),
        }
    }

    /// Pre-fill a draft from an existing snippet, for editing.
    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            title: snippet.title.clone(),
            language: snippet.language.clone(),
            code: snippet.code.clone(),
            tags_text: snippet.tags_text(),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_text)
    }
}

/// Split comma-separated tags, trimming each and dropping empty entries.
/// Duplicates and order are kept.
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

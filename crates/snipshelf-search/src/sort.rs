use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use snipshelf_core::models::snippet::Snippet;

use crate::error::SearchError;

/// Ordering applied to a query result. All orderings are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    Oldest,
    /// Title, A to Z, ignoring case.
    Title,
    /// Title, Z to A, ignoring case.
    TitleDesc,
    /// Favorites first, newest first within each group.
    Favorites,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::Title,
        SortKey::TitleDesc,
        SortKey::Favorites,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Title => "title",
            SortKey::TitleDesc => "title-desc",
            SortKey::Favorites => "favorites",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SearchError::UnknownSortKey(s.to_string()))
    }
}

/// Sort `snippets` in place by `key`.
pub fn sort_snippets(snippets: &mut [&Snippet], key: SortKey) {
    match key {
        SortKey::Newest => snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => snippets.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Title => snippets.sort_by_cached_key(|s| s.title.to_lowercase()),
        SortKey::TitleDesc => snippets.sort_by_cached_key(|s| Reverse(s.title.to_lowercase())),
        SortKey::Favorites => snippets.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

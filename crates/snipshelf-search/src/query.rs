use snipshelf_core::models::snippet::Snippet;

use crate::filter::Filter;
use crate::sort::{sort_snippets, SortKey};

/// What the user is currently looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Matched case-insensitively against title, code and tags. Empty matches all.
    pub search: String,
    /// Exact language match. `None` or empty means any language.
    pub language: Option<String>,
    pub favorites_only: bool,
    pub sort: SortKey,
}

impl Query {
    pub fn sorted(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }
}

/// An ordered view over a collection, with the counts a list header shows.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub snippets: Vec<&'a Snippet>,
    pub total: usize,
    pub filtered: usize,
}

impl QueryResult<'_> {
    pub fn count_label(&self) -> String {
        count_label(self.total, self.filtered)
    }
}

/// Filter then sort `snippets`. The input is left untouched.
pub fn query<'a>(snippets: &'a [Snippet], query: &Query) -> Vec<&'a Snippet> {
    let filter = Filter::new(query);
    let mut matched: Vec<&Snippet> = snippets.iter().filter(|s| filter.matches(s)).collect();
    sort_snippets(&mut matched, query.sort);
    matched
}

/// [`query`], plus total and filtered counts.
pub fn run<'a>(snippets: &'a [Snippet], q: &Query) -> QueryResult<'a> {
    let matched = query(snippets, q);
    QueryResult {
        total: snippets.len(),
        filtered: matched.len(),
        snippets: matched,
    }
}

/// `"3 snippets"` when nothing is hidden, `"2 of 3 snippets"` otherwise.
pub fn count_label(total: usize, filtered: usize) -> String {
    let plural = if total == 1 { "" } else { "s" };
    if total == filtered {
        format!("{total} snippet{plural}")
    } else {
        format!("{filtered} of {total} snippet{plural}")
    }
}

use snipshelf_core::models::snippet::Snippet;

use crate::query::Query;

/// The filter half of a [`Query`], with the search term lowercased once.
pub struct Filter<'q> {
    term: String,
    language: Option<&'q str>,
    favorites_only: bool,
}

impl<'q> Filter<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self {
            term: query.search.to_lowercase(),
            language: query.language.as_deref().filter(|l| !l.is_empty()),
            favorites_only: query.favorites_only,
        }
    }

    pub fn matches(&self, snippet: &Snippet) -> bool {
        self.matches_search(snippet) && self.matches_language(snippet) && self.matches_favorite(snippet)
    }

    /// Case-insensitive substring of the title, the code, or any tag.
    fn matches_search(&self, snippet: &Snippet) -> bool {
        if self.term.is_empty() {
            return true;
        }
        let term = self.term.as_str();
        snippet.title.to_lowercase().contains(term)
            || snippet.code.to_lowercase().contains(term)
            || snippet.tags.iter().any(|tag| tag.to_lowercase().contains(term))
    }

    /// Exact, case-sensitive.
    fn matches_language(&self, snippet: &Snippet) -> bool {
        self.language.is_none_or(|language| snippet.language == language)
    }

    fn matches_favorite(&self, snippet: &Snippet) -> bool {
        !self.favorites_only || snippet.favorite
    }
}

use std::collections::{BTreeSet, HashSet};

use snipshelf_core::models::snippet::{Snippet, SnippetDraft, SnippetId};
use snipshelf_storage::snippets::SnippetStorage;
use snipshelf_storage::store::KeyValueStore;

use crate::error::LibraryError;
use crate::transfer;

/// Owns the canonical snippet collection.
///
/// Newest insertions sit at the front. Every successful mutation writes the
/// whole collection back to storage before returning. When that write fails
/// the in-memory change is kept, the repository is marked dirty and the
/// storage error is returned; the next successful write (or [`flush`])
/// persists everything.
///
/// [`flush`]: Repository::flush
pub struct Repository<S> {
    storage: SnippetStorage<S>,
    snippets: Vec<Snippet>,
    dirty: bool,
}

impl<S: KeyValueStore> Repository<S> {
    /// Load whatever the store holds. Unusable data means an empty collection.
    pub fn open(store: S) -> Self {
        let storage = SnippetStorage::new(store);
        let snippets = storage.load();
        tracing::info!(count = snippets.len(), "snippet repository opened");
        Self {
            storage,
            snippets,
            dirty: false,
        }
    }

    /// The collection in its current order.
    pub fn all(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get(&self, id: SnippetId) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// True when the last write to storage failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Distinct non-empty languages, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.snippets
            .iter()
            .filter_map(|s| s.language())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Add a new snippet at the front of the collection.
    pub fn create(&mut self, draft: &SnippetDraft) -> Result<Snippet, LibraryError> {
        let now = jiff::Timestamp::now();
        let taken: HashSet<SnippetId> = self.snippets.iter().map(|s| s.id).collect();
        let snippet = Snippet::new(SnippetId::next(now, &taken), draft, now);

        self.snippets.insert(0, snippet.clone());
        tracing::info!(id = %snippet.id, title = %snippet.title, "snippet created");

        self.persist()?;
        Ok(snippet)
    }

    /// Replace the editable fields of an existing snippet.
    pub fn update(&mut self, id: SnippetId, draft: &SnippetDraft) -> Result<Snippet, LibraryError> {
        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(LibraryError::NotFound { id })?;

        snippet.apply(draft, jiff::Timestamp::now());
        let updated = snippet.clone();
        tracing::info!(%id, "snippet updated");

        self.persist()?;
        Ok(updated)
    }

    /// Flip the favorite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, id: SnippetId) -> Result<bool, LibraryError> {
        let snippet = self
            .snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(LibraryError::NotFound { id })?;

        snippet.favorite = !snippet.favorite;
        let favorite = snippet.favorite;
        tracing::info!(%id, favorite, "snippet favorite toggled");

        self.persist()?;
        Ok(favorite)
    }

    /// Remove the snippet with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: SnippetId) -> Result<bool, LibraryError> {
        let before = self.snippets.len();
        self.snippets.retain(|s| s.id != id);
        let removed = self.snippets.len() != before;
        tracing::info!(%id, removed, "snippet delete");

        self.persist()?;
        Ok(removed)
    }

    /// A copy of the whole collection, in order.
    pub fn export_all(&self) -> Vec<Snippet> {
        self.snippets.clone()
    }

    /// The whole collection as a pretty-printed JSON document.
    pub fn export_json(&self) -> Result<String, LibraryError> {
        let document = transfer::export_document(&self.snippets)?;
        tracing::info!(count = self.snippets.len(), "snippets exported");
        Ok(document)
    }

    /// Prepend the candidates whose ids are not already present.
    ///
    /// Colliding ids are skipped silently, also when only the id matches.
    /// A candidate repeating the id of an earlier candidate is skipped too.
    /// Returns how many were added.
    pub fn import_merge(&mut self, candidates: Vec<Snippet>) -> Result<usize, LibraryError> {
        let mut seen: HashSet<SnippetId> = self.snippets.iter().map(|s| s.id).collect();
        let offered = candidates.len();

        let mut merged: Vec<Snippet> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.id))
            .collect();
        let added = merged.len();

        merged.append(&mut self.snippets);
        self.snippets = merged;
        tracing::info!(offered, added, "snippets imported");

        self.persist()?;
        Ok(added)
    }

    /// Validate and merge the contents of an import file.
    /// An invalid file leaves the collection untouched.
    pub fn import_json(&mut self, text: &str) -> Result<usize, LibraryError> {
        let candidates = transfer::parse_import(text)?;
        self.import_merge(candidates)
    }

    /// Write the collection to storage again, e.g. after a failed save.
    pub fn flush(&mut self) -> Result<(), LibraryError> {
        self.persist()
    }

    fn persist(&mut self) -> Result<(), LibraryError> {
        match self.storage.save(&self.snippets) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::warn!(error = %e, "failed to save snippets, keeping changes in memory");
                Err(e.into())
            }
        }
    }
}

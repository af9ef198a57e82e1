use snipshelf_core::keys;
use snipshelf_core::models::snippet::Snippet;

use crate::error::StorageError;
use crate::state;
use crate::store::KeyValueStore;

/// Persists the whole snippet collection under [`keys::SNIPPETS`].
#[derive(Debug, Clone)]
pub struct SnippetStorage<S> {
    store: S,
}

impl<S: KeyValueStore> SnippetStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the stored collection.
    ///
    /// Nothing stored, an unparsable value and an unreadable store all give
    /// an empty collection.
    pub fn load(&self) -> Vec<Snippet> {
        match state::load_state::<Vec<Snippet>>(&self.store, keys::SNIPPETS) {
            Ok(Some(snippets)) => {
                tracing::debug!(count = snippets.len(), "snippets loaded");
                snippets
            }
            Ok(None) => {
                tracing::debug!("no stored snippets, starting fresh");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored snippets unusable, starting fresh");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection.
    pub fn save(&self, snippets: &[Snippet]) -> Result<(), StorageError> {
        state::save_state(&self.store, keys::SNIPPETS, snippets)?;
        tracing::debug!(count = snippets.len(), "snippets saved");
        Ok(())
    }
}

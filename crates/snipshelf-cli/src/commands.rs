use std::path::PathBuf;

use snipshelf_core::models::snippet::{Snippet, SnippetDraft, SnippetId};
use snipshelf_library::error::LibraryError;
use snipshelf_library::repository::Repository;
use snipshelf_search::query::{self, Query};
use snipshelf_storage::store::KeyValueStore;

/// Field changes for an edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetEdit {
    pub title: Option<String>,
    pub language: Option<String>,
    pub code: Option<String>,
    pub tags_text: Option<String>,
}

impl SnippetEdit {
    /// Overlay the changes on a draft pre-filled from the current snippet.
    pub fn apply_to(self, mut draft: SnippetDraft) -> SnippetDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(language) = self.language {
            draft.language = language;
        }
        if let Some(code) = self.code {
            draft.code = code;
        }
        if let Some(tags_text) = self.tags_text {
            draft.tags_text = tags_text;
        }
        draft
    }
}

/// A user action, already parsed and typed.
#[derive(Debug, Clone)]
pub enum Command {
    Add(SnippetDraft),
    Edit { id: SnippetId, changes: SnippetEdit },
    Delete { id: SnippetId },
    ToggleFavorite { id: SnippetId },
    /// Fetch the raw code, for copying.
    Show { id: SnippetId },
    List(Query),
    Export { path: PathBuf },
    Import { path: PathBuf },
    Languages,
}

/// What happened, for the front end to render.
#[derive(Debug, Clone)]
pub enum Outcome {
    Created(Snippet),
    Updated(Snippet),
    Deleted { id: SnippetId, removed: bool },
    Favorite { id: SnippetId, favorite: bool },
    Code(String),
    Listing {
        snippets: Vec<Snippet>,
        total: usize,
        filtered: usize,
    },
    Exported { path: PathBuf, count: usize },
    Imported { count: usize },
    Languages(Vec<String>),
    /// The id did not match any snippet. Nothing changed.
    NotFound(SnippetId),
}

/// Run one command against the repository.
pub fn execute<S: KeyValueStore>(
    repo: &mut Repository<S>,
    command: Command,
) -> eyre::Result<Outcome> {
    let outcome = match command {
        Command::Add(draft) => Outcome::Created(repo.create(&draft)?),
        Command::Edit { id, changes } => {
            let Some(current) = repo.get(id) else {
                return Ok(Outcome::NotFound(id));
            };
            let draft = changes.apply_to(SnippetDraft::from_snippet(current));
            not_found_as_outcome(id, repo.update(id, &draft).map(Outcome::Updated))?
        }
        Command::Delete { id } => Outcome::Deleted {
            id,
            removed: repo.delete(id)?,
        },
        Command::ToggleFavorite { id } => not_found_as_outcome(
            id,
            repo.toggle_favorite(id)
                .map(|favorite| Outcome::Favorite { id, favorite }),
        )?,
        Command::Show { id } => match repo.get(id) {
            Some(snippet) => Outcome::Code(snippet.code.clone()),
            None => Outcome::NotFound(id),
        },
        Command::List(q) => {
            let result = query::run(repo.all(), &q);
            Outcome::Listing {
                total: result.total,
                filtered: result.filtered,
                snippets: result.snippets.into_iter().cloned().collect(),
            }
        }
        Command::Export { path } => {
            let document = repo.export_json()?;
            std::fs::write(&path, document)
                .map_err(|e| eyre::eyre!("failed to write {}: {e}", path.display()))?;
            tracing::info!(path = %path.display(), "export written");
            Outcome::Exported {
                count: repo.len(),
                path,
            }
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
            Outcome::Imported {
                count: repo.import_json(&text)?,
            }
        }
        Command::Languages => Outcome::Languages(repo.languages()),
    };
    Ok(outcome)
}

fn not_found_as_outcome(
    id: SnippetId,
    result: Result<Outcome, LibraryError>,
) -> Result<Outcome, LibraryError> {
    match result {
        Err(LibraryError::NotFound { .. }) => {
            tracing::debug!(%id, "no snippet with this id");
            Ok(Outcome::NotFound(id))
        }
        other => other,
    }
}

use snipshelf_library::repository::Repository;
use snipshelf_storage::store::{FileStore, KeyValueStore};

use crate::config::SnipshelfConfig;

/// Everything one run of the app needs: its config and the repository.
pub struct AppState<S = FileStore> {
    pub config: SnipshelfConfig,
    pub repo: Repository<S>,
}

impl AppState<FileStore> {
    /// Open the file-backed repository under the configured data directory.
    pub fn open(config: SnipshelfConfig) -> eyre::Result<Self> {
        let data_dir = config.data_dir()?;
        tracing::debug!(data_dir = %data_dir.display(), "opening snippet store");
        Ok(Self::with_store(config, FileStore::new(data_dir)))
    }
}

impl<S: KeyValueStore> AppState<S> {
    pub fn with_store(config: SnipshelfConfig, store: S) -> Self {
        Self {
            config,
            repo: Repository::open(store),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown sort key: {0} (expected newest, oldest, title, title-desc or favorites)")]
    UnknownSortKey(String),
}

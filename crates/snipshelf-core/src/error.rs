use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid snippet id: {0}")]
    InvalidId(String),
}

//! snipshelf-storage
//!
//! Local key-value persistence. Thin layer over a file directory, plus an
//! in-memory store for tests.

pub mod error;
pub mod snippets;
pub mod state;
pub mod store;

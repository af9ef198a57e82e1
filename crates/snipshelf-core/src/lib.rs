//! snipshelf-core
//!
//! Pure domain types and storage key conventions.
//! No I/O here. This is the shared vocabulary of the snipshelf crates.

pub mod error;
pub mod keys;
pub mod models;

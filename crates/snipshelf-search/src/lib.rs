//! snipshelf-search
//!
//! Filter and sort a snippet collection into an ordered view. Pure functions,
//! the collection is only ever borrowed.

pub mod error;
pub mod filter;
pub mod query;
pub mod sort;

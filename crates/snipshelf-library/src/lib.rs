//! snipshelf-library
//!
//! The snippet repository: owns the canonical collection, enforces its
//! invariants and writes it through to storage after every change. Also the
//! JSON import/export boundary.

pub mod error;
pub mod repository;
pub mod transfer;

//! snipshelf-cli library root.
//!
//! Exposes the command layer, config and rendering so integration tests can
//! drive them without going through argument parsing.

pub mod commands;
pub mod config;
pub mod render;
pub mod state;

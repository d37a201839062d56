//! Infrastructure layer for TutorHub.
//!
//! Contains implementations of the repository traits defined in
//! `tutorhub-core` (SQLite via sqlx, split reader/writer pools), plus
//! data directory resolution and `config.toml` loading.

pub mod config;
pub mod data_dir;
pub mod sqlite;

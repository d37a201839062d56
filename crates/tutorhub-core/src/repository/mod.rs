//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (tutorhub-infra) implements. The core crate never depends on any
//! specific storage technology.
//!
//! All traits use native async fn in traits (Rust 2024 edition, no
//! async_trait macro).

pub mod booking;
pub mod city;
pub mod review;
pub mod schedule;
pub mod student;
pub mod subject;
pub mod teaching_level;
pub mod tutor;
pub mod tutor_subject;
pub mod user;

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

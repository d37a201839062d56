//! Business logic and repository trait definitions for TutorHub.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the services that enforce the marketplace rules
//! on top of them. It depends only on `tutorhub-types` -- never on
//! `tutorhub-infra` or any database/IO crate.

pub mod clock;
pub mod repository;
pub mod service;

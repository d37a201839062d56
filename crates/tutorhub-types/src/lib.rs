//! Shared domain types for TutorHub.
//!
//! Entities (cities, catalog, accounts, tutor offers, schedule slots,
//! bookings, reviews), their request DTOs with declarative validation,
//! the error enums used across the workspace, and configuration types.
//!
//! No infrastructure dependencies: serde, chrono, validator, thiserror.

pub mod account;
pub mod booking;
pub mod catalog;
pub mod city;
pub mod config;
pub mod error;
pub mod id;
pub mod money;
pub mod page;
pub mod review;
pub mod schedule;
pub mod tutor_subject;
pub mod validation;

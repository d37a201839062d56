//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and enforce the marketplace rules.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod booking;
pub mod city;
pub mod review;
pub mod schedule;
pub mod student;
pub mod subject;
pub mod teaching_level;
pub mod tutor;
pub mod tutor_subject;

mod account;

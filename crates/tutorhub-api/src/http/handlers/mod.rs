//! HTTP request handlers for the REST API.

pub mod booking;
pub mod city;
pub mod review;
pub mod schedule;
pub mod student;
pub mod subject;
pub mod teaching_level;
pub mod tutor;
pub mod tutor_subject;

//! Request extractors that report rejections through [`AppError`].
//!
//! [`AppError`]: crate::http::error::AppError

pub mod json;
pub mod query;

use axum::extract::FromRequestParts;

use crate::http::error::AppError;

/// `axum::extract::Path` with malformed segments reported as `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

//! Request extractors whose rejections render through [`AppError`].
//!
//! axum's own `Json`, `Path` and `Query` reject with plain-text bodies (and
//! 422 for JSON that does not match the target type). These wrappers turn
//! every rejection into a 400 `VALIDATION_ERROR` with the usual JSON body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query-string parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

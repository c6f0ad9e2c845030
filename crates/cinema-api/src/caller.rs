//! The [`Caller`] extractor.
//!
//! Authentication happens outside this crate. The host verifies credentials
//! and inserts a [`Caller`] into the request extensions; handlers that scope
//! data to a caller extract it and answer 401 when it is absent.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// The authenticated identity a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Caller>()
      .cloned()
      .ok_or(ApiError::Unauthorized)
  }
}

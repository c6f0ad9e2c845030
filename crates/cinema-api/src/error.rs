//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Domain errors coming out of a store are classified into statuses here.
//! A missing record is a 404 only when its id came from the request path;
//! an unknown id inside a request body is a 400.

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use cinema_core::{AsCoreError, Entity, Error as CoreError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("authentication required")]
  Unauthorized,

  /// A domain rule refused the request. `fields` attributes the failure to
  /// request fields where one applies.
  #[error("{message}")]
  Rejected {
    status:  StatusCode,
    message: String,
    fields:  BTreeMap<String, String>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// `kind` with `id` does not exist.
  pub fn missing(kind: Entity, id: Uuid) -> Self {
    Self::NotFound(format!("{kind} {id} not found"))
  }

  /// Classify a store error raised while handling a request with no path id.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + AsCoreError + Send + Sync + 'static,
  {
    Self::from_store(e, None)
  }

  /// Classify a store error raised while handling `/{kind}/{id}`.
  pub fn at<E>(path: Entity) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + AsCoreError + Send + Sync + 'static,
  {
    move |e| Self::from_store(e, Some(path))
  }

  fn from_store<E>(e: E, path: Option<Entity>) -> Self
  where
    E: std::error::Error + AsCoreError + Send + Sync + 'static,
  {
    match e.as_core() {
      Some(core) => Self::from_core(core, path),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn from_core(e: &CoreError, path: Option<Entity>) -> Self {
    let message = e.to_string();
    let mut fields = BTreeMap::new();
    let status = match e {
      CoreError::Range(range) => {
        fields.insert(range.field.to_string(), message.clone());
        StatusCode::BAD_REQUEST
      }
      CoreError::SeatTaken { .. } => {
        fields.insert("row".to_owned(), message.clone());
        fields.insert("seat".to_owned(), message.clone());
        StatusCode::CONFLICT
      }
      CoreError::NotFound { kind, .. } if Some(*kind) == path => StatusCode::NOT_FOUND,
      CoreError::NotFound { .. } => StatusCode::BAD_REQUEST,
      CoreError::EmptyOrder => {
        fields.insert("tickets".to_owned(), message.clone());
        StatusCode::BAD_REQUEST
      }
      CoreError::InvalidValue { field, .. } => {
        fields.insert((*field).to_owned(), message.clone());
        StatusCode::BAD_REQUEST
      }
      CoreError::GridTooLarge { .. } => {
        fields.insert("seats_in_row".to_owned(), message.clone());
        StatusCode::BAD_REQUEST
      }
      CoreError::GeometryConflict { .. } | CoreError::DuplicateGenre(_) => {
        StatusCode::CONFLICT
      }
    };
    Self::Rejected { status, message, fields }
  }
}

/// A body that parses as JSON but not as the expected shape is attributed to
/// the innermost field named in the deserializer's path, e.g. `row` for
/// `tickets[0].row`. Every other body failure is a plain 400.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    let text = rejection.body_text();
    let JsonRejection::JsonDataError(_) = rejection else {
      return Self::BadRequest(text);
    };

    let detail = text.split_once("target type: ").map_or(text.as_str(), |(_, d)| d);
    let mut fields = BTreeMap::new();
    if let Some((path, reason)) = detail.split_once(": ")
      && !path.contains(' ')
      && let Some(field) = path.rsplit('.').next()
    {
      let field = field.split('[').next().unwrap_or(field);
      if !field.is_empty() {
        fields.insert(field.to_owned(), reason.to_owned());
      }
    }
    Self::Rejected {
      status: StatusCode::BAD_REQUEST,
      message: detail.to_owned(),
      fields,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, r#"Basic realm="cinema""#)],
        Json(json!({ "error": "authentication required" })),
      )
        .into_response(),
      ApiError::Rejected { status, message, fields } if fields.is_empty() => {
        (status, Json(json!({ "error": message }))).into_response()
      }
      ApiError::Rejected { status, message, fields } => {
        (status, Json(json!({ "error": message, "fields": fields }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal storage error" })),
        )
          .into_response()
      }
    }
  }
}

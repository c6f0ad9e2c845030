//! Handlers for `/genres` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/genres` | |
//! | `POST`   | `/genres` | Body: `{"name":"drama"}`; 409 on a taken name |
//! | `GET`    | `/genres/{id}` | |
//! | `PUT`    | `/genres/{id}` | Body as for `POST` |
//! | `DELETE` | `/genres/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinema_core::{Entity, store::CinemaStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{body::ApiJson, error::ApiError, views::GenreBody};

#[derive(Debug, Deserialize)]
pub struct GenreInput {
  pub name: String,
}

/// `GET /genres`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<GenreBody>>, ApiError> {
  let genres = store.list_genres().await.map_err(ApiError::store)?;
  Ok(Json(genres.into_iter().map(Into::into).collect()))
}

/// `POST /genres`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<GenreInput>,
) -> Result<impl IntoResponse, ApiError> {
  let genre = store.add_genre(body.name).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(GenreBody::from(genre))))
}

/// `GET /genres/{id}`
pub async fn get_one<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GenreBody>, ApiError> {
  let genre = store
    .get_genre(id)
    .await
    .map_err(ApiError::at(Entity::Genre))?
    .ok_or_else(|| ApiError::missing(Entity::Genre, id))?;
  Ok(Json(genre.into()))
}

/// `PUT /genres/{id}`
pub async fn update<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<GenreInput>,
) -> Result<Json<GenreBody>, ApiError> {
  let genre = store
    .update_genre(id, body.name)
    .await
    .map_err(ApiError::at(Entity::Genre))?;
  Ok(Json(genre.into()))
}

/// `DELETE /genres/{id}`
pub async fn delete<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_genre(id).await.map_err(ApiError::at(Entity::Genre))?;
  Ok(StatusCode::NO_CONTENT)
}

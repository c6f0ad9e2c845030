//! Handlers for `/movies` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/movies` | Optional `?genres=<ids>&actors=<ids>&title=<text>`; ids comma-separated |
//! | `POST`   | `/movies` | Body: [`MovieInput`] |
//! | `GET`    | `/movies/{id}` | Genres and actors expanded |
//! | `PUT`    | `/movies/{id}` | Body: [`MovieInput`] |
//! | `DELETE` | `/movies/{id}` | Removes the movie's sessions and tickets |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinema_core::{
  Entity,
  catalogue::{MovieQuery, NewMovie},
  store::CinemaStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  body::ApiJson,
  error::ApiError,
  views::{MovieBody, MovieDetailBody, MovieListItem},
};

#[derive(Debug, Deserialize)]
pub struct MovieInput {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  /// Minutes.
  pub duration:    u32,
  #[serde(default)]
  pub genres:      Vec<Uuid>,
  #[serde(default)]
  pub actors:      Vec<Uuid>,
}

impl From<MovieInput> for NewMovie {
  fn from(m: MovieInput) -> Self {
    Self {
      title:       m.title,
      description: m.description,
      duration:    m.duration,
      genre_ids:   m.genres,
      actor_ids:   m.actors,
    }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Comma-separated genre ids; any may match.
  pub genres: Option<String>,
  /// Comma-separated actor ids; any may match.
  pub actors: Option<String>,
  /// Case-insensitive title substring.
  pub title:  Option<String>,
}

fn parse_ids(param: &str, raw: Option<&str>) -> Result<Vec<Uuid>, ApiError> {
  raw
    .into_iter()
    .flat_map(|s| s.split(','))
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      Uuid::parse_str(s).map_err(|_| ApiError::BadRequest(format!("{param}: invalid id {s:?}")))
    })
    .collect()
}

/// `GET /movies[?genres=...][&actors=...][&title=...]`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieListItem>>, ApiError> {
  let query = MovieQuery {
    genre_ids: parse_ids("genres", params.genres.as_deref())?,
    actor_ids: parse_ids("actors", params.actors.as_deref())?,
    title:     params.title.filter(|t| !t.is_empty()),
  };
  let movies = store.list_movies(&query).await.map_err(ApiError::store)?;
  Ok(Json(movies.into_iter().map(Into::into).collect()))
}

// ─── Write ───────────────────────────────────────────────────────────────────

/// `POST /movies`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<MovieInput>,
) -> Result<impl IntoResponse, ApiError> {
  let movie = store.add_movie(body.into()).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(MovieBody::from(movie))))
}

/// `PUT /movies/{id}`
pub async fn update<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<MovieInput>,
) -> Result<Json<MovieBody>, ApiError> {
  let movie = store
    .update_movie(id, body.into())
    .await
    .map_err(ApiError::at(Entity::Movie))?;
  Ok(Json(movie.into()))
}

/// `DELETE /movies/{id}`
pub async fn delete<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_movie(id).await.map_err(ApiError::at(Entity::Movie))?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /movies/{id}`
pub async fn get_one<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<MovieDetailBody>, ApiError> {
  let movie = store
    .get_movie(id)
    .await
    .map_err(ApiError::at(Entity::Movie))?
    .ok_or_else(|| ApiError::missing(Entity::Movie, id))?;
  Ok(Json(movie.into()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_are_comma_separated() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let raw = format!("{a}, {b},");
    assert_eq!(parse_ids("genres", Some(&raw)).unwrap(), vec![a, b]);
    assert!(parse_ids("genres", None).unwrap().is_empty());
  }

  #[test]
  fn bad_id_is_a_bad_request() {
    let err = parse_ids("actors", Some("7")).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(m) if m.starts_with("actors")));
  }
}

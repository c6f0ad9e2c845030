//! Handlers for `/movie_sessions` endpoints. All of them require a
//! [`Caller`]: deleting or moving a session reaches the tickets sold for it.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/movie_sessions` | Optional `?movie=<id>&date=YYYY-MM-DD`; newest first |
//! | `POST`   | `/movie_sessions` | Body: `{"show_time","movie","cinema_hall"}` |
//! | `GET`    | `/movie_sessions/{id}` | Includes `taken_places` |
//! | `PUT`    | `/movie_sessions/{id}` | 409 if a hall change strands sold seats |
//! | `DELETE` | `/movie_sessions/{id}` | |
//! | `GET`    | `/movie_sessions/{id}/availability` | Capacity, available count, taken seats |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use cinema_core::{
  Entity,
  ledger::Availability,
  session::{NewSession, SessionQuery},
  store::CinemaStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  body::ApiJson,
  caller::Caller,
  error::ApiError,
  views::{SessionBody, SessionDetailBody, SessionListItem},
};

#[derive(Debug, Deserialize)]
pub struct SessionInput {
  pub show_time:   DateTime<Utc>,
  pub movie:       Uuid,
  pub cinema_hall: Uuid,
}

impl From<SessionInput> for NewSession {
  fn from(s: SessionInput) -> Self {
    Self { movie_id: s.movie, hall_id: s.cinema_hall, show_time: s.show_time }
  }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub movie: Option<Uuid>,
  pub date:  Option<NaiveDate>,
}

/// `GET /movie_sessions[?movie=<id>][&date=YYYY-MM-DD]`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SessionListItem>>, ApiError> {
  let query = SessionQuery { movie_id: params.movie, date: params.date };
  let sessions = store.list_sessions(&query).await.map_err(ApiError::store)?;
  Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// `POST /movie_sessions`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  ApiJson(body): ApiJson<SessionInput>,
) -> Result<impl IntoResponse, ApiError> {
  let session = store.add_session(body.into()).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(SessionBody::from(session))))
}

/// `GET /movie_sessions/{id}`
pub async fn get_one<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionDetailBody>, ApiError> {
  let session = store
    .get_session(id)
    .await
    .map_err(ApiError::at(Entity::MovieSession))?
    .ok_or_else(|| ApiError::missing(Entity::MovieSession, id))?;
  Ok(Json(session.into()))
}

/// `PUT /movie_sessions/{id}`
pub async fn update<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<SessionInput>,
) -> Result<Json<SessionBody>, ApiError> {
  let session = store
    .update_session(id, body.into())
    .await
    .map_err(ApiError::at(Entity::MovieSession))?;
  Ok(Json(session.into()))
}

/// `DELETE /movie_sessions/{id}`
pub async fn delete<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_session(id)
    .await
    .map_err(ApiError::at(Entity::MovieSession))?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /movie_sessions/{id}/availability`
pub async fn availability<S: CinemaStore>(
  State(store): State<Arc<S>>,
  _caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Availability>, ApiError> {
  let view = store
    .availability(id)
    .await
    .map_err(ApiError::at(Entity::MovieSession))?;
  Ok(Json(view))
}

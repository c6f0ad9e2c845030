//! Handlers for `/actors` endpoints.
//!
//! Bodies are `{"first_name":"…","last_name":"…"}`; responses add
//! `full_name`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinema_core::{Entity, catalogue::NewActor, store::CinemaStore};
use uuid::Uuid;

use crate::{body::ApiJson, error::ApiError, views::ActorBody};

/// `GET /actors`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ActorBody>>, ApiError> {
  let actors = store.list_actors().await.map_err(ApiError::store)?;
  Ok(Json(actors.into_iter().map(Into::into).collect()))
}

/// `POST /actors`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewActor>,
) -> Result<impl IntoResponse, ApiError> {
  let actor = store.add_actor(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(ActorBody::from(actor))))
}

/// `GET /actors/{id}`
pub async fn get_one<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ActorBody>, ApiError> {
  let actor = store
    .get_actor(id)
    .await
    .map_err(ApiError::at(Entity::Actor))?
    .ok_or_else(|| ApiError::missing(Entity::Actor, id))?;
  Ok(Json(actor.into()))
}

/// `PUT /actors/{id}`
pub async fn update<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<NewActor>,
) -> Result<Json<ActorBody>, ApiError> {
  let actor = store
    .update_actor(id, body)
    .await
    .map_err(ApiError::at(Entity::Actor))?;
  Ok(Json(actor.into()))
}

/// `DELETE /actors/{id}`
pub async fn delete<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store.delete_actor(id).await.map_err(ApiError::at(Entity::Actor))?;
  Ok(StatusCode::NO_CONTENT)
}

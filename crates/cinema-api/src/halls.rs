//! Handlers for `/cinema_halls` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/cinema_halls` | Each hall carries its derived `capacity` |
//! | `POST`   | `/cinema_halls` | Body: `{"name","rows","seats_in_row"}` |
//! | `GET`    | `/cinema_halls/{id}` | |
//! | `PUT`    | `/cinema_halls/{id}` | 409 if sold seats would fall outside the new grid |
//! | `DELETE` | `/cinema_halls/{id}` | Removes the hall's sessions and tickets |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinema_core::{Entity, hall::NewHall, store::CinemaStore};
use uuid::Uuid;

use crate::{body::ApiJson, error::ApiError, views::HallBody};

/// `GET /cinema_halls`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<HallBody>>, ApiError> {
  let halls = store.list_halls().await.map_err(ApiError::store)?;
  Ok(Json(halls.into_iter().map(Into::into).collect()))
}

/// `POST /cinema_halls`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewHall>,
) -> Result<impl IntoResponse, ApiError> {
  let hall = store.add_hall(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(HallBody::from(hall))))
}

/// `GET /cinema_halls/{id}`
pub async fn get_one<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<HallBody>, ApiError> {
  let hall = store
    .get_hall(id)
    .await
    .map_err(ApiError::at(Entity::CinemaHall))?
    .ok_or_else(|| ApiError::missing(Entity::CinemaHall, id))?;
  Ok(Json(hall.into()))
}

/// `PUT /cinema_halls/{id}`
pub async fn update<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<NewHall>,
) -> Result<Json<HallBody>, ApiError> {
  let hall = store
    .update_hall(id, body)
    .await
    .map_err(ApiError::at(Entity::CinemaHall))?;
  Ok(Json(hall.into()))
}

/// `DELETE /cinema_halls/{id}`
pub async fn delete<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_hall(id)
    .await
    .map_err(ApiError::at(Entity::CinemaHall))?;
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/orders` endpoints. Both are scoped to the [`Caller`].
//!
//! `POST /orders` takes `{"tickets":[{"movie_session","row","seat"}, …]}` and
//! commits every ticket or none. The first failing ticket decides the error.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use cinema_core::{ledger::SeatRequest, store::CinemaStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  body::ApiJson,
  caller::Caller,
  error::ApiError,
  views::{OrderBody, OrderListItem},
};

#[derive(Debug, Deserialize)]
pub struct TicketInput {
  pub movie_session: Uuid,
  pub row:           i64,
  pub seat:          i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderInput {
  pub tickets: Vec<TicketInput>,
}

/// `GET /orders`
pub async fn list<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Caller(caller): Caller,
) -> Result<Json<Vec<OrderListItem>>, ApiError> {
  let orders = store.list_orders(caller).await.map_err(ApiError::store)?;
  Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `POST /orders`
pub async fn create<S: CinemaStore>(
  State(store): State<Arc<S>>,
  Caller(caller): Caller,
  ApiJson(body): ApiJson<OrderInput>,
) -> Result<impl IntoResponse, ApiError> {
  let requests = body
    .tickets
    .into_iter()
    .map(|t| SeatRequest::new(t.movie_session, t.row, t.seat))
    .collect();
  let order = store
    .create_order(caller, requests)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(OrderBody::from(order))))
}

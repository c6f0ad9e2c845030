//! HTTP host for the cinema booking backend.
//!
//! Mounts the JSON API from [`cinema_api`] under `/api/cinema`, resolves the
//! caller from HTTP Basic credentials, and traces every request.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use cinema_core::store::CinemaStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{Account, resolve_caller};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<Account>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState<S: CinemaStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CinemaStore + 'static,
{
  Router::new()
    .nest("/api/cinema", cinema_api::api_router(state.store))
    .layer(middleware::from_fn_with_state(state.config, resolve_caller))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

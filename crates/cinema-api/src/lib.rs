//! JSON REST API for the cinema booking backend.
//!
//! Exposes an axum [`Router`] backed by any [`cinema_core::store::CinemaStore`].
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility: the host resolves the [`Caller`] and inserts it into the
//! request extensions before the order endpoints see the request.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/cinema", cinema_api::api_router(store.clone()))
//! ```

pub mod actors;
pub mod body;
pub mod caller;
pub mod error;
pub mod genres;
pub mod halls;
pub mod movies;
pub mod orders;
pub mod sessions;
pub mod views;

use std::sync::Arc;

use axum::{Router, routing::get};
use cinema_core::store::CinemaStore;

pub use body::ApiJson;
pub use caller::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CinemaStore + 'static,
{
  Router::new()
    // Catalogue
    .route("/genres", get(genres::list::<S>).post(genres::create::<S>))
    .route(
      "/genres/{id}",
      get(genres::get_one::<S>)
        .put(genres::update::<S>)
        .delete(genres::delete::<S>),
    )
    .route("/actors", get(actors::list::<S>).post(actors::create::<S>))
    .route(
      "/actors/{id}",
      get(actors::get_one::<S>)
        .put(actors::update::<S>)
        .delete(actors::delete::<S>),
    )
    .route("/cinema_halls", get(halls::list::<S>).post(halls::create::<S>))
    .route(
      "/cinema_halls/{id}",
      get(halls::get_one::<S>)
        .put(halls::update::<S>)
        .delete(halls::delete::<S>),
    )
    .route("/movies", get(movies::list::<S>).post(movies::create::<S>))
    .route(
      "/movies/{id}",
      get(movies::get_one::<S>)
        .put(movies::update::<S>)
        .delete(movies::delete::<S>),
    )
    // Sessions
    .route("/movie_sessions", get(sessions::list::<S>).post(sessions::create::<S>))
    .route(
      "/movie_sessions/{id}",
      get(sessions::get_one::<S>)
        .put(sessions::update::<S>)
        .delete(sessions::delete::<S>),
    )
    .route("/movie_sessions/{id}/availability", get(sessions::availability::<S>))
    // Orders
    .route("/orders", get(orders::list::<S>).post(orders::create::<S>))
    .with_state(store)
}

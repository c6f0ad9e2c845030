//! The `CinemaStore` trait.
//!
//! Implemented by storage backends (e.g. `cinema-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! The seat ledger and order methods carry the booking invariants:
//!
//! - a ticket's row and seat lie inside the grid of its session's hall;
//! - no two tickets share `(session, row, seat)`; backends must enforce this
//!   with a storage-level uniqueness constraint, and report a violation as
//!   [`Error::SeatTaken`](crate::Error::SeatTaken);
//! - an order is committed with all of its tickets or not at all.

use std::future::Future;

use uuid::Uuid;

use crate::{
  AsCoreError,
  catalogue::{Actor, Genre, Movie, MovieDetail, MovieQuery, NewActor, NewMovie},
  hall::{Hall, NewHall},
  ledger::{Availability, Seat, SeatRequest, Ticket},
  order::{Order, OrderView},
  session::{MovieSession, NewSession, SessionDetail, SessionQuery, SessionSummary},
};

/// Abstraction over a cinema store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CinemaStore: Send + Sync {
  type Error: std::error::Error + AsCoreError + Send + Sync + 'static;

  // ── Genres ────────────────────────────────────────────────────────────

  /// Returns [`Error::DuplicateGenre`](crate::Error::DuplicateGenre) if the
  /// name is taken.
  fn add_genre(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Genre, Self::Error>> + Send + '_;

  fn get_genre(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Genre>, Self::Error>> + Send + '_;

  fn list_genres(
    &self,
  ) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;

  fn update_genre(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Genre, Self::Error>> + Send + '_;

  fn delete_genre(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Actors ────────────────────────────────────────────────────────────

  fn add_actor(
    &self,
    input: NewActor,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  fn get_actor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  fn list_actors(
    &self,
  ) -> impl Future<Output = Result<Vec<Actor>, Self::Error>> + Send + '_;

  fn update_actor(
    &self,
    id: Uuid,
    input: NewActor,
  ) -> impl Future<Output = Result<Actor, Self::Error>> + Send + '_;

  fn delete_actor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Halls ─────────────────────────────────────────────────────────────

  fn add_hall(
    &self,
    input: NewHall,
  ) -> impl Future<Output = Result<Hall, Self::Error>> + Send + '_;

  fn get_hall(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Hall>, Self::Error>> + Send + '_;

  fn list_halls(
    &self,
  ) -> impl Future<Output = Result<Vec<Hall>, Self::Error>> + Send + '_;

  /// Replace a hall's name and geometry.
  ///
  /// Fails with [`Error::GeometryConflict`](crate::Error::GeometryConflict)
  /// if any ticket sold for a session in this hall would fall outside the
  /// new grid.
  fn update_hall(
    &self,
    id: Uuid,
    input: NewHall,
  ) -> impl Future<Output = Result<Hall, Self::Error>> + Send + '_;

  /// Deleting a hall deletes its sessions and their tickets.
  fn delete_hall(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Unknown genre or actor ids fail with
  /// [`Error::NotFound`](crate::Error::NotFound).
  fn add_movie(
    &self,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  fn get_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<MovieDetail>, Self::Error>> + Send + '_;

  /// Movies matching `query`, ordered by title.
  fn list_movies<'a>(
    &'a self,
    query: &'a MovieQuery,
  ) -> impl Future<Output = Result<Vec<MovieDetail>, Self::Error>> + Send + 'a;

  fn update_movie(
    &self,
    id: Uuid,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Deleting a movie deletes its sessions and their tickets.
  fn delete_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn add_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<MovieSession, Self::Error>> + Send + '_;

  fn get_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SessionDetail>, Self::Error>> + Send + '_;

  /// Sessions matching `query`, most recent `show_time` first.
  fn list_sessions<'a>(
    &'a self,
    query: &'a SessionQuery,
  ) -> impl Future<Output = Result<Vec<SessionSummary>, Self::Error>> + Send + 'a;

  /// Moving a session to another hall is subject to the same
  /// [`Error::GeometryConflict`](crate::Error::GeometryConflict) check as
  /// [`CinemaStore::update_hall`].
  fn update_session(
    &self,
    id: Uuid,
    input: NewSession,
  ) -> impl Future<Output = Result<MovieSession, Self::Error>> + Send + '_;

  /// Deleting a session deletes its tickets.
  fn delete_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Seat ledger ───────────────────────────────────────────────────────

  /// Check a seat request without writing anything: the session must exist,
  /// the seat must be inside the hall grid (row before seat), and the seat
  /// must not be taken yet.
  fn validate_claim(
    &self,
    request: SeatRequest,
  ) -> impl Future<Output = Result<Seat, Self::Error>> + Send + '_;

  /// Validate and durably record a ticket for `request` in an existing order.
  ///
  /// A uniqueness violation at insert time is reported as
  /// [`Error::SeatTaken`](crate::Error::SeatTaken), even when the validation
  /// step passed.
  fn commit_claim(
    &self,
    order_id: Uuid,
    request: SeatRequest,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  /// Seats claimed for a session, ordered by `(row, seat)`.
  fn taken_seats(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Seat>, Self::Error>> + Send + '_;

  /// `capacity - tickets sold` for a session.
  fn count_available(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  /// Capacity, taken seats and available count from one read snapshot.
  fn availability(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<Availability, Self::Error>> + Send + '_;

  // ── Orders ────────────────────────────────────────────────────────────

  /// Commit `requests` as one order attributed to `caller`.
  ///
  /// Requests are applied in sequence inside one transaction. The first
  /// failing request aborts the whole order and its error is returned; no
  /// order or ticket from the batch is persisted. An empty batch fails with
  /// [`Error::EmptyOrder`](crate::Error::EmptyOrder).
  fn create_order(
    &self,
    caller: String,
    requests: Vec<SeatRequest>,
  ) -> impl Future<Output = Result<Order, Self::Error>> + Send + '_;

  /// Orders placed by `caller`, newest first.
  fn list_orders(
    &self,
    caller: String,
  ) -> impl Future<Output = Result<Vec<OrderView>, Self::Error>> + Send + '_;
}

//! [`SqliteStore`]: the SQLite implementation of [`CinemaStore`].

use std::{path::Path, time::Duration};

use cinema_core::{
  catalogue::{Actor, Genre, Movie, MovieDetail, MovieQuery, NewActor, NewMovie},
  hall::{Hall, NewHall},
  ledger::{Availability, Seat, SeatRequest, Ticket},
  order::{Order, OrderView},
  session::{MovieSession, NewSession, SessionDetail, SessionQuery, SessionSummary},
  store::CinemaStore,
};
use uuid::Uuid;

use crate::{Error, Result, catalogue, ledger, schema::SCHEMA, sessions};

/// How long a writer waits for another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A cinema store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls on
/// one store are serialized on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, carrying domain errors back out.
  async fn run<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  #[cfg(test)]
  pub(crate) async fn raw<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.run(f).await
  }
}

// ─── CinemaStore impl ────────────────────────────────────────────────────────

impl CinemaStore for SqliteStore {
  type Error = Error;

  // ── Genres ────────────────────────────────────────────────────────────────

  async fn add_genre(&self, name: String) -> Result<Genre> {
    self.run(move |conn| catalogue::insert_genre(conn, name)).await
  }

  async fn get_genre(&self, id: Uuid) -> Result<Option<Genre>> {
    self.run(move |conn| catalogue::select_genre(conn, id)).await
  }

  async fn list_genres(&self) -> Result<Vec<Genre>> {
    self.run(|conn| catalogue::list_genres(conn)).await
  }

  async fn update_genre(&self, id: Uuid, name: String) -> Result<Genre> {
    self.run(move |conn| catalogue::update_genre(conn, id, name)).await
  }

  async fn delete_genre(&self, id: Uuid) -> Result<()> {
    self.run(move |conn| catalogue::delete_genre(conn, id)).await
  }

  // ── Actors ────────────────────────────────────────────────────────────────

  async fn add_actor(&self, input: NewActor) -> Result<Actor> {
    self.run(move |conn| catalogue::insert_actor(conn, input)).await
  }

  async fn get_actor(&self, id: Uuid) -> Result<Option<Actor>> {
    self.run(move |conn| catalogue::select_actor(conn, id)).await
  }

  async fn list_actors(&self) -> Result<Vec<Actor>> {
    self.run(|conn| catalogue::list_actors(conn)).await
  }

  async fn update_actor(&self, id: Uuid, input: NewActor) -> Result<Actor> {
    self.run(move |conn| catalogue::update_actor(conn, id, input)).await
  }

  async fn delete_actor(&self, id: Uuid) -> Result<()> {
    self.run(move |conn| catalogue::delete_actor(conn, id)).await
  }

  // ── Halls ─────────────────────────────────────────────────────────────────

  async fn add_hall(&self, input: NewHall) -> Result<Hall> {
    self.run(move |conn| catalogue::insert_hall(conn, input)).await
  }

  async fn get_hall(&self, id: Uuid) -> Result<Option<Hall>> {
    self.run(move |conn| catalogue::select_hall(conn, id)).await
  }

  async fn list_halls(&self) -> Result<Vec<Hall>> {
    self.run(|conn| catalogue::list_halls(conn)).await
  }

  async fn update_hall(&self, id: Uuid, input: NewHall) -> Result<Hall> {
    let result = self.run(move |conn| catalogue::update_hall(conn, id, input)).await;
    if let Err(Error::Core(e @ cinema_core::Error::GeometryConflict { .. })) = &result {
      tracing::info!(hall_id = %id, error = %e, "hall edit rejected");
    }
    result
  }

  async fn delete_hall(&self, id: Uuid) -> Result<()> {
    self.run(move |conn| catalogue::delete_hall(conn, id)).await
  }

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn add_movie(&self, input: NewMovie) -> Result<Movie> {
    self.run(move |conn| catalogue::insert_movie(conn, input)).await
  }

  async fn get_movie(&self, id: Uuid) -> Result<Option<MovieDetail>> {
    self.run(move |conn| catalogue::select_movie(conn, id)).await
  }

  async fn list_movies(&self, query: &MovieQuery) -> Result<Vec<MovieDetail>> {
    let query = query.clone();
    self.run(move |conn| catalogue::list_movies(conn, &query)).await
  }

  async fn update_movie(&self, id: Uuid, input: NewMovie) -> Result<Movie> {
    self.run(move |conn| catalogue::update_movie(conn, id, input)).await
  }

  async fn delete_movie(&self, id: Uuid) -> Result<()> {
    self.run(move |conn| catalogue::delete_movie(conn, id)).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn add_session(&self, input: NewSession) -> Result<MovieSession> {
    self.run(move |conn| sessions::insert_session(conn, input)).await
  }

  async fn get_session(&self, id: Uuid) -> Result<Option<SessionDetail>> {
    self.run(move |conn| sessions::session_detail(conn, id)).await
  }

  async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<SessionSummary>> {
    let query = query.clone();
    self.run(move |conn| sessions::list_sessions(conn, &query)).await
  }

  async fn update_session(&self, id: Uuid, input: NewSession) -> Result<MovieSession> {
    self.run(move |conn| sessions::update_session(conn, id, input)).await
  }

  async fn delete_session(&self, id: Uuid) -> Result<()> {
    self.run(move |conn| sessions::delete_session(conn, id)).await
  }

  // ── Seat ledger ───────────────────────────────────────────────────────────

  async fn validate_claim(&self, request: SeatRequest) -> Result<Seat> {
    self.run(move |conn| ledger::validate_claim(conn, request)).await
  }

  async fn commit_claim(&self, order_id: Uuid, request: SeatRequest) -> Result<Ticket> {
    let ticket = self
      .run(move |conn| ledger::commit_claim(conn, order_id, request))
      .await?;
    tracing::debug!(
      %order_id,
      session_id = %ticket.session_id,
      row = ticket.row,
      seat = ticket.seat,
      "ticket committed"
    );
    Ok(ticket)
  }

  async fn taken_seats(&self, session_id: Uuid) -> Result<Vec<Seat>> {
    self.run(move |conn| ledger::taken_seats(conn, session_id)).await
  }

  async fn count_available(&self, session_id: Uuid) -> Result<u32> {
    self.run(move |conn| ledger::count_available(conn, session_id)).await
  }

  async fn availability(&self, session_id: Uuid) -> Result<Availability> {
    self.run(move |conn| ledger::availability(conn, session_id)).await
  }

  // ── Orders ────────────────────────────────────────────────────────────────

  async fn create_order(&self, caller: String, requests: Vec<SeatRequest>) -> Result<Order> {
    let claimed = requests.len();
    match self
      .run(move |conn| ledger::create_order(conn, caller, requests))
      .await
    {
      Ok(order) => {
        tracing::info!(
          order_id = %order.order_id,
          tickets = order.tickets.len(),
          "order committed"
        );
        Ok(order)
      }
      Err(e) => {
        tracing::info!(requests = claimed, error = %e, "order rejected");
        Err(e)
      }
    }
  }

  async fn list_orders(&self, caller: String) -> Result<Vec<OrderView>> {
    self.run(move |conn| ledger::list_orders(conn, &caller)).await
  }
}

//! Error types for `cinema-core`.

use strum::Display;
use thiserror::Error;
use uuid::Uuid;

use crate::hall::RangeError;

/// The kind of record a reference points at; used to attribute
/// [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
  Genre,
  Actor,
  CinemaHall,
  Movie,
  MovieSession,
  Order,
}

#[derive(Debug, Error)]
pub enum Error {
  /// A row or seat lies outside the hall grid of the targeted session.
  #[error(transparent)]
  Range(#[from] RangeError),

  /// The seat is already claimed for that session.
  #[error("seat (row {row}, seat {seat}) is already taken for session {session_id}")]
  SeatTaken {
    session_id: Uuid,
    row:        u32,
    seat:       u32,
  },

  #[error("{kind} not found: {id}")]
  NotFound { kind: Entity, id: Uuid },

  #[error("an order must contain at least one ticket")]
  EmptyOrder,

  #[error("{field} must be at least 1, got {value}")]
  InvalidValue { field: &'static str, value: u32 },

  #[error("a {rows}x{seats_in_row} grid exceeds the largest hall capacity of {max}", max = u32::MAX)]
  GridTooLarge { rows: u32, seats_in_row: u32 },

  /// A hall edit (or a session moved to another hall) would leave sold
  /// tickets outside the grid.
  #[error(
    "cinema hall {hall_id} cannot be {rows}x{seats_in_row}: \
     {stranded} ticket(s) would fall outside the grid"
  )]
  GeometryConflict {
    hall_id:      Uuid,
    rows:         u32,
    seats_in_row: u32,
    stranded:     u64,
  },

  #[error("genre {0:?} already exists")]
  DuplicateGenre(String),
}

impl Error {
  pub fn not_found(kind: Entity, id: Uuid) -> Self { Self::NotFound { kind, id } }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Gives the HTTP layer access to the domain error inside a backend error.
///
/// Backends wrap [`Error`] in their own error type; everything that is not a
/// domain error (I/O, encoding) returns `None` and is reported as a server
/// failure.
pub trait AsCoreError {
  fn as_core(&self) -> Option<&Error>;
}

impl AsCoreError for Error {
  fn as_core(&self) -> Option<&Error> { Some(self) }
}

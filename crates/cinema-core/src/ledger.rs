//! Seat ledger types: seat coordinates, claim requests, tickets and the
//! availability view of a session.
//!
//! A ticket is the durable record that one `(row, seat)` is taken for one
//! session. Tickets are never updated; they disappear only when their session
//! or order is deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Seats ───────────────────────────────────────────────────────────────────

/// A bounds-checked seat coordinate. Obtained from
/// [`crate::hall::Hall::check_seat`] or read back from storage.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Seat {
  pub row:  u32,
  pub seat: u32,
}

/// An unvalidated request to claim a seat for a session.
///
/// Coordinates are signed and wide so that any integer a client sends reaches
/// the bounds check and is reported as a range error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRequest {
  pub session_id: Uuid,
  pub row:        i64,
  pub seat:       i64,
}

impl SeatRequest {
  pub fn new(session_id: Uuid, row: i64, seat: i64) -> Self {
    Self { session_id, row, seat }
  }
}

// ─── Tickets ─────────────────────────────────────────────────────────────────

/// A committed seat claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
  pub ticket_id:  Uuid,
  pub session_id: Uuid,
  pub order_id:   Uuid,
  pub row:        u32,
  pub seat:       u32,
}

impl Ticket {
  pub fn seat(&self) -> Seat { Seat { row: self.row, seat: self.seat } }
}

// ─── Availability ────────────────────────────────────────────────────────────

/// Seat availability for one session, read from a single snapshot.
///
/// `available + taken.len() == capacity` always holds for a value built by
/// [`Availability::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
  pub session_id: Uuid,
  pub capacity:   u32,
  pub available:  u32,
  /// Claimed seats ordered by `(row, seat)`.
  pub taken:      Vec<Seat>,
}

impl Availability {
  pub fn new(session_id: Uuid, capacity: u32, mut taken: Vec<Seat>) -> Self {
    taken.sort_unstable();
    let claimed = u32::try_from(taken.len()).unwrap_or(u32::MAX);
    Self {
      session_id,
      capacity,
      available: capacity.saturating_sub(claimed),
      taken,
    }
  }
}

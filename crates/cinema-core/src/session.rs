//! Movie sessions: one screening of a movie in a hall at a given time.
//!
//! A session scopes all seat bookkeeping. Two sessions in the same hall have
//! independent seat ledgers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalogue::MovieDetail, hall::Hall, ledger::Seat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSession {
  pub session_id: Uuid,
  pub movie_id:   Uuid,
  pub hall_id:    Uuid,
  pub show_time:  DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
  pub movie_id:  Uuid,
  pub hall_id:   Uuid,
  pub show_time: DateTime<Utc>,
}

/// Parameters for [`crate::store::CinemaStore::list_sessions`].
#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
  pub movie_id: Option<Uuid>,
  /// Match on the calendar date of `show_time` (UTC), ignoring time of day.
  pub date:     Option<NaiveDate>,
}

/// Listing row for a session, with its current availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
  pub session_id:        Uuid,
  pub show_time:         DateTime<Utc>,
  pub movie_title:       String,
  pub hall_name:         String,
  pub hall_capacity:     u32,
  pub tickets_available: u32,
}

/// Full view of one session, including the seats already sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
  pub session_id:   Uuid,
  pub show_time:    DateTime<Utc>,
  pub movie:        MovieDetail,
  pub hall:         Hall,
  /// Ordered by `(row, seat)`.
  pub taken_places: Vec<Seat>,
}

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order is chronological. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use cinema_core::{
  Entity,
  catalogue::{Actor, Genre},
  hall::Hall,
  session::MovieSession,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// The `YYYY-MM-DD` prefix of an encoded timestamp.
pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

// ─── Constraint helpers ──────────────────────────────────────────────────────

/// Whether `e` is a `UNIQUE` constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Map an `UPDATE`/`DELETE` row count of zero to `NotFound`.
pub fn expect_affected(affected: usize, kind: Entity, id: Uuid) -> Result<()> {
  if affected == 0 {
    return Err(cinema_core::Error::not_found(kind, id).into());
  }
  Ok(())
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `genres` row.
pub struct RawGenre {
  pub genre_id: String,
  pub name:     String,
}

impl RawGenre {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { genre_id: row.get(0)?, name: row.get(1)? })
  }

  pub fn into_genre(self) -> Result<Genre> {
    Ok(Genre { genre_id: decode_uuid(&self.genre_id)?, name: self.name })
  }
}

/// Raw values read directly from an `actors` row.
pub struct RawActor {
  pub actor_id:   String,
  pub first_name: String,
  pub last_name:  String,
}

impl RawActor {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      actor_id:   row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
    })
  }

  pub fn into_actor(self) -> Result<Actor> {
    Ok(Actor {
      actor_id:   decode_uuid(&self.actor_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
    })
  }
}

/// Raw values read directly from a `cinema_halls` row.
pub struct RawHall {
  pub hall_id:      String,
  pub name:         String,
  pub rows:         u32,
  pub seats_in_row: u32,
}

impl RawHall {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      hall_id:      row.get(0)?,
      name:         row.get(1)?,
      rows:         row.get(2)?,
      seats_in_row: row.get(3)?,
    })
  }

  pub fn into_hall(self) -> Result<Hall> {
    Ok(Hall {
      hall_id:      decode_uuid(&self.hall_id)?,
      name:         self.name,
      rows:         self.rows,
      seats_in_row: self.seats_in_row,
    })
  }
}

/// Raw values read directly from a `movie_sessions` row.
pub struct RawSession {
  pub session_id: String,
  pub movie_id:   String,
  pub hall_id:    String,
  pub show_time:  String,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id: row.get(0)?,
      movie_id:   row.get(1)?,
      hall_id:    row.get(2)?,
      show_time:  row.get(3)?,
    })
  }

  pub fn into_session(self) -> Result<MovieSession> {
    Ok(MovieSession {
      session_id: decode_uuid(&self.session_id)?,
      movie_id:   decode_uuid(&self.movie_id)?,
      hall_id:    decode_uuid(&self.hall_id)?,
      show_time:  decode_dt(&self.show_time)?,
    })
  }
}

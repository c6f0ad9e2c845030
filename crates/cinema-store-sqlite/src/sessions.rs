//! Session registry: movie sessions and their listing views.

use cinema_core::{
  Entity, Error as CoreError,
  hall::Hall,
  ledger::Seat,
  session::{MovieSession, NewSession, SessionDetail, SessionQuery, SessionSummary},
};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Result,
  catalogue::{select_hall, select_movie},
  encode::{
    RawSession, decode_dt, decode_uuid, encode_date, encode_dt, encode_uuid,
    expect_affected,
  },
  ledger::select_taken,
};

/// Columns selected for a [`SessionSummary`], given `s`, `m` and `h` aliases
/// for `movie_sessions`, `movies` and `cinema_halls`.
pub const SUMMARY_COLUMNS: &str = "
  s.session_id, s.show_time, m.title, h.name, h.row_count, h.seats_in_row,
  (SELECT COUNT(*) FROM tickets x WHERE x.session_id = s.session_id)";

/// Raw values of [`SUMMARY_COLUMNS`].
pub struct RawSummary {
  session_id:   String,
  show_time:    String,
  movie_title:  String,
  hall_name:    String,
  rows:         u32,
  seats_in_row: u32,
  sold:         i64,
}

impl RawSummary {
  /// Read the summary columns starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id:   row.get(at)?,
      show_time:    row.get(at + 1)?,
      movie_title:  row.get(at + 2)?,
      hall_name:    row.get(at + 3)?,
      rows:         row.get(at + 4)?,
      seats_in_row: row.get(at + 5)?,
      sold:         row.get(at + 6)?,
    })
  }

  pub fn into_summary(self) -> Result<SessionSummary> {
    let capacity = self.rows.saturating_mul(self.seats_in_row);
    let sold = u32::try_from(self.sold).unwrap_or(u32::MAX);
    Ok(SessionSummary {
      session_id:        decode_uuid(&self.session_id)?,
      show_time:         decode_dt(&self.show_time)?,
      movie_title:       self.movie_title,
      hall_name:         self.hall_name,
      hall_capacity:     capacity,
      tickets_available: capacity.saturating_sub(sold),
    })
  }
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

pub fn select_session(conn: &Connection, id: Uuid) -> Result<Option<MovieSession>> {
  conn
    .query_row(
      "SELECT session_id, movie_id, hall_id, show_time
       FROM movie_sessions WHERE session_id = ?1",
      params![encode_uuid(id)],
      RawSession::from_row,
    )
    .optional()?
    .map(RawSession::into_session)
    .transpose()
}

/// The hall grid hosting a session.
pub fn session_hall(conn: &Connection, session_id: Uuid) -> Result<Hall> {
  let session = select_session(conn, session_id)?
    .ok_or_else(|| CoreError::not_found(Entity::MovieSession, session_id))?;
  select_hall(conn, session.hall_id)?
    .ok_or_else(|| CoreError::not_found(Entity::CinemaHall, session.hall_id).into())
}

fn check_session_refs(conn: &Connection, input: &NewSession) -> Result<Hall> {
  let exists: bool = conn
    .query_row(
      "SELECT 1 FROM movies WHERE movie_id = ?1",
      params![encode_uuid(input.movie_id)],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  if !exists {
    return Err(CoreError::not_found(Entity::Movie, input.movie_id).into());
  }
  select_hall(conn, input.hall_id)?
    .ok_or_else(|| CoreError::not_found(Entity::CinemaHall, input.hall_id).into())
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub fn insert_session(conn: &Connection, input: NewSession) -> Result<MovieSession> {
  check_session_refs(conn, &input)?;
  let session = MovieSession {
    session_id: Uuid::new_v4(),
    movie_id:   input.movie_id,
    hall_id:    input.hall_id,
    show_time:  input.show_time,
  };
  conn.execute(
    "INSERT INTO movie_sessions (session_id, movie_id, hall_id, show_time)
     VALUES (?1, ?2, ?3, ?4)",
    params![
      encode_uuid(session.session_id),
      encode_uuid(session.movie_id),
      encode_uuid(session.hall_id),
      encode_dt(session.show_time),
    ],
  )?;
  Ok(session)
}

pub fn update_session(
  conn: &mut Connection,
  id: Uuid,
  input: NewSession,
) -> Result<MovieSession> {
  let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

  let current = select_session(&tx, id)?
    .ok_or_else(|| CoreError::not_found(Entity::MovieSession, id))?;
  let hall = check_session_refs(&tx, &input)?;

  if current.hall_id != hall.hall_id {
    let stranded = select_taken(&tx, id)?
      .into_iter()
      .filter(|&seat| !hall.contains(seat))
      .count();
    if stranded > 0 {
      return Err(
        CoreError::GeometryConflict {
          hall_id:      hall.hall_id,
          rows:         hall.rows,
          seats_in_row: hall.seats_in_row,
          stranded:     stranded as u64,
        }
        .into(),
      );
    }
  }

  tx.execute(
    "UPDATE movie_sessions SET movie_id = ?2, hall_id = ?3, show_time = ?4
     WHERE session_id = ?1",
    params![
      encode_uuid(id),
      encode_uuid(input.movie_id),
      encode_uuid(input.hall_id),
      encode_dt(input.show_time),
    ],
  )?;
  tx.commit()?;

  Ok(MovieSession {
    session_id: id,
    movie_id:   input.movie_id,
    hall_id:    input.hall_id,
    show_time:  input.show_time,
  })
}

pub fn delete_session(conn: &Connection, id: Uuid) -> Result<()> {
  let n = conn.execute(
    "DELETE FROM movie_sessions WHERE session_id = ?1",
    params![encode_uuid(id)],
  )?;
  expect_affected(n, Entity::MovieSession, id)
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// Full session view, read inside one transaction so `taken_places` matches
/// the hall returned alongside it.
pub fn session_detail(conn: &mut Connection, id: Uuid) -> Result<Option<SessionDetail>> {
  let tx = conn.transaction()?;

  let Some(session) = select_session(&tx, id)? else {
    return Ok(None);
  };
  let movie = select_movie(&tx, session.movie_id)?
    .ok_or_else(|| CoreError::not_found(Entity::Movie, session.movie_id))?;
  let hall = select_hall(&tx, session.hall_id)?
    .ok_or_else(|| CoreError::not_found(Entity::CinemaHall, session.hall_id))?;
  let taken_places: Vec<Seat> = select_taken(&tx, id)?;

  tx.commit()?;
  Ok(Some(SessionDetail {
    session_id: id,
    show_time: session.show_time,
    movie,
    hall,
    taken_places,
  }))
}

pub fn list_sessions(conn: &Connection, query: &SessionQuery) -> Result<Vec<SessionSummary>> {
  let movie_id = query.movie_id.map(encode_uuid);
  let date = query.date.map(encode_date);

  let sql = format!(
    "SELECT {SUMMARY_COLUMNS}
     FROM movie_sessions s
     JOIN movies m       ON m.movie_id = s.movie_id
     JOIN cinema_halls h ON h.hall_id  = s.hall_id
     WHERE (?1 IS NULL OR s.movie_id = ?1)
       AND (?2 IS NULL OR substr(s.show_time, 1, 10) = ?2)
     ORDER BY s.show_time DESC"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![movie_id, date], |row| RawSummary::from_row(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSummary::into_summary).collect()
}

//! Genres, actors, halls and movies.
//!
//! Plain synchronous functions over a borrowed connection; [`crate::SqliteStore`]
//! runs them on the database thread.

use cinema_core::{
  Entity, Error as CoreError,
  catalogue::{Actor, Genre, Movie, MovieDetail, MovieQuery, NewActor, NewMovie},
  hall::{Hall, NewHall},
};
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    RawActor, RawGenre, RawHall, decode_uuid, encode_uuid, expect_affected,
    is_unique_violation,
  },
};

// ─── Genres ──────────────────────────────────────────────────────────────────

pub fn insert_genre(conn: &Connection, name: String) -> Result<Genre> {
  let genre = Genre { genre_id: Uuid::new_v4(), name };
  let inserted = conn.execute(
    "INSERT INTO genres (genre_id, name) VALUES (?1, ?2)",
    params![encode_uuid(genre.genre_id), genre.name],
  );
  match inserted {
    Ok(_) => Ok(genre),
    Err(e) if is_unique_violation(&e) => {
      Err(CoreError::DuplicateGenre(genre.name).into())
    }
    Err(e) => Err(e.into()),
  }
}

pub fn select_genre(conn: &Connection, id: Uuid) -> Result<Option<Genre>> {
  conn
    .query_row(
      "SELECT genre_id, name FROM genres WHERE genre_id = ?1",
      params![encode_uuid(id)],
      RawGenre::from_row,
    )
    .optional()?
    .map(RawGenre::into_genre)
    .transpose()
}

pub fn list_genres(conn: &Connection) -> Result<Vec<Genre>> {
  let mut stmt = conn.prepare("SELECT genre_id, name FROM genres ORDER BY rowid")?;
  let raws = stmt
    .query_map([], RawGenre::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawGenre::into_genre).collect()
}

pub fn update_genre(conn: &Connection, id: Uuid, name: String) -> Result<Genre> {
  let updated = conn.execute(
    "UPDATE genres SET name = ?2 WHERE genre_id = ?1",
    params![encode_uuid(id), name],
  );
  match updated {
    Ok(n) => {
      expect_affected(n, Entity::Genre, id)?;
      Ok(Genre { genre_id: id, name })
    }
    Err(e) if is_unique_violation(&e) => Err(CoreError::DuplicateGenre(name).into()),
    Err(e) => Err(e.into()),
  }
}

pub fn delete_genre(conn: &Connection, id: Uuid) -> Result<()> {
  let n = conn.execute("DELETE FROM genres WHERE genre_id = ?1", params![encode_uuid(id)])?;
  expect_affected(n, Entity::Genre, id)
}

// ─── Actors ──────────────────────────────────────────────────────────────────

pub fn insert_actor(conn: &Connection, input: NewActor) -> Result<Actor> {
  let actor = Actor {
    actor_id:   Uuid::new_v4(),
    first_name: input.first_name,
    last_name:  input.last_name,
  };
  conn.execute(
    "INSERT INTO actors (actor_id, first_name, last_name) VALUES (?1, ?2, ?3)",
    params![encode_uuid(actor.actor_id), actor.first_name, actor.last_name],
  )?;
  Ok(actor)
}

pub fn select_actor(conn: &Connection, id: Uuid) -> Result<Option<Actor>> {
  conn
    .query_row(
      "SELECT actor_id, first_name, last_name FROM actors WHERE actor_id = ?1",
      params![encode_uuid(id)],
      RawActor::from_row,
    )
    .optional()?
    .map(RawActor::into_actor)
    .transpose()
}

pub fn list_actors(conn: &Connection) -> Result<Vec<Actor>> {
  let mut stmt =
    conn.prepare("SELECT actor_id, first_name, last_name FROM actors ORDER BY rowid")?;
  let raws = stmt
    .query_map([], RawActor::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawActor::into_actor).collect()
}

pub fn update_actor(conn: &Connection, id: Uuid, input: NewActor) -> Result<Actor> {
  let n = conn.execute(
    "UPDATE actors SET first_name = ?2, last_name = ?3 WHERE actor_id = ?1",
    params![encode_uuid(id), input.first_name, input.last_name],
  )?;
  expect_affected(n, Entity::Actor, id)?;
  Ok(Actor { actor_id: id, first_name: input.first_name, last_name: input.last_name })
}

pub fn delete_actor(conn: &Connection, id: Uuid) -> Result<()> {
  let n = conn.execute("DELETE FROM actors WHERE actor_id = ?1", params![encode_uuid(id)])?;
  expect_affected(n, Entity::Actor, id)
}

// ─── Halls ───────────────────────────────────────────────────────────────────

pub fn insert_hall(conn: &Connection, input: NewHall) -> Result<Hall> {
  input.validate()?;
  let hall = input.into_hall(Uuid::new_v4());
  conn.execute(
    "INSERT INTO cinema_halls (hall_id, name, row_count, seats_in_row)
     VALUES (?1, ?2, ?3, ?4)",
    params![encode_uuid(hall.hall_id), hall.name, hall.rows, hall.seats_in_row],
  )?;
  Ok(hall)
}

pub fn select_hall(conn: &Connection, id: Uuid) -> Result<Option<Hall>> {
  conn
    .query_row(
      "SELECT hall_id, name, row_count, seats_in_row FROM cinema_halls WHERE hall_id = ?1",
      params![encode_uuid(id)],
      RawHall::from_row,
    )
    .optional()?
    .map(RawHall::into_hall)
    .transpose()
}

pub fn list_halls(conn: &Connection) -> Result<Vec<Hall>> {
  let mut stmt = conn.prepare(
    "SELECT hall_id, name, row_count, seats_in_row FROM cinema_halls ORDER BY rowid",
  )?;
  let raws = stmt
    .query_map([], RawHall::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawHall::into_hall).collect()
}

/// Count tickets sold for sessions in `hall_id` that lie outside a
/// `rows × seats_in_row` grid.
fn stranded_in_hall(
  conn: &Connection,
  hall_id: Uuid,
  rows: u32,
  seats_in_row: u32,
) -> Result<u64> {
  let n: i64 = conn.query_row(
    "SELECT COUNT(*)
     FROM tickets t
     JOIN movie_sessions s ON s.session_id = t.session_id
     WHERE s.hall_id = ?1 AND (t.seat_row > ?2 OR t.seat_number > ?3)",
    params![encode_uuid(hall_id), rows, seats_in_row],
    |r| r.get(0),
  )?;
  Ok(n.unsigned_abs())
}

pub fn update_hall(conn: &mut Connection, id: Uuid, input: NewHall) -> Result<Hall> {
  input.validate()?;
  let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

  if select_hall(&tx, id)?.is_none() {
    return Err(CoreError::not_found(Entity::CinemaHall, id).into());
  }

  let stranded = stranded_in_hall(&tx, id, input.rows, input.seats_in_row)?;
  if stranded > 0 {
    return Err(
      CoreError::GeometryConflict {
        hall_id: id,
        rows: input.rows,
        seats_in_row: input.seats_in_row,
        stranded,
      }
      .into(),
    );
  }

  let hall = input.into_hall(id);
  tx.execute(
    "UPDATE cinema_halls SET name = ?2, row_count = ?3, seats_in_row = ?4
     WHERE hall_id = ?1",
    params![encode_uuid(id), hall.name, hall.rows, hall.seats_in_row],
  )?;
  tx.commit()?;
  Ok(hall)
}

pub fn delete_hall(conn: &Connection, id: Uuid) -> Result<()> {
  let n = conn.execute("DELETE FROM cinema_halls WHERE hall_id = ?1", params![encode_uuid(id)])?;
  expect_affected(n, Entity::CinemaHall, id)
}

// ─── Movies ──────────────────────────────────────────────────────────────────

/// Drop repeated ids, keeping first occurrences in order.
fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
  let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
  for id in ids {
    if !out.contains(&id) {
      out.push(id);
    }
  }
  out
}

/// Check that every referenced genre and actor exists.
fn check_movie_refs(conn: &Connection, genre_ids: &[Uuid], actor_ids: &[Uuid]) -> Result<()> {
  for &id in genre_ids {
    if select_genre(conn, id)?.is_none() {
      return Err(CoreError::not_found(Entity::Genre, id).into());
    }
  }
  for &id in actor_ids {
    if select_actor(conn, id)?.is_none() {
      return Err(CoreError::not_found(Entity::Actor, id).into());
    }
  }
  Ok(())
}

fn link_movie(conn: &Connection, movie: &Movie) -> Result<()> {
  let movie_id = encode_uuid(movie.movie_id);
  for &genre_id in &movie.genre_ids {
    conn.execute(
      "INSERT INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)",
      params![movie_id, encode_uuid(genre_id)],
    )?;
  }
  for &actor_id in &movie.actor_ids {
    conn.execute(
      "INSERT INTO movie_actors (movie_id, actor_id) VALUES (?1, ?2)",
      params![movie_id, encode_uuid(actor_id)],
    )?;
  }
  Ok(())
}

fn build_movie(movie_id: Uuid, input: NewMovie) -> Movie {
  Movie {
    movie_id,
    title: input.title,
    description: input.description,
    duration: input.duration,
    genre_ids: dedup(input.genre_ids),
    actor_ids: dedup(input.actor_ids),
  }
}

pub fn insert_movie(conn: &mut Connection, input: NewMovie) -> Result<Movie> {
  input.validate()?;
  let movie = build_movie(Uuid::new_v4(), input);

  let tx = conn.transaction()?;
  check_movie_refs(&tx, &movie.genre_ids, &movie.actor_ids)?;
  tx.execute(
    "INSERT INTO movies (movie_id, title, description, duration) VALUES (?1, ?2, ?3, ?4)",
    params![encode_uuid(movie.movie_id), movie.title, movie.description, movie.duration],
  )?;
  link_movie(&tx, &movie)?;
  tx.commit()?;
  Ok(movie)
}

pub fn update_movie(conn: &mut Connection, id: Uuid, input: NewMovie) -> Result<Movie> {
  input.validate()?;
  let movie = build_movie(id, input);
  let id_str = encode_uuid(id);

  let tx = conn.transaction()?;
  check_movie_refs(&tx, &movie.genre_ids, &movie.actor_ids)?;
  let n = tx.execute(
    "UPDATE movies SET title = ?2, description = ?3, duration = ?4 WHERE movie_id = ?1",
    params![id_str, movie.title, movie.description, movie.duration],
  )?;
  expect_affected(n, Entity::Movie, id)?;
  tx.execute("DELETE FROM movie_genres WHERE movie_id = ?1", params![id_str])?;
  tx.execute("DELETE FROM movie_actors WHERE movie_id = ?1", params![id_str])?;
  link_movie(&tx, &movie)?;
  tx.commit()?;
  Ok(movie)
}

pub fn delete_movie(conn: &Connection, id: Uuid) -> Result<()> {
  let n = conn.execute("DELETE FROM movies WHERE movie_id = ?1", params![encode_uuid(id)])?;
  expect_affected(n, Entity::Movie, id)
}

pub fn select_movie(conn: &Connection, id: Uuid) -> Result<Option<MovieDetail>> {
  let id_str = encode_uuid(id);

  let row: Option<(String, String, u32)> = conn
    .query_row(
      "SELECT title, description, duration FROM movies WHERE movie_id = ?1",
      params![id_str],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )
    .optional()?;
  let Some((title, description, duration)) = row else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(
    "SELECT g.genre_id, g.name
     FROM movie_genres mg JOIN genres g ON g.genre_id = mg.genre_id
     WHERE mg.movie_id = ?1
     ORDER BY g.name",
  )?;
  let genres = stmt
    .query_map(params![id_str], RawGenre::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawGenre::into_genre)
    .collect::<Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT a.actor_id, a.first_name, a.last_name
     FROM movie_actors ma JOIN actors a ON a.actor_id = ma.actor_id
     WHERE ma.movie_id = ?1
     ORDER BY a.last_name, a.first_name",
  )?;
  let actors = stmt
    .query_map(params![id_str], RawActor::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawActor::into_actor)
    .collect::<Result<Vec<_>>>()?;

  Ok(Some(MovieDetail { movie_id: id, title, description, duration, genres, actors }))
}

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'`.
fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

pub fn list_movies(conn: &Connection, query: &MovieQuery) -> Result<Vec<MovieDetail>> {
  // Build WHERE clause dynamically; every bound value is TEXT.
  let mut conds: Vec<String> = vec![];
  let mut binds: Vec<String> = vec![];

  if !query.genre_ids.is_empty() {
    conds.push(format!(
      "EXISTS (SELECT 1 FROM movie_genres mg
               WHERE mg.movie_id = m.movie_id AND mg.genre_id IN ({}))",
      placeholders(query.genre_ids.len())
    ));
    binds.extend(query.genre_ids.iter().copied().map(encode_uuid));
  }
  if !query.actor_ids.is_empty() {
    conds.push(format!(
      "EXISTS (SELECT 1 FROM movie_actors ma
               WHERE ma.movie_id = m.movie_id AND ma.actor_id IN ({}))",
      placeholders(query.actor_ids.len())
    ));
    binds.extend(query.actor_ids.iter().copied().map(encode_uuid));
  }
  if let Some(title) = query.title.as_deref().filter(|t| !t.is_empty()) {
    // SQLite LIKE is case-insensitive for ASCII.
    conds.push("m.title LIKE ? ESCAPE '\\'".to_owned());
    binds.push(format!("%{}%", escape_like(title)));
  }

  let where_clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  let sql = format!("SELECT m.movie_id FROM movies m {where_clause} ORDER BY m.title, m.rowid");

  let mut stmt = conn.prepare(&sql)?;
  let ids = stmt
    .query_map(params_from_iter(binds.iter()), |r| r.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut movies = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(movie) = select_movie(conn, decode_uuid(&id)?)? {
      movies.push(movie);
    }
  }
  Ok(movies)
}

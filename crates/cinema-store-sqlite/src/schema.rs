//! SQL schema for the cinema SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so future migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS genres (
    genre_id TEXT PRIMARY KEY,
    name     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS actors (
    actor_id   TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL
);

-- Capacity is row_count * seats_in_row; it is never stored.
CREATE TABLE IF NOT EXISTS cinema_halls (
    hall_id      TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    row_count    INTEGER NOT NULL CHECK (row_count >= 1),
    seats_in_row INTEGER NOT NULL CHECK (seats_in_row >= 1)
);

CREATE TABLE IF NOT EXISTS movies (
    movie_id    TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    duration    INTEGER NOT NULL CHECK (duration >= 1)
);

CREATE TABLE IF NOT EXISTS movie_genres (
    movie_id TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    genre_id TEXT NOT NULL REFERENCES genres(genre_id) ON DELETE CASCADE,
    PRIMARY KEY (movie_id, genre_id)
);

CREATE TABLE IF NOT EXISTS movie_actors (
    movie_id TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    actor_id TEXT NOT NULL REFERENCES actors(actor_id) ON DELETE CASCADE,
    PRIMARY KEY (movie_id, actor_id)
);

CREATE TABLE IF NOT EXISTS movie_sessions (
    session_id TEXT PRIMARY KEY,
    movie_id   TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    hall_id    TEXT NOT NULL REFERENCES cinema_halls(hall_id) ON DELETE CASCADE,
    show_time  TEXT NOT NULL   -- fixed-width RFC 3339 UTC, sorts lexically
);

CREATE TABLE IF NOT EXISTS orders (
    order_id   TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    caller     TEXT NOT NULL
);

-- Tickets are never updated. The UNIQUE constraint is what prevents two
-- concurrent writers from selling the same seat twice.
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id   TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL REFERENCES movie_sessions(session_id) ON DELETE CASCADE,
    order_id    TEXT NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
    seat_row    INTEGER NOT NULL CHECK (seat_row >= 1),
    seat_number INTEGER NOT NULL CHECK (seat_number >= 1),
    UNIQUE (session_id, seat_row, seat_number)
);

CREATE INDEX IF NOT EXISTS sessions_movie_idx ON movie_sessions(movie_id);
CREATE INDEX IF NOT EXISTS sessions_hall_idx  ON movie_sessions(hall_id);
CREATE INDEX IF NOT EXISTS sessions_time_idx  ON movie_sessions(show_time);
CREATE INDEX IF NOT EXISTS tickets_order_idx  ON tickets(order_id);
CREATE INDEX IF NOT EXISTS orders_caller_idx  ON orders(caller, created_at);

PRAGMA user_version = 1;
";

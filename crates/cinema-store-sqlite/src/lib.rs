//! SQLite backend for the cinema store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Seat uniqueness is enforced by a
//! `UNIQUE (session_id, seat_row, seat_number)` constraint on `tickets`.

mod catalogue;
mod encode;
mod ledger;
mod schema;
mod sessions;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

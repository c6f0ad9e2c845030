//! The administrative catalogue: genres, actors and movies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Genres ──────────────────────────────────────────────────────────────────

/// Genre names are unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub genre_id: Uuid,
  pub name:     String,
}

// ─── Actors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub actor_id:   Uuid,
  pub first_name: String,
  pub last_name:  String,
}

impl Actor {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActor {
  pub first_name: String,
  pub last_name:  String,
}

// ─── Movies ──────────────────────────────────────────────────────────────────

/// A movie as stored: genres and actors are references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:    Uuid,
  pub title:       String,
  pub description: String,
  /// Running time in minutes.
  pub duration:    u32,
  pub genre_ids:   Vec<Uuid>,
  pub actor_ids:   Vec<Uuid>,
}

/// Input to [`crate::store::CinemaStore::add_movie`] and
/// [`crate::store::CinemaStore::update_movie`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMovie {
  pub title:       String,
  pub description: String,
  pub duration:    u32,
  #[serde(default)]
  pub genre_ids:   Vec<Uuid>,
  #[serde(default)]
  pub actor_ids:   Vec<Uuid>,
}

impl NewMovie {
  pub fn validate(&self) -> Result<()> {
    if self.duration == 0 {
      return Err(Error::InvalidValue { field: "duration", value: 0 });
    }
    Ok(())
  }
}

/// A movie with its genres and actors resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
  pub movie_id:    Uuid,
  pub title:       String,
  pub description: String,
  pub duration:    u32,
  pub genres:      Vec<Genre>,
  pub actors:      Vec<Actor>,
}

/// Parameters for [`crate::store::CinemaStore::list_movies`].
#[derive(Debug, Clone, Default)]
pub struct MovieQuery {
  /// Keep movies tagged with any of these genres.
  pub genre_ids: Vec<Uuid>,
  /// Keep movies featuring any of these actors.
  pub actor_ids: Vec<Uuid>,
  /// Case-insensitive substring of the title.
  pub title:     Option<String>,
}

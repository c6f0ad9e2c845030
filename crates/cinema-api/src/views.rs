//! Response payloads.
//!
//! List and detail endpoints return different shapes for the same record;
//! each shape is its own type here, built from the store's read models.

use chrono::{DateTime, Utc};
use cinema_core::{
  catalogue::{Actor, Genre, Movie, MovieDetail},
  hall::Hall,
  ledger::{Seat, Ticket},
  order::{Order, OrderView, TicketView},
  session::{MovieSession, SessionDetail, SessionSummary},
};
use serde::Serialize;
use uuid::Uuid;

// ─── Catalogue ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenreBody {
  pub id:   Uuid,
  pub name: String,
}

impl From<Genre> for GenreBody {
  fn from(g: Genre) -> Self { Self { id: g.genre_id, name: g.name } }
}

#[derive(Debug, Serialize)]
pub struct ActorBody {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub full_name:  String,
}

impl From<Actor> for ActorBody {
  fn from(a: Actor) -> Self {
    Self {
      id:         a.actor_id,
      full_name:  a.full_name(),
      first_name: a.first_name,
      last_name:  a.last_name,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct HallBody {
  pub id:           Uuid,
  pub name:         String,
  pub rows:         u32,
  pub seats_in_row: u32,
  pub capacity:     u32,
}

impl From<Hall> for HallBody {
  fn from(h: Hall) -> Self {
    Self {
      id:           h.hall_id,
      capacity:     h.capacity(),
      name:         h.name,
      rows:         h.rows,
      seats_in_row: h.seats_in_row,
    }
  }
}

/// A movie as written: genres and actors by id.
#[derive(Debug, Serialize)]
pub struct MovieBody {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub duration:    u32,
  pub genres:      Vec<Uuid>,
  pub actors:      Vec<Uuid>,
}

impl From<Movie> for MovieBody {
  fn from(m: Movie) -> Self {
    Self {
      id:          m.movie_id,
      title:       m.title,
      description: m.description,
      duration:    m.duration,
      genres:      m.genre_ids,
      actors:      m.actor_ids,
    }
  }
}

/// A movie in a listing: genre names and actor full names.
#[derive(Debug, Serialize)]
pub struct MovieListItem {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub duration:    u32,
  pub genres:      Vec<String>,
  pub actors:      Vec<String>,
}

impl From<MovieDetail> for MovieListItem {
  fn from(m: MovieDetail) -> Self {
    Self {
      id:          m.movie_id,
      title:       m.title,
      description: m.description,
      duration:    m.duration,
      genres:      m.genres.into_iter().map(|g| g.name).collect(),
      actors:      m.actors.iter().map(Actor::full_name).collect(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailBody {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub duration:    u32,
  pub genres:      Vec<GenreBody>,
  pub actors:      Vec<ActorBody>,
}

impl From<MovieDetail> for MovieDetailBody {
  fn from(m: MovieDetail) -> Self {
    Self {
      id:          m.movie_id,
      title:       m.title,
      description: m.description,
      duration:    m.duration,
      genres:      m.genres.into_iter().map(Into::into).collect(),
      actors:      m.actors.into_iter().map(Into::into).collect(),
    }
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionBody {
  pub id:          Uuid,
  pub show_time:   DateTime<Utc>,
  pub movie:       Uuid,
  pub cinema_hall: Uuid,
}

impl From<MovieSession> for SessionBody {
  fn from(s: MovieSession) -> Self {
    Self {
      id:          s.session_id,
      show_time:   s.show_time,
      movie:       s.movie_id,
      cinema_hall: s.hall_id,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SessionListItem {
  pub id:                   Uuid,
  pub show_time:            DateTime<Utc>,
  pub movie_title:          String,
  pub cinema_hall_name:     String,
  pub cinema_hall_capacity: u32,
  pub tickets_available:    u32,
}

impl From<SessionSummary> for SessionListItem {
  fn from(s: SessionSummary) -> Self {
    Self {
      id:                   s.session_id,
      show_time:            s.show_time,
      movie_title:          s.movie_title,
      cinema_hall_name:     s.hall_name,
      cinema_hall_capacity: s.hall_capacity,
      tickets_available:    s.tickets_available,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SessionDetailBody {
  pub id:           Uuid,
  pub show_time:    DateTime<Utc>,
  pub movie:        MovieListItem,
  pub cinema_hall:  HallBody,
  pub taken_places: Vec<Seat>,
}

impl From<SessionDetail> for SessionDetailBody {
  fn from(s: SessionDetail) -> Self {
    Self {
      id:           s.session_id,
      show_time:    s.show_time,
      movie:        s.movie.into(),
      cinema_hall:  s.hall.into(),
      taken_places: s.taken_places,
    }
  }
}

// ─── Orders ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TicketBody {
  pub id:            Uuid,
  pub movie_session: Uuid,
  pub row:           u32,
  pub seat:          u32,
}

impl From<Ticket> for TicketBody {
  fn from(t: Ticket) -> Self {
    Self { id: t.ticket_id, movie_session: t.session_id, row: t.row, seat: t.seat }
  }
}

/// A freshly committed order.
#[derive(Debug, Serialize)]
pub struct OrderBody {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub tickets:    Vec<TicketBody>,
}

impl From<Order> for OrderBody {
  fn from(o: Order) -> Self {
    Self {
      id:         o.order_id,
      created_at: o.created_at,
      tickets:    o.tickets.into_iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct TicketListItem {
  pub id:            Uuid,
  pub row:           u32,
  pub seat:          u32,
  pub movie_session: SessionListItem,
}

impl From<TicketView> for TicketListItem {
  fn from(t: TicketView) -> Self {
    Self { id: t.ticket_id, row: t.row, seat: t.seat, movie_session: t.session.into() }
  }
}

#[derive(Debug, Serialize)]
pub struct OrderListItem {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub tickets:    Vec<TicketListItem>,
}

impl From<OrderView> for OrderListItem {
  fn from(o: OrderView) -> Self {
    Self {
      id:         o.order_id,
      created_at: o.created_at,
      tickets:    o.tickets.into_iter().map(Into::into).collect(),
    }
  }
}

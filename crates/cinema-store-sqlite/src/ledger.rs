//! Seat ledger and order aggregation.
//!
//! Every write here runs inside an `IMMEDIATE` transaction so the write lock
//! is held from the availability pre-check through the ticket insert. The
//! `UNIQUE (session_id, seat_row, seat_number)` constraint still has the last
//! word: a violation at insert time is reported as `SeatTaken`.

use std::collections::BTreeMap;

use chrono::Utc;
use cinema_core::{
  Entity, Error as CoreError,
  ledger::{Availability, Seat, SeatRequest, Ticket},
  order::{Order, OrderView, TicketView},
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid, is_unique_violation},
  sessions::{RawSummary, SUMMARY_COLUMNS, session_hall},
};

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Seats taken for a session, ordered by `(row, seat)`.
pub fn select_taken(conn: &Connection, session_id: Uuid) -> Result<Vec<Seat>> {
  let mut stmt = conn.prepare(
    "SELECT seat_row, seat_number FROM tickets
     WHERE session_id = ?1
     ORDER BY seat_row, seat_number",
  )?;
  let seats = stmt
    .query_map(params![encode_uuid(session_id)], |r| {
      Ok(Seat { row: r.get(0)?, seat: r.get(1)? })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(seats)
}

fn seat_is_taken(conn: &Connection, session_id: Uuid, seat: Seat) -> Result<bool> {
  let hit = conn
    .query_row(
      "SELECT 1 FROM tickets
       WHERE session_id = ?1 AND seat_row = ?2 AND seat_number = ?3",
      params![encode_uuid(session_id), seat.row, seat.seat],
      |_| Ok(()),
    )
    .optional()?;
  Ok(hit.is_some())
}

pub fn taken_seats(conn: &Connection, session_id: Uuid) -> Result<Vec<Seat>> {
  session_hall(conn, session_id)?;
  select_taken(conn, session_id)
}

pub fn count_available(conn: &mut Connection, session_id: Uuid) -> Result<u32> {
  Ok(availability(conn, session_id)?.available)
}

/// Capacity and taken seats read inside one transaction.
pub fn availability(conn: &mut Connection, session_id: Uuid) -> Result<Availability> {
  let tx = conn.transaction()?;
  let hall = session_hall(&tx, session_id)?;
  let taken = select_taken(&tx, session_id)?;
  tx.commit()?;
  Ok(Availability::new(session_id, hall.capacity(), taken))
}

// ─── Claims ──────────────────────────────────────────────────────────────────

/// Check a request against the hall grid and the current ledger. Writes
/// nothing.
pub fn validate_claim(conn: &Connection, request: SeatRequest) -> Result<Seat> {
  let hall = session_hall(conn, request.session_id)?;
  let seat = hall
    .check_seat(request.row, request.seat)
    .map_err(CoreError::from)?;
  if seat_is_taken(conn, request.session_id, seat)? {
    return Err(seat_taken(request.session_id, seat).into());
  }
  Ok(seat)
}

fn seat_taken(session_id: Uuid, seat: Seat) -> CoreError {
  CoreError::SeatTaken { session_id, row: seat.row, seat: seat.seat }
}

pub fn insert_ticket(conn: &Connection, ticket: &Ticket) -> Result<()> {
  let inserted = conn.execute(
    "INSERT INTO tickets (ticket_id, session_id, order_id, seat_row, seat_number)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      encode_uuid(ticket.ticket_id),
      encode_uuid(ticket.session_id),
      encode_uuid(ticket.order_id),
      ticket.row,
      ticket.seat,
    ],
  );
  match inserted {
    Ok(_) => Ok(()),
    Err(e) if is_unique_violation(&e) => {
      Err(seat_taken(ticket.session_id, ticket.seat()).into())
    }
    Err(e) => Err(e.into()),
  }
}

/// Validate then insert. Must run inside a write transaction.
fn claim(conn: &Connection, order_id: Uuid, request: SeatRequest) -> Result<Ticket> {
  let seat = validate_claim(conn, request)?;
  let ticket = Ticket {
    ticket_id: Uuid::new_v4(),
    session_id: request.session_id,
    order_id,
    row: seat.row,
    seat: seat.seat,
  };
  insert_ticket(conn, &ticket)?;
  Ok(ticket)
}

pub fn commit_claim(
  conn: &mut Connection,
  order_id: Uuid,
  request: SeatRequest,
) -> Result<Ticket> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let exists = tx
    .query_row(
      "SELECT 1 FROM orders WHERE order_id = ?1",
      params![encode_uuid(order_id)],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if !exists {
    return Err(CoreError::not_found(Entity::Order, order_id).into());
  }
  let ticket = claim(&tx, order_id, request)?;
  tx.commit()?;
  Ok(ticket)
}

// ─── Orders ──────────────────────────────────────────────────────────────────

/// Commit all requests as one order, or none of them.
///
/// Requests are claimed in order; a request that repeats a seat earlier in
/// the same batch fails the pre-check against the ticket just inserted.
/// Returning early drops the transaction, which rolls it back.
pub fn create_order(
  conn: &mut Connection,
  caller: String,
  requests: Vec<SeatRequest>,
) -> Result<Order> {
  if requests.is_empty() {
    return Err(CoreError::EmptyOrder.into());
  }

  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let order_id = Uuid::new_v4();
  let created_at = Utc::now();
  tx.execute(
    "INSERT INTO orders (order_id, created_at, caller) VALUES (?1, ?2, ?3)",
    params![encode_uuid(order_id), encode_dt(created_at), caller],
  )?;

  let mut tickets = Vec::with_capacity(requests.len());
  for request in requests {
    tickets.push(claim(&tx, order_id, request)?);
  }
  tx.commit()?;

  Ok(Order { order_id, created_at, caller, tickets })
}

/// Orders placed by `caller`, newest first, with one summary per ticket.
pub fn list_orders(conn: &mut Connection, caller: &str) -> Result<Vec<OrderView>> {
  let tx = conn.transaction()?;

  let orders = {
    let mut stmt = tx.prepare(
      "SELECT order_id, created_at FROM orders
       WHERE caller = ?1
       ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt
      .query_map(params![caller], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows
  };

  let raw_tickets = {
    let sql = format!(
      "SELECT t.order_id, t.ticket_id, t.seat_row, t.seat_number, {SUMMARY_COLUMNS}
       FROM tickets t
       JOIN orders o         ON o.order_id   = t.order_id
       JOIN movie_sessions s ON s.session_id = t.session_id
       JOIN movies m         ON m.movie_id   = s.movie_id
       JOIN cinema_halls h   ON h.hall_id    = s.hall_id
       WHERE o.caller = ?1
       ORDER BY t.rowid"
    );
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt
      .query_map(params![caller], |r| {
        Ok((
          r.get::<_, String>(0)?,
          r.get::<_, String>(1)?,
          r.get::<_, u32>(2)?,
          r.get::<_, u32>(3)?,
          RawSummary::from_row(r, 4)?,
        ))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    rows
  };
  tx.commit()?;

  let mut by_order: BTreeMap<String, Vec<TicketView>> = BTreeMap::new();
  for (order_id, ticket_id, row, seat, summary) in raw_tickets {
    by_order.entry(order_id).or_default().push(TicketView {
      ticket_id: decode_uuid(&ticket_id)?,
      row,
      seat,
      session: summary.into_summary()?,
    });
  }

  orders
    .into_iter()
    .map(|(order_id, created_at)| {
      Ok(OrderView {
        order_id:   decode_uuid(&order_id)?,
        created_at: decode_dt(&created_at)?,
        tickets:    by_order.remove(&order_id).unwrap_or_default(),
      })
    })
    .collect()
}

//! Orders: an atomic batch purchase of one or more tickets by one caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ledger::Ticket, session::SessionSummary};

/// A committed order. `created_at` is set once, at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub order_id:   Uuid,
  pub created_at: DateTime<Utc>,
  /// Opaque caller identity resolved by the host.
  pub caller:     String,
  pub tickets:    Vec<Ticket>,
}

/// A ticket as shown in an order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
  pub ticket_id: Uuid,
  pub row:       u32,
  pub seat:      u32,
  pub session:   SessionSummary,
}

/// Read model returned by [`crate::store::CinemaStore::list_orders`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
  pub order_id:   Uuid,
  pub created_at: DateTime<Utc>,
  pub tickets:    Vec<TicketView>,
}

//! Hall geometry: a fixed grid of `rows × seats_in_row` seats.
//!
//! Capacity is always derived from the grid; it is never stored.

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;
use uuid::Uuid;

use crate::{Error, Result, ledger::Seat};

// ─── Hall ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
  pub hall_id:      Uuid,
  pub name:         String,
  pub rows:         u32,
  pub seats_in_row: u32,
}

impl Hall {
  pub fn capacity(&self) -> u32 { self.rows.saturating_mul(self.seats_in_row) }

  /// Bounds-check a requested seat against this grid.
  ///
  /// The row is checked before the seat, so a request with both coordinates
  /// out of range reports `row`.
  pub fn check_seat(&self, row: i64, seat: i64) -> Result<Seat, RangeError> {
    let row = SeatField::Row.check(row, self.rows)?;
    let seat = SeatField::Seat.check(seat, self.seats_in_row)?;
    Ok(Seat { row, seat })
  }

  /// Whether an already-validated seat still lies inside this grid.
  pub fn contains(&self, seat: Seat) -> bool {
    (1..=self.rows).contains(&seat.row)
      && (1..=self.seats_in_row).contains(&seat.seat)
  }
}

/// Input to [`crate::store::CinemaStore::add_hall`] and
/// [`crate::store::CinemaStore::update_hall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHall {
  pub name:         String,
  pub rows:         u32,
  pub seats_in_row: u32,
}

impl NewHall {
  /// Both dimensions of the grid must be positive and their product must
  /// fit a capacity.
  pub fn validate(&self) -> Result<()> {
    if self.rows == 0 {
      return Err(Error::InvalidValue { field: "rows", value: self.rows });
    }
    if self.seats_in_row == 0 {
      return Err(Error::InvalidValue {
        field: "seats_in_row",
        value: self.seats_in_row,
      });
    }
    if self.rows.checked_mul(self.seats_in_row).is_none() {
      return Err(Error::GridTooLarge {
        rows:         self.rows,
        seats_in_row: self.seats_in_row,
      });
    }
    Ok(())
  }

  pub fn into_hall(self, hall_id: Uuid) -> Hall {
    Hall {
      hall_id,
      name: self.name,
      rows: self.rows,
      seats_in_row: self.seats_in_row,
    }
  }
}

// ─── Bounds errors ───────────────────────────────────────────────────────────

/// The coordinate of a seat request that failed a bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeatField {
  Row,
  Seat,
}

impl SeatField {
  /// The hall attribute bounding this field.
  pub fn hall_attr(self) -> &'static str {
    match self {
      Self::Row => "rows",
      Self::Seat => "seats_in_row",
    }
  }

  fn check(self, value: i64, max: u32) -> Result<u32, RangeError> {
    match u32::try_from(value) {
      Ok(v) if (1..=max).contains(&v) => Ok(v),
      _ => Err(RangeError { field: self, value, max }),
    }
  }
}

/// A row or seat outside `[1, max]` for the hall hosting the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
  "{field} number must be in available range: (1, {attr}): (1, {max})",
  attr = .field.hall_attr()
)]
pub struct RangeError {
  pub field: SeatField,
  pub value: i64,
  pub max:   u32,
}

impl RangeError {
  /// The valid inclusive range for the offending field.
  pub fn range(&self) -> (u32, u32) { (1, self.max) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hall() -> Hall {
    NewHall { name: "White".into(), rows: 10, seats_in_row: 14 }
      .into_hall(Uuid::new_v4())
  }

  #[test]
  fn capacity_is_rows_times_seats() {
    assert_eq!(hall().capacity(), 140);
  }

  #[test]
  fn grid_past_u32_capacity_is_rejected() {
    let huge = NewHall { name: "Dome".into(), rows: 70_000, seats_in_row: 70_000 };
    assert!(matches!(
      huge.validate(),
      Err(Error::GridTooLarge { rows: 70_000, seats_in_row: 70_000 })
    ));

    let widest = NewHall { name: "Strip".into(), rows: 1, seats_in_row: u32::MAX };
    assert!(widest.validate().is_ok());
  }

  #[test]
  fn seat_inside_grid_is_accepted() {
    let seat = hall().check_seat(2, 12).unwrap();
    assert_eq!(seat, Seat { row: 2, seat: 12 });
    assert!(hall().check_seat(10, 14).is_ok());
    assert!(hall().check_seat(1, 1).is_ok());
  }

  #[test]
  fn row_past_last_row_is_rejected() {
    let err = hall().check_seat(11, 1).unwrap_err();
    assert_eq!(err.field, SeatField::Row);
    assert_eq!(err.range(), (1, 10));
    assert_eq!(
      err.to_string(),
      "row number must be in available range: (1, rows): (1, 10)"
    );
  }

  #[test]
  fn zero_and_negative_seats_are_rejected() {
    for seat in [0, -3] {
      let err = hall().check_seat(1, seat).unwrap_err();
      assert_eq!(err.field, SeatField::Seat);
      assert_eq!(err.value, seat);
      assert_eq!(err.range(), (1, 14));
    }
  }

  #[test]
  fn row_is_reported_when_both_are_out_of_range() {
    let err = hall().check_seat(0, 99).unwrap_err();
    assert_eq!(err.field, SeatField::Row);
  }

  #[test]
  fn huge_values_do_not_wrap() {
    let err = hall().check_seat(i64::from(u32::MAX) + 2, 1).unwrap_err();
    assert_eq!(err.field, SeatField::Row);
  }

  #[test]
  fn contains_tracks_grid() {
    let h = hall();
    assert!(h.contains(Seat { row: 10, seat: 14 }));
    assert!(!h.contains(Seat { row: 10, seat: 15 }));
  }

  #[test]
  fn empty_grid_is_invalid() {
    let err = NewHall { name: "Tiny".into(), rows: 0, seats_in_row: 5 }
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "rows", value: 0 }));
    assert!(
      NewHall { name: "Tiny".into(), rows: 1, seats_in_row: 0 }
        .validate()
        .is_err()
    );
  }
}

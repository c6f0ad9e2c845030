//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, TimeZone as _, Utc};
use cinema_core::{
  Entity, Error as CoreError,
  catalogue::{MovieQuery, NewActor, NewMovie},
  hall::{NewHall, SeatField},
  ledger::{Seat, SeatRequest},
  session::{MovieSession, NewSession, SessionQuery},
  store::CinemaStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn core(err: Error) -> CoreError {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

fn hall(name: &str, rows: u32, seats_in_row: u32) -> NewHall {
  NewHall { name: name.into(), rows, seats_in_row }
}

fn movie(title: &str) -> NewMovie {
  NewMovie {
    title:       title.into(),
    description: format!("{title} description"),
    duration:    120,
    genre_ids:   vec![],
    actor_ids:   vec![],
  }
}

/// A 10×14 hall with one session of one movie.
async fn screening(s: &SqliteStore) -> MovieSession {
  let h = s.add_hall(hall("Blue", 10, 14)).await.unwrap();
  let m = s.add_movie(movie("Speed")).await.unwrap();
  s.add_session(NewSession {
    movie_id:  m.movie_id,
    hall_id:   h.hall_id,
    show_time: Utc.with_ymd_and_hms(2022, 9, 2, 18, 0, 0).unwrap(),
  })
  .await
  .unwrap()
}

// ─── Seat ledger ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_claim_reduces_availability() {
  let s = store().await;
  let session = screening(&s).await;

  let order = s
    .create_order("alice".into(), vec![SeatRequest::new(session.session_id, 2, 12)])
    .await
    .unwrap();
  assert_eq!(order.tickets.len(), 1);
  assert_eq!(order.tickets[0].seat(), Seat { row: 2, seat: 12 });

  assert_eq!(s.count_available(session.session_id).await.unwrap(), 139);
  assert_eq!(
    s.taken_seats(session.session_id).await.unwrap(),
    vec![Seat { row: 2, seat: 12 }]
  );
}

#[tokio::test]
async fn row_outside_grid_is_a_range_error() {
  let s = store().await;
  let session = screening(&s).await;

  let err = s
    .create_order("alice".into(), vec![SeatRequest::new(session.session_id, 11, 1)])
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Range(e) => {
      assert_eq!(e.field, SeatField::Row);
      assert_eq!(e.range(), (1, 10));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn out_of_range_fails_even_when_grid_is_full() {
  let s = store().await;
  let h = s.add_hall(hall("Tiny", 1, 1)).await.unwrap();
  let m = s.add_movie(movie("Short")).await.unwrap();
  let session = s
    .add_session(NewSession { movie_id: m.movie_id, hall_id: h.hall_id, show_time: Utc::now() })
    .await
    .unwrap();
  s.create_order("a".into(), vec![SeatRequest::new(session.session_id, 1, 1)])
    .await
    .unwrap();

  for (row, seat) in [(0, 1), (1, 0), (2, 1), (1, 2), (-3, 1), (1, i64::MAX)] {
    let err = s
      .validate_claim(SeatRequest::new(session.session_id, row, seat))
      .await
      .unwrap_err();
    assert!(matches!(core(err), CoreError::Range(_)), "({row}, {seat})");
  }
}

#[tokio::test]
async fn row_is_reported_before_seat() {
  let s = store().await;
  let session = screening(&s).await;

  let err = s
    .validate_claim(SeatRequest::new(session.session_id, 0, 99))
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Range(e) => assert_eq!(e.field, SeatField::Row),
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn second_claim_for_same_seat_conflicts() {
  let s = store().await;
  let session = screening(&s).await;
  let req = SeatRequest::new(session.session_id, 2, 12);

  s.create_order("alice".into(), vec![req]).await.unwrap();
  let err = s.create_order("bob".into(), vec![req]).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::SeatTaken { row: 2, seat: 12, .. }
  ));
  assert_eq!(s.count_available(session.session_id).await.unwrap(), 139);
}

#[tokio::test]
async fn duplicate_seat_within_order_rolls_back_everything() {
  let s = store().await;
  let session = screening(&s).await;
  let req = SeatRequest::new(session.session_id, 1, 1);

  let err = s
    .create_order("alice".into(), vec![req, req])
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::SeatTaken { .. }));

  assert!(s.taken_seats(session.session_id).await.unwrap().is_empty());
  assert!(s.list_orders("alice".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_last_request_rolls_back_valid_ones() {
  let s = store().await;
  let session = screening(&s).await;
  let sid = session.session_id;

  let err = s
    .create_order(
      "alice".into(),
      vec![
        SeatRequest::new(sid, 1, 1),
        SeatRequest::new(sid, 1, 2),
        SeatRequest::new(sid, 1, 3),
        SeatRequest::new(sid, 1, 15),
      ],
    )
    .await
    .unwrap_err();
  match core(err) {
    CoreError::Range(e) => assert_eq!(e.field, SeatField::Seat),
    other => panic!("unexpected error: {other:?}"),
  }
  assert_eq!(s.count_available(sid).await.unwrap(), 140);
}

#[tokio::test]
async fn empty_order_is_rejected() {
  let s = store().await;
  let err = s.create_order("alice".into(), vec![]).await.unwrap_err();
  assert!(matches!(core(err), CoreError::EmptyOrder));
}

#[tokio::test]
async fn claim_for_unknown_session_is_not_found() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s
    .create_order("alice".into(), vec![SeatRequest::new(missing, 1, 1)])
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::NotFound { kind: Entity::MovieSession, id } if id == missing
  ));
}

#[tokio::test]
async fn order_may_span_sessions() {
  let s = store().await;
  let first = screening(&s).await;
  let second = screening(&s).await;

  let order = s
    .create_order(
      "alice".into(),
      vec![
        SeatRequest::new(first.session_id, 5, 5),
        SeatRequest::new(second.session_id, 5, 5),
      ],
    )
    .await
    .unwrap();
  assert_eq!(order.tickets.len(), 2);
  assert_eq!(s.count_available(first.session_id).await.unwrap(), 139);
  assert_eq!(s.count_available(second.session_id).await.unwrap(), 139);
}

#[tokio::test]
async fn commit_claim_appends_to_existing_order() {
  let s = store().await;
  let session = screening(&s).await;
  let sid = session.session_id;

  let order = s
    .create_order("alice".into(), vec![SeatRequest::new(sid, 1, 1)])
    .await
    .unwrap();
  let ticket = s
    .commit_claim(order.order_id, SeatRequest::new(sid, 1, 2))
    .await
    .unwrap();
  assert_eq!(ticket.order_id, order.order_id);

  let err = s
    .commit_claim(order.order_id, SeatRequest::new(sid, 1, 2))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::SeatTaken { .. }));

  let err = s
    .commit_claim(Uuid::new_v4(), SeatRequest::new(sid, 3, 3))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::NotFound { kind: Entity::Order, .. }));
}

#[tokio::test]
async fn validate_claim_writes_nothing() {
  let s = store().await;
  let session = screening(&s).await;

  let seat = s
    .validate_claim(SeatRequest::new(session.session_id, 3, 4))
    .await
    .unwrap();
  assert_eq!(seat, Seat { row: 3, seat: 4 });
  assert!(s.taken_seats(session.session_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_constraint_rejects_duplicate_insert() {
  let s = store().await;
  let session = screening(&s).await;
  let order = s
    .create_order("alice".into(), vec![SeatRequest::new(session.session_id, 4, 4)])
    .await
    .unwrap();

  // Bypass the pre-check and go straight to the constraint.
  let ticket = cinema_core::ledger::Ticket {
    ticket_id:  Uuid::new_v4(),
    session_id: session.session_id,
    order_id:   order.order_id,
    row:        4,
    seat:       4,
  };
  let err = s
    .raw(move |conn| crate::ledger::insert_ticket(conn, &ticket))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::SeatTaken { row: 4, seat: 4, .. }));
}

#[tokio::test]
async fn availability_is_conserved() {
  let s = store().await;
  let session = screening(&s).await;
  let sid = session.session_id;

  for batch in [vec![(1, 1), (1, 2)], vec![(10, 14)], vec![(1, 2), (9, 9)], vec![(7, 7)]] {
    let reqs = batch
      .into_iter()
      .map(|(r, c)| SeatRequest::new(sid, r, c))
      .collect();
    let _ = s.create_order("alice".into(), reqs).await;

    let view = s.availability(sid).await.unwrap();
    assert_eq!(view.capacity, 140);
    assert_eq!(view.available as usize + view.taken.len(), 140);
    assert_eq!(s.count_available(sid).await.unwrap(), view.available);
  }
  assert_eq!(s.taken_seats(sid).await.unwrap().len(), 4);
}

#[tokio::test]
async fn simultaneous_claims_have_one_winner() {
  let s = store().await;
  let session = screening(&s).await;
  let req = SeatRequest::new(session.session_id, 6, 6);

  let (a, b) = tokio::join!(
    s.create_order("alice".into(), vec![req]),
    s.create_order("bob".into(), vec![req]),
  );
  let outcomes = [a, b];
  assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
  let loser = outcomes.into_iter().find_map(Result::err).unwrap();
  assert!(matches!(core(loser), CoreError::SeatTaken { .. }));
}

#[tokio::test]
async fn racing_connections_to_one_file_have_one_winner() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cinema.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();
  let session = screening(&a).await;

  for seat in 1..=14 {
    let req = SeatRequest::new(session.session_id, 1, seat);
    let (x, y) = tokio::join!(
      a.create_order("alice".into(), vec![req]),
      b.create_order("bob".into(), vec![req]),
    );
    assert!(x.is_ok() ^ y.is_ok(), "seat {seat}");
  }
  assert_eq!(a.count_available(session.session_id).await.unwrap(), 126);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sessions_filter_by_movie_and_date() {
  let s = store().await;
  let h = s.add_hall(hall("Red", 5, 5)).await.unwrap();
  let speed = s.add_movie(movie("Speed")).await.unwrap();
  let heat = s.add_movie(movie("Heat")).await.unwrap();

  let at = |d, hour| Utc.with_ymd_and_hms(2022, 9, d, hour, 0, 0).unwrap();
  for (m, t) in [(&speed, at(2, 10)), (&speed, at(2, 22)), (&heat, at(2, 12)), (&speed, at(3, 10))] {
    s.add_session(NewSession { movie_id: m.movie_id, hall_id: h.hall_id, show_time: t })
      .await
      .unwrap();
  }

  let all = s.list_sessions(&SessionQuery::default()).await.unwrap();
  assert_eq!(all.len(), 4);
  assert!(all.windows(2).all(|w| w[0].show_time >= w[1].show_time));

  let query = SessionQuery {
    movie_id: Some(speed.movie_id),
    date:     NaiveDate::from_ymd_opt(2022, 9, 2),
  };
  let hits = s.list_sessions(&query).await.unwrap();
  assert_eq!(hits.len(), 2);
  assert!(hits.iter().all(|h| h.movie_title == "Speed"));
  assert_eq!(hits[0].show_time, at(2, 22));
}

#[tokio::test]
async fn session_listing_reports_tickets_available() {
  let s = store().await;
  let session = screening(&s).await;
  s.create_order(
    "alice".into(),
    vec![
      SeatRequest::new(session.session_id, 1, 1),
      SeatRequest::new(session.session_id, 1, 2),
    ],
  )
  .await
  .unwrap();

  let listed = s.list_sessions(&SessionQuery::default()).await.unwrap();
  assert_eq!(listed[0].hall_capacity, 140);
  assert_eq!(listed[0].tickets_available, 138);

  let detail = s.get_session(session.session_id).await.unwrap().unwrap();
  assert_eq!(detail.movie.title, "Speed");
  assert_eq!(
    detail.taken_places,
    vec![Seat { row: 1, seat: 1 }, Seat { row: 1, seat: 2 }]
  );
}

#[tokio::test]
async fn session_needs_existing_movie_and_hall() {
  let s = store().await;
  let h = s.add_hall(hall("Red", 5, 5)).await.unwrap();
  let missing = Uuid::new_v4();
  let err = s
    .add_session(NewSession { movie_id: missing, hall_id: h.hall_id, show_time: Utc::now() })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::NotFound { kind: Entity::Movie, .. }));
}

#[tokio::test]
async fn deleting_session_frees_its_tickets() {
  let s = store().await;
  let session = screening(&s).await;
  s.create_order("alice".into(), vec![SeatRequest::new(session.session_id, 1, 1)])
    .await
    .unwrap();

  s.delete_session(session.session_id).await.unwrap();
  assert!(s.get_session(session.session_id).await.unwrap().is_none());
  let orders = s.list_orders("alice".into()).await.unwrap();
  assert!(orders[0].tickets.is_empty());
}

#[tokio::test]
async fn moving_session_to_smaller_hall_is_guarded() {
  let s = store().await;
  let session = screening(&s).await;
  let small = s.add_hall(hall("Small", 3, 3)).await.unwrap();
  s.create_order("alice".into(), vec![SeatRequest::new(session.session_id, 5, 5)])
    .await
    .unwrap();

  let moved = NewSession {
    movie_id:  session.movie_id,
    hall_id:   small.hall_id,
    show_time: session.show_time,
  };
  let err = s.update_session(session.session_id, moved).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::GeometryConflict { stranded: 1, .. }
  ));
}

// ─── Halls ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn shrinking_hall_below_sold_seats_is_rejected() {
  let s = store().await;
  let session = screening(&s).await;
  s.create_order("alice".into(), vec![SeatRequest::new(session.session_id, 9, 2)])
    .await
    .unwrap();

  let err = s
    .update_hall(session.hall_id, hall("Blue", 8, 14))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::GeometryConflict { .. }));

  let grown = s.update_hall(session.hall_id, hall("Blue", 12, 14)).await.unwrap();
  assert_eq!(grown.capacity(), 168);
  assert_eq!(s.count_available(session.session_id).await.unwrap(), 167);
}

#[tokio::test]
async fn zero_sized_hall_is_invalid() {
  let s = store().await;
  let err = s.add_hall(hall("Void", 0, 10)).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::InvalidValue { field: "rows", .. }
  ));
}

#[tokio::test]
async fn overflowing_hall_is_never_stored() {
  let s = store().await;
  let err = s.add_hall(hall("Dome", 70_000, 70_000)).await.unwrap_err();
  assert!(matches!(core(err), CoreError::GridTooLarge { .. }));

  let session = screening(&s).await;
  let err = s
    .update_hall(session.hall_id, hall("Blue", 70_000, 70_000))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::GridTooLarge { .. }));
  assert_eq!(s.count_available(session.session_id).await.unwrap(), 140);
}

#[tokio::test]
async fn deleting_hall_cascades_to_sessions() {
  let s = store().await;
  let session = screening(&s).await;
  s.delete_hall(session.hall_id).await.unwrap();
  assert!(s.get_session(session.session_id).await.unwrap().is_none());

  let err = s.delete_hall(session.hall_id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::NotFound { kind: Entity::CinemaHall, .. }));
}

// ─── Catalogue ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn genre_names_are_unique() {
  let s = store().await;
  s.add_genre("drama".into()).await.unwrap();
  let comedy = s.add_genre("comedy".into()).await.unwrap();

  let err = s.add_genre("drama".into()).await.unwrap_err();
  assert!(matches!(core(err), CoreError::DuplicateGenre(name) if name == "drama"));

  let err = s.update_genre(comedy.genre_id, "drama".into()).await.unwrap_err();
  assert!(matches!(core(err), CoreError::DuplicateGenre(_)));
  assert_eq!(s.list_genres().await.unwrap().len(), 2);
}

#[tokio::test]
async fn movies_filter_by_genre_actor_and_title() {
  let s = store().await;
  let action = s.add_genre("action".into()).await.unwrap();
  let drama = s.add_genre("drama".into()).await.unwrap();
  let keanu = s
    .add_actor(NewActor { first_name: "Keanu".into(), last_name: "Reeves".into() })
    .await
    .unwrap();

  s.add_movie(NewMovie {
    genre_ids: vec![action.genre_id],
    actor_ids: vec![keanu.actor_id],
    ..movie("Speed")
  })
  .await
  .unwrap();
  s.add_movie(NewMovie { genre_ids: vec![drama.genre_id], ..movie("Heat") })
    .await
    .unwrap();
  s.add_movie(NewMovie {
    genre_ids: vec![action.genre_id, drama.genre_id],
    ..movie("Speed 2: Cruise Control")
  })
  .await
  .unwrap();

  let by_genre = s
    .list_movies(&MovieQuery { genre_ids: vec![drama.genre_id], ..Default::default() })
    .await
    .unwrap();
  let titles: Vec<_> = by_genre.iter().map(|m| m.title.as_str()).collect();
  assert_eq!(titles, ["Heat", "Speed 2: Cruise Control"]);

  let by_actor = s
    .list_movies(&MovieQuery { actor_ids: vec![keanu.actor_id], ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_actor.len(), 1);
  assert_eq!(by_actor[0].actors[0].full_name(), "Keanu Reeves");

  let by_title = s
    .list_movies(&MovieQuery { title: Some("speed".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_title.len(), 2);
}

#[tokio::test]
async fn movie_with_unknown_genre_is_rejected() {
  let s = store().await;
  let missing = Uuid::new_v4();
  let err = s
    .add_movie(NewMovie { genre_ids: vec![missing], ..movie("Ghost") })
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::NotFound { kind: Entity::Genre, id } if id == missing
  ));
  assert!(s.list_movies(&MovieQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_movie_relinks_actors() {
  let s = store().await;
  let a = s
    .add_actor(NewActor { first_name: "Al".into(), last_name: "Pacino".into() })
    .await
    .unwrap();
  let b = s
    .add_actor(NewActor { first_name: "Robert".into(), last_name: "De Niro".into() })
    .await
    .unwrap();
  let m = s
    .add_movie(NewMovie { actor_ids: vec![a.actor_id], ..movie("Heat") })
    .await
    .unwrap();

  s.update_movie(m.movie_id, NewMovie { actor_ids: vec![b.actor_id, a.actor_id], ..movie("Heat") })
    .await
    .unwrap();
  let detail = s.get_movie(m.movie_id).await.unwrap().unwrap();
  let names: Vec<_> = detail.actors.iter().map(|a| a.last_name.as_str()).collect();
  assert_eq!(names, ["De Niro", "Pacino"]);
}

// ─── Orders ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn orders_are_listed_per_caller_newest_first() {
  let s = store().await;
  let session = screening(&s).await;
  let sid = session.session_id;

  let first = s
    .create_order("alice".into(), vec![SeatRequest::new(sid, 1, 1)])
    .await
    .unwrap();
  let second = s
    .create_order(
      "alice".into(),
      vec![SeatRequest::new(sid, 2, 1), SeatRequest::new(sid, 2, 2)],
    )
    .await
    .unwrap();
  s.create_order("bob".into(), vec![SeatRequest::new(sid, 3, 1)])
    .await
    .unwrap();

  let orders = s.list_orders("alice".into()).await.unwrap();
  assert_eq!(orders.len(), 2);
  assert_eq!(orders[0].order_id, second.order_id);
  assert_eq!(orders[1].order_id, first.order_id);
  assert_eq!(orders[0].tickets.len(), 2);
  assert_eq!(orders[0].tickets[0].session.movie_title, "Speed");
  assert_eq!(orders[0].tickets[0].session.tickets_available, 136);
}

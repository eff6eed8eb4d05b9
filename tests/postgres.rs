//! Runs against the database in `DATABASE_URL`:
//! `cargo test --test postgres -- --ignored`.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use event_tickets::{
    database::Database,
    error::AppError,
    models::{DomainError, Event, NewEvent, Rating, Spot, SpotStatus, Ticket, TicketKind},
    repository::{EventRepository, PgEventRepository},
    services::spots::generate_spots,
    usecases::{CreateSpotsInputDto, CreateSpotsUseCase},
};

async fn repository() -> PgEventRepository {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let db = Database::new(&url, 5).await.unwrap();
    db.run_migrations().await.unwrap();
    PgEventRepository::new(db)
}

async fn stored_event(repo: &PgEventRepository, price: Decimal, spots: i64) -> Event {
    let mut event = Event::new(NewEvent {
        name: "Event Test".to_string(),
        location: "Location Test".to_string(),
        organization: "Organization Test".to_string(),
        rating: Rating::L14,
        date: Utc::now() + Duration::days(10),
        image_url: "image_url".to_string(),
        capacity: 100,
        price,
        partner_id: 1,
    })
    .unwrap();
    repo.create_event(&event).await.unwrap();

    if spots > 0 {
        let created = generate_spots(&mut event, spots).unwrap();
        repo.create_spots(&created).await.unwrap();
    }
    event
}

fn spot<'a>(event: &'a Event, name: &str) -> &'a Spot {
    event.spots.iter().find(|s| s.name == name).unwrap()
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn prices_round_trip_exactly() {
    let repo = repository().await;

    for price in [dec!(10.12345), dec!(0.00001), dec!(0.0003)] {
        let event = stored_event(&repo, price, 1).await;
        let ticket = Ticket::new(&event, Some(spot(&event, "A0")), TicketKind::Half).unwrap();
        repo.save_purchase(std::slice::from_ref(&ticket)).await.unwrap();

        let stored = repo.get_event_by_id(event.id).await.unwrap();

        assert_eq!(stored.price, price);
        assert_eq!(stored.tickets[0].price, price / Decimal::TWO);
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn rows_decode_back_into_the_domain() {
    let repo = repository().await;
    let event = stored_event(&repo, dec!(50), 2).await;
    let ticket = Ticket::new(&event, Some(spot(&event, "A1")), TicketKind::Full).unwrap();
    repo.save_purchase(std::slice::from_ref(&ticket)).await.unwrap();

    let stored = repo.get_event_by_id(event.id).await.unwrap();

    assert_eq!(stored.rating, Rating::L14);
    assert_eq!(stored.tickets, vec![ticket.clone()]);
    let names: Vec<_> = stored.spots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A0", "A1"]);
    assert_eq!(stored.spots[0].status, SpotStatus::Available);
    assert_eq!(stored.spots[1].status, SpotStatus::Reserved);
    assert_eq!(stored.spots[1].ticket_id, Some(ticket.id));
    assert!(repo
        .list_events()
        .await
        .unwrap()
        .iter()
        .any(|e| e.id == event.id && e.tickets.len() == 1));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn second_purchase_of_a_reserved_spot_rolls_back() {
    let repo = repository().await;
    let event = stored_event(&repo, dec!(50), 2).await;

    let first = Ticket::new(&event, Some(spot(&event, "A0")), TicketKind::Full).unwrap();
    repo.save_purchase(&[first]).await.unwrap();

    let second = vec![
        Ticket::new(&event, Some(spot(&event, "A1")), TicketKind::Full).unwrap(),
        Ticket::new(&event, Some(spot(&event, "A0")), TicketKind::Half).unwrap(),
    ];
    let err = repo.save_purchase(&second).await.unwrap_err();

    assert!(matches!(err, AppError::Domain(DomainError::SpotAlreadyReserved)));
    let stored = repo.get_event_by_id(event.id).await.unwrap();
    assert_eq!(stored.tickets.len(), 1);
    assert_eq!(spot(&stored, "A1").status, SpotStatus::Available);
    assert_eq!(spot(&stored, "A1").ticket_id, None);

    let err = repo
        .reserve_spot(spot(&event, "A0").id, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::SpotAlreadyReserved)));
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn spot_batch_with_a_taken_name_inserts_nothing() {
    let repo = repository().await;
    let event = stored_event(&repo, dec!(50), 1).await;

    let repeated = vec![
        Spot::new(&event, "B1").unwrap(),
        Spot::new(&event, "B1").unwrap(),
    ];
    let err = repo.create_spots(&repeated).await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::SpotNameTaken)));

    let clashing = vec![
        Spot::new(&event, "B2").unwrap(),
        Spot::new(&event, "A0").unwrap(),
    ];
    let err = repo.create_spots(&clashing).await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::SpotNameTaken)));

    let names: Vec<_> = repo
        .find_spots_by_event(event.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["A0"]);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn concurrent_spot_creation_never_fails_as_a_database_error() {
    let repo: Arc<dyn EventRepository> = Arc::new(repository().await);
    let event = stored_event_dyn(&repo).await;
    let left = CreateSpotsUseCase::new(repo.clone());
    let right = CreateSpotsUseCase::new(repo.clone());
    let input = CreateSpotsInputDto {
        event_id: event.id,
        number_of_spots: 5,
    };

    let (a, b) = tokio::join!(left.execute(input.clone()), right.execute(input));

    let mut created = 0;
    for result in [a, b] {
        match result {
            Ok(output) => created += output.spots.len(),
            Err(err) => {
                assert!(matches!(err, AppError::Domain(DomainError::SpotNameTaken)));
                assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
            }
        }
    }
    assert!(created >= 5);
    assert_eq!(repo.find_spots_by_event(event.id).await.unwrap().len(), created);
}

async fn stored_event_dyn(repo: &Arc<dyn EventRepository>) -> Event {
    let event = Event::new(NewEvent {
        name: "Race".to_string(),
        location: "Location Test".to_string(),
        organization: "Organization Test".to_string(),
        rating: Rating::Free,
        date: Utc::now() + Duration::days(10),
        image_url: "image_url".to_string(),
        capacity: 100,
        price: dec!(20),
        partner_id: 1,
    })
    .unwrap();
    repo.create_event(&event).await.unwrap();
    event
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn tickets_come_back_in_purchase_order() {
    let repo = repository().await;
    let event = stored_event(&repo, dec!(50), 3).await;

    let tickets: Vec<_> = ["A2", "A0", "A1"]
        .iter()
        .map(|name| Ticket::new(&event, Some(spot(&event, name)), TicketKind::Full).unwrap())
        .collect();
    repo.save_purchase(&tickets).await.unwrap();

    let stored = repo.get_event_by_id(event.id).await.unwrap();

    assert_eq!(stored.tickets, tickets);
}

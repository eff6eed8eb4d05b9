#![allow(dead_code)]

use chrono::{Duration, Utc};
use fake::{faker::internet::en::SafeEmail, Fake};
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};

use event_tickets::{
    config::{CircuitBreakerConfig, Config, PartnerConfig},
    models::{Event, NewEvent, Rating},
    repository::{EventRepository, InMemoryEventRepository},
    services::{partner::DefaultPartnerFactory, spots::generate_spots},
    AppState,
};

/// Config whose partners 1 and 2 live under `server_uri`.
pub fn config_for(server_uri: &str) -> Config {
    Config {
        partners: PartnerConfig {
            base_urls: HashMap::from([
                (1, format!("{server_uri}/partner1")),
                (2, format!("{server_uri}/partner2")),
            ]),
            timeout_seconds: 2,
        },
        circuit_breaker: CircuitBreakerConfig {
            failure_threshold: 3,
            timeout_seconds: 60,
        },
        ..Config::default()
    }
}

pub fn partner_factory(config: &Config) -> Arc<DefaultPartnerFactory> {
    Arc::new(DefaultPartnerFactory::new(&config.partners, &config.circuit_breaker).unwrap())
}

pub fn state_for(server_uri: &str) -> (Arc<AppState>, Arc<InMemoryEventRepository>) {
    let config = config_for(server_uri);
    let repo = Arc::new(InMemoryEventRepository::new());
    let partners = partner_factory(&config);
    (AppState::with_parts(repo.clone(), partners, config), repo)
}

pub fn buyer_email() -> String {
    SafeEmail().fake()
}

/// Stores an event for `partner_id` with `spots` generated spots (A0, A1, ...).
pub async fn seed_event(
    repo: &InMemoryEventRepository,
    partner_id: i32,
    price: Decimal,
    spots: i64,
) -> Event {
    let mut event = Event::new(NewEvent {
        name: "Event Test".to_string(),
        location: "Location Test".to_string(),
        organization: "Organization Test".to_string(),
        rating: Rating::Free,
        date: Utc::now() + Duration::days(7),
        image_url: "image_url".to_string(),
        capacity: 100,
        price,
        partner_id,
    })
    .unwrap();
    repo.create_event(&event).await.unwrap();

    if spots > 0 {
        let created = generate_spots(&mut event, spots).unwrap();
        repo.create_spots(&created).await.unwrap();
    }
    event
}

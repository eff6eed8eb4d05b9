use serde_json::json;
use uuid::Uuid;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use event_tickets::{
    config::CircuitBreakerConfig,
    models::TicketKind,
    services::partner::{
        partner1::Partner1, Partner, PartnerClient, PartnerError, ReservationOutcome,
        ReservationRequest,
    },
};

fn breaker(failure_threshold: u32) -> CircuitBreakerConfig {
    CircuitBreakerConfig {
        failure_threshold,
        timeout_seconds: 60,
    }
}

fn partner1(base_url: String, failure_threshold: u32) -> Partner1 {
    Partner1::new(PartnerClient::new(
        1,
        base_url,
        reqwest::Client::new(),
        &breaker(failure_threshold),
    ))
}

fn request(event_id: Uuid) -> ReservationRequest {
    ReservationRequest {
        event_id,
        spots: vec!["A1".to_string(), "B3".to_string()],
        ticket_kind: TicketKind::Half,
        card_hash: "card_hash".to_string(),
        email: "buyer@example.com".to_string(),
    }
}

#[tokio::test]
async fn partner_one_posts_canonical_body_and_maps_outcomes() {
    let server = MockServer::start().await;
    let event_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(format!("/partner1/events/{event_id}/reserve")))
        .and(body_json(json!({
            "spots": ["A1", "B3"],
            "ticket_kind": "half",
            "email": "buyer@example.com",
            "card_hash": "card_hash",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "r-1", "spot": "A1", "status": "reserved", "email": "buyer@example.com" },
            { "id": "r-2", "spot": "B3", "status": "reserved" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let partner = partner1(format!("{}/partner1/", server.uri()), 3);
    let outcomes = partner.make_reservation(&request(event_id)).await.unwrap();

    assert_eq!(partner.id(), 1);
    assert_eq!(
        outcomes,
        vec![
            ReservationOutcome {
                id: "r-1".to_string(),
                spot: "A1".to_string(),
                status: "reserved".to_string(),
            },
            ReservationOutcome {
                id: "r-2".to_string(),
                spot: "B3".to_string(),
                status: "reserved".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn only_created_counts_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let partner = partner1(server.uri(), 3);
    let err = partner
        .make_reservation(&request(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(err, PartnerError::ReservationFailed { status: 200 }));
}

#[tokio::test]
async fn breaker_opens_after_consecutive_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let partner = partner1(server.uri(), 2);
    let request = request(Uuid::new_v4());

    for _ in 0..2 {
        assert!(matches!(
            partner.make_reservation(&request).await,
            Err(PartnerError::ReservationFailed { status: 503 })
        ));
    }

    // refused locally, the server sees no third request
    assert!(matches!(
        partner.make_reservation(&request).await,
        Err(PartnerError::Unavailable)
    ));
}

#[tokio::test]
async fn client_errors_do_not_trip_the_breaker() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409))
        .expect(3)
        .mount(&server)
        .await;

    let partner = partner1(server.uri(), 1);
    let request = request(Uuid::new_v4());

    for _ in 0..3 {
        assert!(matches!(
            partner.make_reservation(&request).await,
            Err(PartnerError::ReservationFailed { status: 409 })
        ));
    }
}

#[tokio::test]
async fn unreachable_partner_is_a_transport_error() {
    // nothing listens on the discard port
    let partner = partner1("http://127.0.0.1:9".to_string(), 5);

    let err = partner
        .make_reservation(&request(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(err, PartnerError::Transport(_)));
    assert!(err.is_outage());
}

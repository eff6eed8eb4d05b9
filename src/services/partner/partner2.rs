//! Partner 2: `POST {base}/matters/{event_id}/reserve`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Partner, PartnerClient, PartnerError, ReservationOutcome, ReservationRequest};
use crate::models::TicketKind;

#[derive(Debug, Serialize)]
struct Partner2ReservationRequest<'a> {
    spots: &'a [String],
    ticket_kind: &'static str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct Partner2ReservationResponse {
    id: String,
    spot: String,
    status: String,
}

/// Partner 2 only knows "full"; every other tier is sold to it as "half".
fn wire_ticket_kind(kind: TicketKind) -> &'static str {
    match kind {
        TicketKind::Full => "full",
        TicketKind::Half => "half",
    }
}

pub struct Partner2 {
    client: PartnerClient,
}

impl Partner2 {
    pub fn new(client: PartnerClient) -> Self {
        Self { client }
    }

    pub fn build(client: PartnerClient) -> Arc<dyn Partner> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl Partner for Partner2 {
    fn id(&self) -> i32 {
        self.client.partner_id()
    }

    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationOutcome>, PartnerError> {
        let body = Partner2ReservationRequest {
            spots: &request.spots,
            ticket_kind: wire_ticket_kind(request.ticket_kind),
            email: &request.email,
        };
        let path = format!("/matters/{}/reserve", request.event_id);

        let responses: Vec<Partner2ReservationResponse> =
            self.client.post_reservation(&path, &body).await?;

        Ok(responses
            .into_iter()
            .map(|r| ReservationOutcome {
                id: r.id,
                spot: r.spot,
                status: r.status,
            })
            .collect())
    }
}

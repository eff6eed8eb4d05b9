//! Partner 1: `POST {base}/events/{event_id}/reserve`.
//!
//! Speaks the canonical field names and is the only partner that receives
//! the buyer's card token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Partner, PartnerClient, PartnerError, ReservationOutcome, ReservationRequest};

#[derive(Debug, Serialize)]
struct Partner1ReservationRequest<'a> {
    spots: &'a [String],
    ticket_kind: &'a str,
    email: &'a str,
    card_hash: &'a str,
}

// Extra fields in the response are ignored.
#[derive(Debug, Deserialize)]
struct Partner1ReservationResponse {
    id: String,
    spot: String,
    status: String,
}

pub struct Partner1 {
    client: PartnerClient,
}

impl Partner1 {
    pub fn new(client: PartnerClient) -> Self {
        Self { client }
    }

    pub fn build(client: PartnerClient) -> Arc<dyn Partner> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl Partner for Partner1 {
    fn id(&self) -> i32 {
        self.client.partner_id()
    }

    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationOutcome>, PartnerError> {
        let body = Partner1ReservationRequest {
            spots: &request.spots,
            ticket_kind: request.ticket_kind.as_str(),
            email: &request.email,
            card_hash: &request.card_hash,
        };
        let path = format!("/events/{}/reserve", request.event_id);

        let responses: Vec<Partner1ReservationResponse> =
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

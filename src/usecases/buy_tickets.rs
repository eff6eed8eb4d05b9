use serde::{Deserialize, Serialize};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::TicketDto;
use crate::{
    error::AppError,
    models::{Spot, Ticket, TicketKind},
    repository::EventRepository,
    services::partner::{PartnerFactory, ReservationRequest},
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BuyTicketsInputDto {
    pub event_id: Uuid,
    #[validate(length(min = 1))]
    pub spots: Vec<String>,
    pub ticket_kind: String,
    /// Opaque payment token, forwarded to the partner untouched.
    pub card_hash: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuyTicketsOutputDto {
    pub tickets: Vec<TicketDto>,
}

/// Sells tickets by asking the event's partner to hold the spots, then
/// recording a ticket and a reservation for every spot the partner accepted.
pub struct BuyTicketsUseCase {
    repo: Arc<dyn EventRepository>,
    partners: Arc<dyn PartnerFactory>,
}

impl BuyTicketsUseCase {
    pub fn new(repo: Arc<dyn EventRepository>, partners: Arc<dyn PartnerFactory>) -> Self {
        Self { repo, partners }
    }

    pub async fn execute(&self, input: BuyTicketsInputDto) -> Result<BuyTicketsOutputDto, AppError> {
        input.validate()?;

        let event = self.repo.get_event_by_id(input.event_id).await?;
        let kind: TicketKind = input.ticket_kind.parse()?;
        let partner = self.partners.get_partner(event.partner_id)?;

        let request = ReservationRequest {
            event_id: event.id,
            spots: input.spots,
            ticket_kind: kind,
            card_hash: input.card_hash,
            email: input.email,
        };
        let outcomes = partner.make_reservation(&request).await?;

        // Everything is looked up and validated before the first write.
        let mut held: HashMap<String, Spot> = HashMap::with_capacity(outcomes.len());
        let mut tickets = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            let spot = match held.entry(outcome.spot.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let spot = self.repo.find_spot_by_name(event.id, &outcome.spot).await?;
                    entry.insert(spot)
                }
            };

            let ticket = Ticket::new(&event, Some(&*spot), kind)?;
            spot.reserve(ticket.id)?;
            tickets.push(ticket);
        }

        if tickets.len() < request.spots.len() {
            warn!(
                event_id = %event.id,
                requested = request.spots.len(),
                accepted = tickets.len(),
                "Partner accepted only part of the requested spots"
            );
        }

        self.repo.save_purchase(&tickets).await?;

        info!(
            event_id = %event.id,
            partner_id = partner.id(),
            spots = ?held.keys().collect::<Vec<_>>(),
            "Tickets sold"
        );
        Ok(BuyTicketsOutputDto {
            tickets: tickets.iter().map(TicketDto::from).collect(),
        })
    }
}

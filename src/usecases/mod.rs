//! Application operations. Each use case borrows the shared collaborators
//! from [`AppState`](crate::AppState) and speaks in JSON-shaped DTOs.

pub mod buy_tickets;
pub mod create_event;
pub mod create_spots;
pub mod get_event;
pub mod list_events;
pub mod list_spots;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Event, Spot, Ticket};

pub use buy_tickets::{BuyTicketsInputDto, BuyTicketsOutputDto, BuyTicketsUseCase};
pub use create_event::{CreateEventInputDto, CreateEventUseCase};
pub use create_spots::{CreateSpotsInputDto, CreateSpotsOutputDto, CreateSpotsUseCase};
pub use get_event::{GetEventOutputDto, GetEventUseCase};
pub use list_events::{ListEventsOutputDto, ListEventsUseCase};
pub use list_spots::{ListSpotsOutputDto, ListSpotsUseCase};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub organization: String,
    pub rating: String,
    pub date: String,
    pub image_url: String,
    pub capacity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub partner_id: i32,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            location: event.location.clone(),
            organization: event.organization.clone(),
            rating: event.rating.to_string(),
            date: event.date.format(DATE_FORMAT).to_string(),
            image_url: event.image_url.clone(),
            capacity: event.capacity,
            price: event.price,
            partner_id: event.partner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub spot_status: String,
    pub ticket_id: Option<Uuid>,
    pub reserved: bool,
}

impl From<&Spot> for SpotDto {
    fn from(spot: &Spot) -> Self {
        Self {
            id: spot.id,
            event_id: spot.event_id,
            name: spot.name.clone(),
            spot_status: spot.status.to_string(),
            ticket_id: spot.ticket_id,
            reserved: spot.is_reserved(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDto {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub event_id: Uuid,
    pub ticket_kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&Ticket> for TicketDto {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            spot_id: ticket.spot_id,
            event_id: ticket.event_id,
            ticket_kind: ticket.kind.to_string(),
            price: ticket.price,
        }
    }
}

//! Persistence port for events, spots and tickets.
//!
//! [`postgres::PgEventRepository`] backs the running service;
//! [`memory::InMemoryEventRepository`] serves tests and database-less runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{DomainError, Event, Spot, Ticket},
};

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    /// Fails with [`AppError::EventNotFound`] for unknown ids.
    async fn get_event_by_id(&self, event_id: Uuid) -> Result<Event, AppError>;

    async fn find_spots_by_event(&self, event_id: Uuid) -> Result<Vec<Spot>, AppError>;

    /// Fails with [`AppError::SpotNotFound`] when the event has no such spot.
    async fn find_spot_by_name(&self, event_id: Uuid, name: &str) -> Result<Spot, AppError>;

    async fn create_event(&self, event: &Event) -> Result<(), AppError>;

    async fn create_spot(&self, spot: &Spot) -> Result<(), AppError>;

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), AppError>;

    /// Flips an available spot to reserved and links it to `ticket_id`.
    ///
    /// A spot that is no longer available yields
    /// [`DomainError::SpotAlreadyReserved`].
    async fn reserve_spot(&self, spot_id: Uuid, ticket_id: Uuid) -> Result<(), AppError>;

    /// Persists a batch of new spots. Backends override this to make the
    /// batch all-or-nothing. A name already used in the event yields
    /// [`DomainError::SpotNameTaken`].
    async fn create_spots(&self, spots: &[Spot]) -> Result<(), AppError> {
        for spot in spots {
            self.create_spot(spot).await?;
        }
        Ok(())
    }

    /// Reserves each ticket's spot and stores the ticket. Backends override
    /// this to make the whole purchase all-or-nothing.
    async fn save_purchase(&self, tickets: &[Ticket]) -> Result<(), AppError> {
        for ticket in tickets {
            self.reserve_spot(ticket.spot_id, ticket.id).await?;
            self.create_ticket(ticket).await?;
        }
        Ok(())
    }
}

pub(crate) fn already_reserved() -> AppError {
    AppError::Domain(DomainError::SpotAlreadyReserved)
}

pub(crate) fn name_taken() -> AppError {
    AppError::Domain(DomainError::SpotNameTaken)
}

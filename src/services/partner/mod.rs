//! Reservation partners.
//!
//! Every external provider is a variant behind the [`Partner`] trait. The
//! canonical request/outcome types live here; each variant module owns the
//! translation to its own wire schema and path convention, and all of them
//! share the HTTP plumbing in [`client`].

pub mod client;
pub mod factory;
pub mod partner1;
pub mod partner2;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketKind;

pub use client::PartnerClient;
pub use factory::{DefaultPartnerFactory, PartnerConstructor, PartnerFactory};

/// Partner-independent reservation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRequest {
    pub event_id: Uuid,
    pub spots: Vec<String>,
    pub ticket_kind: TicketKind,
    /// Opaque payment token, forwarded untouched.
    pub card_hash: String,
    pub email: String,
}

/// What a partner reports for one spot it accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationOutcome {
    pub id: String,
    pub spot: String,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum PartnerError {
    #[error("reservation failed with status code: {status}")]
    ReservationFailed { status: u16 },

    #[error("partner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("partner is temporarily unavailable")]
    Unavailable,
}

impl PartnerError {
    /// Whether the failure points at the partner being down rather than
    /// refusing this particular request. Only these trip the circuit breaker.
    pub fn is_outage(&self) -> bool {
        match self {
            PartnerError::Transport(_) => true,
            PartnerError::ReservationFailed { status } => *status >= 500,
            PartnerError::Unavailable => false,
        }
    }
}

#[async_trait]
pub trait Partner: Send + Sync {
    fn id(&self) -> i32;

    async fn make_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationOutcome>, PartnerError>;
}

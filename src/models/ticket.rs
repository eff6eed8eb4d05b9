use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{check_rules, DomainError, Event, Rule, Spot};

/// Pricing tier applied to the event's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    Half,
    Full,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Half => "half",
            TicketKind::Full => "full",
        }
    }

    pub fn price_for(&self, base: Decimal) -> Decimal {
        match self {
            TicketKind::Half => base / Decimal::TWO,
            TicketKind::Full => base,
        }
    }
}

impl FromStr for TicketKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half" => Ok(TicketKind::Half),
            "full" => Ok(TicketKind::Full),
            _ => Err(DomainError::TicketKindInvalid),
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub spot_id: Uuid,
    pub kind: TicketKind,
    pub price: Decimal,
}

/// Ticket under construction; the spot stays optional until validated.
struct Draft<'a> {
    spot: Option<&'a Spot>,
    price: Decimal,
}

fn has_spot(d: &Draft<'_>) -> bool {
    d.spot.is_some()
}

fn has_price(d: &Draft<'_>) -> bool {
    d.price > Decimal::ZERO
}

impl Ticket {
    /// Issues a ticket for `spot`, priced from the event's base price and `kind`.
    pub fn new(event: &Event, spot: Option<&Spot>, kind: TicketKind) -> Result<Self, DomainError> {
        let rules: &[Rule<Draft<'_>>] = &[
            (has_spot, DomainError::TicketSpotRequired),
            (has_price, DomainError::TicketPriceInvalid),
        ];

        let draft = Draft {
            spot,
            price: kind.price_for(event.price),
        };
        check_rules(&draft, rules)?;

        let spot = draft.spot.ok_or(DomainError::TicketSpotRequired)?;
        Ok(Ticket {
            id: Uuid::new_v4(),
            event_id: event.id,
            spot_id: spot.id,
            kind,
            price: draft.price,
        })
    }
}

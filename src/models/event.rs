use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{check_rules, DomainError, Rule, Spot, Ticket};

/// Age rating codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "L")]
    Free,
    #[serde(rename = "L10")]
    L10,
    #[serde(rename = "L12")]
    L12,
    #[serde(rename = "L14")]
    L14,
    #[serde(rename = "L16")]
    L16,
    #[serde(rename = "L18")]
    L18,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Free => "L",
            Rating::L10 => "L10",
            Rating::L12 => "L12",
            Rating::L14 => "L14",
            Rating::L16 => "L16",
            Rating::L18 => "L18",
        }
    }
}

impl FromStr for Rating {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Rating::Free),
            "L10" => Ok(Rating::L10),
            "L12" => Ok(Rating::L12),
            "L14" => Ok(Rating::L14),
            "L16" => Ok(Rating::L16),
            "L18" => Ok(Rating::L18),
            _ => Err(DomainError::RatingInvalid),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to open a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub organization: String,
    pub rating: Rating,
    pub date: DateTime<Utc>,
    pub image_url: String,
    pub capacity: i32,
    pub price: Decimal,
    pub partner_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub organization: String,
    pub rating: Rating,
    pub date: DateTime<Utc>,
    pub image_url: String,
    pub capacity: i32,
    pub price: Decimal,
    /// Selects the external partner that sells this event's tickets.
    pub partner_id: i32,
    pub spots: Vec<Spot>,
    pub tickets: Vec<Ticket>,
}

fn has_name(e: &Event) -> bool {
    !e.name.is_empty()
}

fn is_in_future(e: &Event) -> bool {
    e.date > Utc::now()
}

fn has_capacity(e: &Event) -> bool {
    e.capacity > 0
}

fn has_price(e: &Event) -> bool {
    e.price > Decimal::ZERO
}

const EVENT_RULES: &[Rule<Event>] = &[
    (has_name, DomainError::EventNameRequired),
    (is_in_future, DomainError::EventDateNotFuture),
    (has_capacity, DomainError::EventCapacityInvalid),
    (has_price, DomainError::EventPriceInvalid),
];

impl Event {
    pub fn new(input: NewEvent) -> Result<Self, DomainError> {
        let event = Event {
            id: Uuid::new_v4(),
            name: input.name,
            location: input.location,
            organization: input.organization,
            rating: input.rating,
            date: input.date,
            image_url: input.image_url,
            capacity: input.capacity,
            price: input.price,
            partner_id: input.partner_id,
            spots: Vec::new(),
            tickets: Vec::new(),
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_rules(self, EVENT_RULES)
    }

    /// Creates a spot inside this event and appends it to the spot list.
    pub fn add_spot(&mut self, name: impl Into<String>) -> Result<&Spot, DomainError> {
        let spot = Spot::new(self, name)?;
        self.spots.push(spot);
        Ok(&self.spots[self.spots.len() - 1])
    }
}

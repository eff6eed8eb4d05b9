use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{check_rules, DomainError, Event, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Reserved,
    Sold,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Reserved => "reserved",
            SpotStatus::Sold => "sold",
        }
    }
}

impl FromStr for SpotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SpotStatus::Available),
            "reserved" => Ok(SpotStatus::Reserved),
            "sold" => Ok(SpotStatus::Sold),
            other => Err(format!("unknown spot status '{other}'")),
        }
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named seat inside an event, e.g. `A1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub status: SpotStatus,
    pub ticket_id: Option<Uuid>,
}

fn name_present(s: &Spot) -> bool {
    !s.name.is_empty()
}

fn name_min_len(s: &Spot) -> bool {
    s.name.chars().count() >= 2
}

fn starts_with_capital(s: &Spot) -> bool {
    s.name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn ends_with_digit(s: &Spot) -> bool {
    s.name.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
}

fn name_max_len(s: &Spot) -> bool {
    s.name.chars().count() == 2
}

const SPOT_RULES: &[Rule<Spot>] = &[
    (name_present, DomainError::SpotNameRequired),
    (name_min_len, DomainError::SpotNameTooShort),
    (starts_with_capital, DomainError::SpotNameInvalidLetter),
    (ends_with_digit, DomainError::SpotNameInvalidDigit),
    (name_max_len, DomainError::SpotNameTooLong),
];

impl Spot {
    /// Builds an available spot belonging to `event`.
    pub fn new(event: &Event, name: impl Into<String>) -> Result<Self, DomainError> {
        let spot = Spot {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: name.into(),
            status: SpotStatus::Available,
            ticket_id: None,
        };
        spot.validate()?;
        Ok(spot)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_rules(self, SPOT_RULES)
    }

    /// Marks the spot as held by `ticket_id`. The caller must persist the change.
    pub fn reserve(&mut self, ticket_id: Uuid) -> Result<(), DomainError> {
        if self.status == SpotStatus::Reserved {
            return Err(DomainError::SpotAlreadyReserved);
        }
        self.status = SpotStatus::Reserved;
        self.ticket_id = Some(ticket_id);
        Ok(())
    }

    pub fn is_reserved(&self) -> bool {
        self.status == SpotStatus::Reserved
    }
}

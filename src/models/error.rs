use thiserror::Error;

/// Violations of the event/spot/ticket invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("event name is required")]
    EventNameRequired,
    #[error("event date must be in the future")]
    EventDateNotFuture,
    #[error("event capacity must be greater than zero")]
    EventCapacityInvalid,
    #[error("event price must be greater than zero")]
    EventPriceInvalid,
    #[error("event rating is not a known code")]
    RatingInvalid,

    #[error("spot name is required")]
    SpotNameRequired,
    #[error("spot name must have at least 2 characters")]
    SpotNameTooShort,
    #[error("spot name must start with a capital letter")]
    SpotNameInvalidLetter,
    #[error("spot name must end with a number")]
    SpotNameInvalidDigit,
    #[error("spot name must have exactly 2 characters")]
    SpotNameTooLong,
    #[error("spot is already reserved")]
    SpotAlreadyReserved,
    #[error("spot name is already taken in this event")]
    SpotNameTaken,

    #[error("number of spots must be greater than zero")]
    InvalidSpotCount,
    #[error("an event cannot hold more than {max} generated spots")]
    SpotLimitExceeded { max: usize },

    #[error("ticket spot is required")]
    TicketSpotRequired,
    #[error("ticket price must be greater than zero")]
    TicketPriceInvalid,
    #[error("ticket kind must be 'half' or 'full'")]
    TicketKindInvalid,
}

impl DomainError {
    /// Conflicts are state clashes on otherwise well-formed input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::SpotAlreadyReserved | DomainError::SpotNameTaken
        )
    }
}

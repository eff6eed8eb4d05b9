pub mod error;
pub mod event;
pub mod spot;
pub mod ticket;

pub use error::DomainError;
pub use event::{Event, NewEvent, Rating};
pub use spot::{Spot, SpotStatus};
pub use ticket::{Ticket, TicketKind};

/// A named invariant: the predicate must hold, otherwise the paired error is reported.
pub(crate) type Rule<T> = (fn(&T) -> bool, DomainError);

/// Checks rules in declaration order and reports the first one that is violated.
pub(crate) fn check_rules<T>(target: &T, rules: &[Rule<T>]) -> Result<(), DomainError> {
    match rules.iter().find(|(holds, _)| !holds(target)) {
        Some((_, err)) => Err(*err),
        None => Ok(()),
    }
}

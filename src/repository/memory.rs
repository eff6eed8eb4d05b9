use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{already_reserved, name_taken, EventRepository};
use crate::{
    error::AppError,
    models::{Event, Spot, SpotStatus, Ticket},
};

/// Process-local store. Every batch operation runs under a single write
/// lock, so concurrent purchases see each other's reservations.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn event_mut(events: &mut [Event], event_id: Uuid) -> Result<&mut Event, AppError> {
    events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or(AppError::EventNotFound(event_id))
}

fn spot_mut(events: &mut [Event], spot_id: Uuid) -> Option<&mut Spot> {
    events
        .iter_mut()
        .flat_map(|e| e.spots.iter_mut())
        .find(|s| s.id == spot_id)
}

fn sorted_spots(event: &Event) -> Vec<Spot> {
    let mut spots = event.spots.clone();
    spots.sort_by(|a, b| a.name.cmp(&b.name));
    spots
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let events = self.events.read().await;
        let mut listed: Vec<Event> = events
            .iter()
            .map(|e| Event {
                spots: sorted_spots(e),
                ..e.clone()
            })
            .collect();
        listed.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(listed)
    }

    async fn get_event_by_id(&self, event_id: Uuid) -> Result<Event, AppError> {
        let events = self.events.read().await;
        events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| Event {
                spots: sorted_spots(e),
                ..e.clone()
            })
            .ok_or(AppError::EventNotFound(event_id))
    }

    async fn find_spots_by_event(&self, event_id: Uuid) -> Result<Vec<Spot>, AppError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .find(|e| e.id == event_id)
            .map(sorted_spots)
            .unwrap_or_default())
    }

    async fn find_spot_by_name(&self, event_id: Uuid, name: &str) -> Result<Spot, AppError> {
        let events = self.events.read().await;
        events
            .iter()
            .filter(|e| e.id == event_id)
            .flat_map(|e| e.spots.iter())
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| AppError::SpotNotFound {
                event_id,
                name: name.to_string(),
            })
    }

    async fn create_event(&self, event: &Event) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        events.push(Event {
            spots: Vec::new(),
            tickets: Vec::new(),
            ..event.clone()
        });
        Ok(())
    }

    async fn create_spot(&self, spot: &Spot) -> Result<(), AppError> {
        self.create_spots(std::slice::from_ref(spot)).await
    }

    async fn create_ticket(&self, ticket: &Ticket) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        event_mut(&mut events, ticket.event_id)?
            .tickets
            .push(ticket.clone());
        Ok(())
    }

    async fn reserve_spot(&self, spot_id: Uuid, ticket_id: Uuid) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        match spot_mut(&mut events, spot_id) {
            Some(spot) if spot.status == SpotStatus::Available => {
                spot.status = SpotStatus::Reserved;
                spot.ticket_id = Some(ticket_id);
                Ok(())
            }
            _ => Err(already_reserved()),
        }
    }

    async fn create_spots(&self, spots: &[Spot]) -> Result<(), AppError> {
        let mut events = self.events.write().await;

        // check the whole batch before touching anything
        for (i, spot) in spots.iter().enumerate() {
            let event = event_mut(&mut events, spot.event_id)?;
            let stored = event.spots.iter().any(|s| s.name == spot.name);
            let repeated = spots[..i]
                .iter()
                .any(|s| s.event_id == spot.event_id && s.name == spot.name);
            if stored || repeated {
                return Err(name_taken());
            }
        }
        for spot in spots {
            event_mut(&mut events, spot.event_id)?.spots.push(spot.clone());
        }
        Ok(())
    }

    async fn save_purchase(&self, tickets: &[Ticket]) -> Result<(), AppError> {
        let mut events = self.events.write().await;

        for (i, ticket) in tickets.iter().enumerate() {
            event_mut(&mut events, ticket.event_id)?;
            let available = spot_mut(&mut events, ticket.spot_id)
                .is_some_and(|s| s.status == SpotStatus::Available);
            let repeated = tickets[..i].iter().any(|t| t.spot_id == ticket.spot_id);
            if !available || repeated {
                return Err(already_reserved());
            }
        }

        for ticket in tickets {
            if let Some(spot) = spot_mut(&mut events, ticket.spot_id) {
                spot.status = SpotStatus::Reserved;
                spot.ticket_id = Some(ticket.id);
            }
            event_mut(&mut events, ticket.event_id)?
                .tickets
                .push(ticket.clone());
        }
        Ok(())
    }
}

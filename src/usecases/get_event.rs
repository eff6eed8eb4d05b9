use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{EventDto, SpotDto, TicketDto};
use crate::{error::AppError, repository::EventRepository};

#[derive(Debug, Serialize, Deserialize)]
pub struct GetEventOutputDto {
    #[serde(flatten)]
    pub event: EventDto,
    pub spots: Vec<SpotDto>,
    pub tickets: Vec<TicketDto>,
}

pub struct GetEventUseCase {
    repo: Arc<dyn EventRepository>,
}

impl GetEventUseCase {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, event_id: Uuid) -> Result<GetEventOutputDto, AppError> {
        let event = self.repo.get_event_by_id(event_id).await?;

        Ok(GetEventOutputDto {
            event: EventDto::from(&event),
            spots: event.spots.iter().map(SpotDto::from).collect(),
            tickets: event.tickets.iter().map(TicketDto::from).collect(),
        })
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{EventDto, SpotDto};
use crate::{error::AppError, repository::EventRepository};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSpotsOutputDto {
    pub event: EventDto,
    pub spots: Vec<SpotDto>,
}

pub struct ListSpotsUseCase {
    repo: Arc<dyn EventRepository>,
}

impl ListSpotsUseCase {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, event_id: Uuid) -> Result<ListSpotsOutputDto, AppError> {
        let event = self.repo.get_event_by_id(event_id).await?;
        let spots = self.repo.find_spots_by_event(event_id).await?;

        Ok(ListSpotsOutputDto {
            event: EventDto::from(&event),
            spots: spots.iter().map(SpotDto::from).collect(),
        })
    }
}

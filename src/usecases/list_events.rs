use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::EventDto;
use crate::{error::AppError, repository::EventRepository};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEventsOutputDto {
    pub events: Vec<EventDto>,
}

pub struct ListEventsUseCase {
    repo: Arc<dyn EventRepository>,
}

impl ListEventsUseCase {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<ListEventsOutputDto, AppError> {
        let events = self.repo.list_events().await?;

        Ok(ListEventsOutputDto {
            events: events.iter().map(EventDto::from).collect(),
        })
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::SpotDto;
use crate::{error::AppError, repository::EventRepository, services::spots::generate_spots};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpotsInputDto {
    /// Filled from the path when the request arrives over HTTP.
    #[serde(default)]
    pub event_id: Uuid,
    pub number_of_spots: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSpotsOutputDto {
    pub spots: Vec<SpotDto>,
}

pub struct CreateSpotsUseCase {
    repo: Arc<dyn EventRepository>,
}

impl CreateSpotsUseCase {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreateSpotsInputDto) -> Result<CreateSpotsOutputDto, AppError> {
        let mut event = self.repo.get_event_by_id(input.event_id).await?;

        let created = generate_spots(&mut event, input.number_of_spots)?;
        self.repo.create_spots(&created).await?;

        info!(event_id = %event.id, count = created.len(), "Spots created");
        Ok(CreateSpotsOutputDto {
            spots: created.iter().map(SpotDto::from).collect(),
        })
    }
}

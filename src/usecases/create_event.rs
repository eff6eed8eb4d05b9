use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::EventDto;
use crate::{
    error::AppError,
    models::{Event, NewEvent, Rating},
    repository::EventRepository,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventInputDto {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub location: String,
    #[validate(length(max = 255))]
    pub organization: String,
    pub rating: String,
    pub date: DateTime<Utc>,
    pub capacity: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[validate(range(min = 1))]
    pub partner_id: i32,
}

pub struct CreateEventUseCase {
    repo: Arc<dyn EventRepository>,
}

impl CreateEventUseCase {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreateEventInputDto) -> Result<EventDto, AppError> {
        input.validate()?;
        let rating: Rating = input.rating.parse()?;

        let event = Event::new(NewEvent {
            name: input.name,
            location: input.location,
            organization: input.organization,
            rating,
            date: input.date,
            image_url: input.image_url,
            capacity: input.capacity,
            price: input.price,
            partner_id: input.partner_id,
        })?;

        self.repo.create_event(&event).await?;
        info!(event_id = %event.id, partner_id = event.partner_id, "Event created");

        Ok(EventDto::from(&event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DomainError;
    use crate::repository::InMemoryEventRepository;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn input() -> CreateEventInputDto {
        CreateEventInputDto {
            name: "Event Test".to_string(),
            location: "Location Test".to_string(),
            organization: "Organization Test".to_string(),
            rating: "L12".to_string(),
            date: Utc::now() + Duration::days(2),
            capacity: 100,
            image_url: "image_url".to_string(),
            price: dec!(50),
            partner_id: 1,
        }
    }

    #[tokio::test]
    async fn stores_the_new_event() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let use_case = CreateEventUseCase::new(repo.clone());

        let created = use_case.execute(input()).await.unwrap();

        let stored = repo.get_event_by_id(created.id).await.unwrap();
        assert_eq!(stored.name, "Event Test");
        assert_eq!(stored.rating, Rating::L12);
        assert_eq!(created.price, dec!(50));
        assert_eq!(created.rating, "L12");
    }

    #[tokio::test]
    async fn unknown_rating_is_a_validation_error() {
        let use_case = CreateEventUseCase::new(Arc::new(InMemoryEventRepository::new()));

        let err = use_case
            .execute(CreateEventInputDto {
                rating: "R".to_string(),
                ..input()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::RatingInvalid)));
    }

    #[tokio::test]
    async fn past_date_is_rejected_and_nothing_is_stored() {
        let repo = Arc::new(InMemoryEventRepository::new());
        let use_case = CreateEventUseCase::new(repo.clone());

        let err = use_case
            .execute(CreateEventInputDto {
                date: Utc::now() - Duration::hours(1),
                ..input()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::EventDateNotFuture)));
        assert!(repo.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partner_id_must_be_positive() {
        let use_case = CreateEventUseCase::new(Arc::new(InMemoryEventRepository::new()));

        let err = use_case
            .execute(CreateEventInputDto {
                partner_id: 0,
                ..input()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use crate::{
    error::AppError,
    usecases::{
        BuyTicketsInputDto, BuyTicketsUseCase, CreateEventInputDto, CreateEventUseCase,
        CreateSpotsInputDto, CreateSpotsUseCase, GetEventUseCase, ListEventsUseCase,
        ListSpotsUseCase,
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/buy-tickets", post(buy_tickets))
        .route("/events/{event_id}", get(get_event))
        .route("/events/{event_id}/spots", get(list_spots).post(create_spots))
}

// GET /events
async fn list_events(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let output = ListEventsUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(output))
}

// POST /events
async fn create_event(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<CreateEventInputDto>,
) -> Result<impl IntoResponse, AppError> {
    let output = CreateEventUseCase::new(state.repo.clone())
        .execute(input)
        .await?;
    Ok((StatusCode::CREATED, Json(output)))
}

// GET /events/{event_id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let output = GetEventUseCase::new(state.repo.clone())
        .execute(event_id)
        .await?;
    Ok(Json(output))
}

// GET /events/{event_id}/spots
async fn list_spots(
    State(state): State<Arc<AppState>>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let output = ListSpotsUseCase::new(state.repo.clone())
        .execute(event_id)
        .await?;
    Ok(Json(output))
}

// POST /events/{event_id}/spots
async fn create_spots(
    State(state): State<Arc<AppState>>,
    AppPath(event_id): AppPath<Uuid>,
    AppJson(input): AppJson<CreateSpotsInputDto>,
) -> Result<impl IntoResponse, AppError> {
    let input = CreateSpotsInputDto { event_id, ..input };
    let output = CreateSpotsUseCase::new(state.repo.clone())
        .execute(input)
        .await?;
    Ok((StatusCode::CREATED, Json(output)))
}

// POST /events/buy-tickets
async fn buy_tickets(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<BuyTicketsInputDto>,
) -> Result<impl IntoResponse, AppError> {
    let output = BuyTicketsUseCase::new(state.repo.clone(), state.partners.clone())
        .execute(input)
        .await?;
    Ok((StatusCode::CREATED, Json(output)))
}

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{models::DomainError, services::partner::PartnerError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// Request body or path that could not be extracted at all.
    #[error("{message}")]
    Malformed { status: StatusCode, message: String },

    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error("spot {name} not found in event {event_id}")]
    SpotNotFound { event_id: Uuid, name: String },

    #[error("partner with id {0} not found")]
    PartnerNotFound(i32),

    #[error(transparent)]
    Partner(#[from] PartnerError),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) if e.is_conflict() => StatusCode::CONFLICT,
            AppError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Malformed { status, .. } => *status,
            AppError::EventNotFound(_)
            | AppError::SpotNotFound { .. }
            | AppError::PartnerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Partner(PartnerError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Partner(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(e) if e.is_conflict() => "CONFLICT",
            AppError::Domain(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Malformed { .. } => "MALFORMED_REQUEST",
            AppError::EventNotFound(_) => "EVENT_NOT_FOUND",
            AppError::SpotNotFound { .. } => "SPOT_NOT_FOUND",
            AppError::PartnerNotFound(_) => "PARTNER_NOT_FOUND",
            AppError::Partner(_) => "PARTNER_FAILURE",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(e) => error!(error = ?e, "Database error"),
            AppError::Partner(e) => error!(error = %e, "Partner error"),
            other => warn!(error = %other, code = other.code(), "Request rejected"),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        // storage details stay in the logs
        let message = match &self {
            AppError::Database(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.code(),
                message,
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

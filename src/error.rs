use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use uuid::Uuid;

/// Refusals raised by the itinerary builder before any network call.
/// The `Display` text is what the user gets to see.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum BuilderError {
    #[error("{place_name} is already scheduled on day {day}")]
    DuplicatePlacement { place_name: String, day: u32 },

    #[error("Day {0} still has places scheduled. Remove them before deleting the day")]
    DayHasItems(u32),

    #[error("Day {0} does not exist")]
    UnknownDay(u32),

    #[error("Itinerary item {0} not found")]
    UnknownItem(Uuid),

    #[error("{0} is not a selected destination")]
    UnknownDestination(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Please add at least one place to your itinerary")]
    EmptyItinerary,

    #[error("Please select a start date for your trip")]
    MissingStartDate,

    #[error("Please provide your {0}")]
    MissingContactField(&'static str),

    #[error("Your inquiry is already being submitted")]
    SubmissionInFlight,

    #[error("This inquiry has already been submitted")]
    SessionClosed,
}

impl BuilderError {
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BuilderError::DuplicatePlacement { .. }
                | BuilderError::DayHasItems(_)
                | BuilderError::SubmissionInFlight
                | BuilderError::SessionClosed
        )
    }
}

/// Failures talking to the REST backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
}

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{0} not found")]
    NotFound(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Builder(err) if err.is_conflict() => StatusCode::CONFLICT,
            ApiError::Builder(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

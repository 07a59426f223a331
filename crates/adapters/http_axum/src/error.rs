//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventhub_domain::error::{EventHubError, RegistrationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`EventHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(EventHubError);

impl From<EventHubError> for ApiError {
    fn from(err: EventHubError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EventHubError::Validation(_) => StatusCode::BAD_REQUEST,
            EventHubError::NotFound(_)
            | EventHubError::Registration(RegistrationError::NotRegistered { .. }) => {
                StatusCode::NOT_FOUND
            }
            EventHubError::Registration(
                RegistrationError::AlreadyRegistered { .. } | RegistrationError::MaxRegistered { .. },
            ) => StatusCode::CONFLICT,
            EventHubError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EventHubError::Storage(_) | EventHubError::Cache(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            EventHubError::Validation(err) => err.to_string(),
            EventHubError::NotFound(err) => err.to_string(),
            EventHubError::Registration(err) => err.to_string(),
            EventHubError::Timeout { .. } => {
                tracing::warn!(error = %self.0, "request timed out");
                "service temporarily unavailable".to_string()
            }
            EventHubError::Storage(err) | EventHubError::Cache(err) => {
                tracing::error!(error = %err, "storage error");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

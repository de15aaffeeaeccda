use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gemini_agent::GeminiError;
use stepwise_core::StepwiseError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 401 Unauthorized errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 401 through
/// the `anyhow::Error` chain without touching the `StepwiseError` enum.
#[derive(Debug)]
struct UnauthorizedError;

impl std::fmt::Display for UnauthorizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unauthorized")
    }
}

impl std::error::Error for UnauthorizedError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 401 Unauthorized error.
    pub fn unauthorized() -> Self {
        Self(UnauthorizedError.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.downcast_ref::<UnauthorizedError>().is_some() {
            let body = serde_json::json!({ "error": "unauthorized" });
            return (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<StepwiseError>() {
            match e {
                StepwiseError::GoalNotFound(_) | StepwiseError::StepNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                StepwiseError::Forbidden => StatusCode::FORBIDDEN,
                StepwiseError::MissingField(_)
                | StepwiseError::InvalidTitle
                | StepwiseError::InvalidDeadline(_)
                | StepwiseError::DeadlineInPast => StatusCode::BAD_REQUEST,
                StepwiseError::PlanUnparsable(_)
                | StepwiseError::PlanEmpty
                | StepwiseError::Config(_)
                | StepwiseError::Db(_)
                | StepwiseError::Json(_)
                | StepwiseError::Yaml(_)
                | StepwiseError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if self.0.downcast_ref::<GeminiError>().is_some() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

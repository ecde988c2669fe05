use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("An analysis is already running for chat {0}")]
    AnalysisPending(String),

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotSignedIn => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::ChatNotFound(_) | AppError::UnknownRoute(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::AnalysisPending(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::SignInFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

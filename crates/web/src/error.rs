use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use papitop_storage::error::StorageError;
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid request body: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("no such leaderboard entry")]
    NotFound,
}

pub type WebResult<T> = Result<T, WebError>;

fn validation_details(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect()
}

impl WebError {
    fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            Self::Storage(e) if e.is_unique_violation() => {
                tracing::warn!(error = %e, "Write rejected by unique (player_uuid, papi) key");
                (
                    StatusCode::CONFLICT,
                    json!({ "error": "This player already has an entry for this papi" }),
                )
            }
            Self::Storage(e) => {
                tracing::error!(error = ?e, "Storage failure while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Leaderboard storage is unavailable" }),
                )
            }
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid request body",
                    "details": validation_details(errors),
                }),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": self.to_string() }),
            ),
            Self::NotFound => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(error: WebError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unique_violation_is_a_conflict_with_its_own_message() {
        let error = WebError::from(StorageError::ConstraintViolation(
            "duplicate key (player_uuid, papi) = (a, money)".to_string(),
        ));

        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "This player already has an entry for this papi"
        );
    }

    #[tokio::test]
    async fn test_other_storage_errors_hide_details() {
        let error = WebError::from(StorageError::Database(sqlx::Error::RowNotFound));

        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Leaderboard storage is unavailable");
    }

    #[tokio::test]
    async fn test_not_found_and_unauthorized_bodies() {
        let (status, body) = render(WebError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no such leaderboard entry");

        let (status, body) = render(WebError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing or invalid API key");
    }
}

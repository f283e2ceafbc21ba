use axum::{http::StatusCode, response::IntoResponse, Json};
use kotoba_core::SearchError;
use serde_json::json;

/// Maps the handler's failure modes onto HTTP status codes: bad input is a
/// 422, a timed-out search is a 504, anything else from the store is a 500
/// with a short diagnostic code rather than the raw `sqlx` error (which
/// could leak schema details).
pub enum AppError {
    InvalidQuery(String),
    Search(SearchError),
    TimedOut,
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Cancelled => AppError::TimedOut,
            other => AppError::Search(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            AppError::InvalidQuery(message) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_query", message),
            AppError::TimedOut => (StatusCode::GATEWAY_TIMEOUT, "timed_out", "search timed out".to_string()),
            AppError::Search(SearchError::EmptyQuery) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "empty_query", "query was empty after normalization".to_string())
            }
            AppError::Search(err) => (StatusCode::INTERNAL_SERVER_ERROR, "search_failed", err.to_string()),
        };
        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

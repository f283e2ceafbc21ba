use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use kotoba_core::{ResultRow, SearchCoordinator, Weights};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

/// Every field is a raw, optional string so this extractor can never be
/// rejected by Axum before the handler runs — missing `q` or a
/// non-numeric `limit`/`offset` must surface as our own typed 422, not
/// Axum's default plaintext rejection. All parsing and bounds validation
/// happens in `search` below.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// `GET /v1/search?q=&limit=&offset=`.
pub async fn search(
    Query(params): Query<SearchParams>,
    state: Extension<Arc<AppState>>,
) -> Result<Json<Vec<ResultRow>>, AppError> {
    let q = params
        .q
        .ok_or_else(|| AppError::InvalidQuery("q is required".to_string()))?;

    let limit = match params.limit {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::InvalidQuery("limit must be an integer".to_string()))?,
        None => 20,
    };
    if !(1..=100).contains(&limit) {
        return Err(AppError::InvalidQuery("limit must be between 1 and 100".to_string()));
    }

    let offset = match params.offset {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::InvalidQuery("offset must be an integer".to_string()))?,
        None => 0,
    };
    if offset < 0 {
        return Err(AppError::InvalidQuery("offset must not be negative".to_string()));
    }

    let coordinator = SearchCoordinator::new(&state.store, Weights::default());
    let search_future = coordinator.search(&q, limit, offset);
    let timeout = std::time::Duration::from_millis(state.request_timeout_ms);

    match tokio::time::timeout(timeout, search_future).await {
        Ok(result) => Ok(Json(result?)),
        Err(_) => Err(AppError::TimedOut),
    }
}

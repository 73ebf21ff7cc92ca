use axum::extract::{Request, State};
use axum::http::header::REFERER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::errors::ApiError;
use crate::api::plans::AppState;

/// A referer passes when it contains one of the allowed origins, ignoring case.
pub fn is_referer_allowed(referer: &str, allowed_origins: &[String]) -> bool {
    let referer = referer.to_ascii_lowercase();
    allowed_origins
        .iter()
        .any(|origin| referer.contains(&origin.to_ascii_lowercase()))
}

/// Rejects API calls coming from pages outside the allowed origins. Requests
/// without a `Referer` go through, and development skips the check entirely.
pub async fn validate_origin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.config.environment.is_development() {
        return next.run(request).await;
    }

    if let Some(referer) = request.headers().get(REFERER) {
        let referer = referer.to_str().unwrap_or_default();
        if !is_referer_allowed(referer, &state.config.allowed_origins) {
            tracing::warn!(%referer, path = %request.uri().path(), "origin.rejected");
            return ApiError::ForbiddenOrigin.into_response();
        }
    }

    next.run(request).await
}

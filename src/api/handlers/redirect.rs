//! Handler for the public redirect endpoint.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a key to its active destination.
///
/// # Endpoint
///
/// `GET /redirect/{*key}`
///
/// The key is everything after `/redirect/` and may contain slashes.
///
/// # Request Flow
///
/// 1. Look the key up in the in-memory cache
/// 2. On cache miss, query the database and cache the destination
/// 3. Return 301 Moved Permanently
///
/// Keys missing from the database are not cached, so a redirect created
/// after a 404 works on the next request.
///
/// # Errors
///
/// Returns 404 Not Found if no redirect has this key.
/// Returns 500 Internal Server Error if the database lookup fails.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    match state.resolver.resolve(&key).await? {
        Resolution::Hit(destination) | Resolution::Miss(destination) => {
            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, destination)]))
        }
        Resolution::NotFound => Err(AppError::not_found(
            "Redirect not found",
            json!({ "key": key }),
        )),
    }
}

//! Handlers for redirect management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::api::dto::redirect::{
    CreateRedirectRequest, DeleteRedirectResponse, RedirectItem, RedirectListQuery,
    RedirectListResponse, UpdateRedirectRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists redirects, optionally filtered by key substring.
///
/// # Endpoint
///
/// `GET /admin/redirects?name=promo&page=1&page_size=25`
///
/// # Errors
///
/// Returns 400 Bad Request for invalid pagination parameters.
pub async fn list_redirects_handler(
    State(state): State<AppState>,
    Query(query): Query<RedirectListQuery>,
) -> Result<Json<RedirectListResponse>, AppError> {
    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request("Invalid pagination", json!({ "reason": e })))?;

    let (items, total) = state
        .redirect_service
        .list(query.name, offset, limit)
        .await?;

    Ok(Json(RedirectListResponse {
        pagination: PaginationMeta::new(
            query.pagination.page(),
            query.pagination.page_size(),
            total,
        ),
        items: items.into_iter().map(RedirectItem::from).collect(),
    }))
}

/// Returns a single redirect.
///
/// # Endpoint
///
/// `GET /admin/redirects/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no redirect has this id, including ids that are
/// not integers.
pub async fn get_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RedirectItem>, AppError> {
    let redirect = state.redirect_service.get(parse_id(&id)?).await?;
    Ok(Json(redirect.into()))
}

/// Creates a redirect.
///
/// # Endpoint
///
/// `POST /admin/redirects`
///
/// ```json
/// { "key": "promo/spring", "active_destination": "https://example.com/spring" }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if the key already exists.
pub async fn create_redirect_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRedirectRequest>,
) -> Result<(StatusCode, Json<RedirectItem>), AppError> {
    payload.validate()?;

    let redirect = state.redirect_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(redirect.into())))
}

/// Points a redirect at a new destination.
///
/// # Endpoint
///
/// `PATCH /admin/redirects/{id}`
///
/// ```json
/// { "active_destination": "https://example.com/new" }
/// ```
///
/// # Cache
///
/// The cache entry for the key is evicted so the next redirect uses the new
/// destination.
///
/// # Errors
///
/// Returns 404 Not Found if no redirect has this id.
/// Returns 400 Bad Request if validation fails.
pub async fn update_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRedirectRequest>,
) -> Result<Json<RedirectItem>, AppError> {
    payload.validate()?;

    let redirect = state
        .redirect_service
        .update_destination(parse_id(&id)?, payload.active_destination)
        .await?;

    Ok(Json(redirect.into()))
}

/// Deletes a redirect.
///
/// # Endpoint
///
/// `DELETE /admin/redirects/{id}`
///
/// # Cache
///
/// The cache entry for the key is evicted immediately.
///
/// # Errors
///
/// Returns 404 Not Found if no redirect has this id.
pub async fn delete_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteRedirectResponse>, AppError> {
    let redirect = state.redirect_service.delete(parse_id(&id)?).await?;

    Ok(Json(DeleteRedirectResponse {
        message: "redirect successfully deleted".to_string(),
        id: redirect.id,
        key: redirect.key,
    }))
}

/// Parses the `{id}` path segment.
///
/// A segment that is not an integer cannot name any record, so it is reported
/// as not found in the standard error envelope.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found("Redirect not found", json!({ "id": raw })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound { .. })));
        assert!(matches!(parse_id(""), Err(AppError::NotFound { .. })));
        assert!(matches!(parse_id("1.5"), Err(AppError::NotFound { .. })));
    }
}

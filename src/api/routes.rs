//! Admin route configuration.
//!
//! All admin endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler,
    list_redirects_handler, update_redirect_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Redirect management routes, mounted under `/admin`.
///
/// # Endpoints
///
/// - `GET    /redirects`        - List redirects (paginated, `?name=` filter)
/// - `POST   /redirects`        - Create a redirect
/// - `GET    /redirects/{id}`   - Fetch one redirect
/// - `PATCH  /redirects/{id}`   - Change its active destination
/// - `DELETE /redirects/{id}`   - Delete it
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redirects",
            get(list_redirects_handler).post(create_redirect_handler),
        )
        .route(
            "/redirects/{id}",
            get(get_redirect_handler)
                .patch(update_redirect_handler)
                .delete(delete_redirect_handler),
        )
}

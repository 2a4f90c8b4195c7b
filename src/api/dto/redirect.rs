//! DTOs for redirect management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{NewRedirect, Redirect};

/// Request body for `POST /admin/redirects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRedirectRequest {
    /// The key clients will request under `/redirect/`.
    #[validate(length(min = 1, max = 2048))]
    pub key: String,

    /// Where the key redirects to.
    #[validate(url(message = "Invalid URL format"))]
    pub active_destination: String,
}

impl From<CreateRedirectRequest> for NewRedirect {
    fn from(r: CreateRedirectRequest) -> Self {
        NewRedirect {
            key: r.key,
            active_destination: r.active_destination,
        }
    }
}

/// Request body for `PATCH /admin/redirects/{id}`.
///
/// The current destination is kept as `previous_destination`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRedirectRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub active_destination: String,
}

/// Query parameters for `GET /admin/redirects`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct RedirectListQuery {
    /// Substring filter on the key. An empty value means no filter.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// JSON representation of a redirect record.
#[derive(Debug, Serialize)]
pub struct RedirectItem {
    pub id: i64,
    pub key: String,
    pub active_destination: String,
    pub previous_destination: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Redirect> for RedirectItem {
    fn from(r: Redirect) -> Self {
        RedirectItem {
            id: r.id,
            key: r.key,
            active_destination: r.active_destination,
            previous_destination: r.previous_destination,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Paginated list of redirects.
#[derive(Debug, Serialize)]
pub struct RedirectListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<RedirectItem>,
}

/// Confirmation returned after a delete.
#[derive(Debug, Serialize)]
pub struct DeleteRedirectResponse {
    pub message: String,
    pub id: i64,
    pub key: String,
}

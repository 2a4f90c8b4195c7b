//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectResolver, RedirectService};
use crate::domain::repositories::RedirectRepository;
use crate::infrastructure::cache::CacheStore;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RedirectResolver<dyn RedirectRepository>>,
    pub redirect_service: Arc<RedirectService<dyn RedirectRepository>>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Wires the resolver and admin service around one repository and one cache.
    pub fn new(
        repository: Arc<dyn RedirectRepository>,
        cache: Arc<CacheStore>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self {
            resolver: Arc::new(RedirectResolver::new(repository.clone(), cache.clone())),
            redirect_service: Arc::new(RedirectService::new(repository, cache.clone())),
            auth_service,
            cache,
        }
    }
}

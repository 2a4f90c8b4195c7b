#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use redirector::application::services::AuthService;
use redirector::domain::entities::{NewRedirect, Redirect};
use redirector::domain::repositories::RedirectRepository;
use redirector::error::AppError;
use redirector::infrastructure::cache::CacheStore;
use redirector::infrastructure::persistence::PgRedirectRepository;
use redirector::state::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub async fn create_test_redirect(pool: &PgPool, key: &str, destination: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO redirects (short_key, active_destination) VALUES ($1, $2) RETURNING id",
    )
    .bind(key)
    .bind(destination)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn destination_of(pool: &PgPool, key: &str) -> Option<String> {
    sqlx::query_scalar("SELECT active_destination FROM redirects WHERE short_key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await
        .unwrap()
}

fn test_auth_service() -> Arc<AuthService> {
    Arc::new(AuthService::new(ADMIN_TOKEN, "test-signing-secret".to_string()).unwrap())
}

/// State backed by PostgreSQL, for tests running under `#[sqlx::test]`.
pub fn create_test_state(pool: PgPool) -> AppState {
    let repository: Arc<dyn RedirectRepository> =
        Arc::new(PgRedirectRepository::new(Arc::new(pool)));

    AppState::new(repository, Arc::new(CacheStore::open()), test_auth_service())
}

/// State backed by an [`InMemoryRepository`], returned alongside it so tests
/// can seed records and inspect lookup counts.
pub fn create_memory_state() -> (AppState, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::default());
    let state = AppState::new(
        repository.clone(),
        Arc::new(CacheStore::open()),
        test_auth_service(),
    );
    (state, repository)
}

/// Vec-backed repository that counts `find_by_key` calls and can be switched
/// into a failing mode.
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<Vec<Redirect>>,
    lookups: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryRepository {
    pub fn insert(&self, key: &str, destination: &str) -> i64 {
        let mut records = self.records.lock().unwrap();
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        records.push(Redirect::new(
            id,
            key.to_string(),
            destination.to_string(),
            None,
            now,
            now,
        ));
        id
    }

    /// Changes the stored destination without touching any cache.
    pub fn set_destination(&self, key: &str, destination: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.key == key) {
            record.previous_destination = Some(record.active_destination.clone());
            record.active_destination = destination.to_string();
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }

    fn matching(&self, name: &Option<String>) -> Vec<Redirect> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| match name {
                Some(n) => r.key.to_lowercase().contains(&n.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RedirectRepository for InMemoryRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<Redirect>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.key == key).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Redirect>, AppError> {
        self.check_available()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, new_redirect: NewRedirect) -> Result<Redirect, AppError> {
        self.check_available()?;
        let exists = {
            let records = self.records.lock().unwrap();
            records.iter().any(|r| r.key == new_redirect.key)
        };
        if exists {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "redirects_short_key_key" }),
            ));
        }
        let id = self.insert(&new_redirect.key, &new_redirect.active_destination);
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned().unwrap())
    }

    async fn list(
        &self,
        name: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Redirect>, AppError> {
        self.check_available()?;
        Ok(self
            .matching(&name)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, name: Option<String>) -> Result<i64, AppError> {
        self.check_available()?;
        Ok(self.matching(&name).len() as i64)
    }

    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Redirect>, AppError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            record.previous_destination = Some(record.active_destination.clone());
            record.active_destination = destination;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Redirect>, AppError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap();
        let position = records.iter().position(|r| r.id == id);
        Ok(position.map(|i| records.remove(i)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

use std::sync::Arc;

use agrinit_db::kv::{KvStore, MemoryKvStore, PgKvStore};
use anyhow::Context;

use crate::auth::local::LocalAuthProvider;
use crate::auth::supabase::SupabaseAuthProvider;
use crate::auth::AuthProvider;
use crate::config::{AuthBackend, ServerConfig, StoreBackend};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Key-value store holding initiatives and profile mirrors.
    pub store: Arc<dyn KvStore>,
    /// Identity provider used by the auth gate, sign-up and login.
    pub auth: Arc<dyn AuthProvider>,
    /// Server configuration (route prefix, anon key, timeouts).
    pub config: Arc<ServerConfig>,
}

/// Connect the configured key-value store.
///
/// For PostgreSQL this creates the pool, checks connectivity and applies the
/// embedded migrations before returning.
pub async fn build_store(backend: &StoreBackend) -> anyhow::Result<Arc<dyn KvStore>> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = agrinit_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            agrinit_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            agrinit_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgKvStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}

/// Construct the configured identity provider (and its HTTP client).
pub fn build_auth_provider(backend: &AuthBackend) -> anyhow::Result<Arc<dyn AuthProvider>> {
    match backend {
        AuthBackend::Supabase {
            url,
            service_role_key,
        } => {
            let provider = SupabaseAuthProvider::new(url, service_role_key)
                .context("Failed to build auth provider HTTP client")?;
            tracing::info!(%url, "Using Supabase auth provider");
            Ok(Arc::new(provider))
        }
        AuthBackend::Local { jwt } => {
            tracing::warn!("Using local auth provider; accounts are lost on restart");
            Ok(Arc::new(LocalAuthProvider::new(jwt.clone())))
        }
    }
}

// src/lib.rs
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{
    create_account, create_transfer, get_logged_in_user, get_transfer, health_check,
    list_accounts, list_users, login, metrics_handler, register, root_handler, track_requests,
};

// Public exports (visible outside this module)
pub mod auth;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use config::*;
pub use handlers::{ApiError, ErrorResponse, LoginResponse, USERS_PAGE_SIZE};

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    init_database,
    MemoryRepository,
    PostgresRepository,
};

use auth::{require_auth, PasswordHasher, TokenService};

const DECOY_PASSWORD: &str = "kasho-login-decoy";
use domain::{MetricsPtr, RepositoryPtr};

/// Assemble the application state from the auth settings and the chosen
/// metrics and repository backends.
///
/// Hashes a decoy password once at the configured cost; logins that name an
/// unknown email are checked against it and always fail.
pub fn create_state(
    auth: &AuthConfig,
    metrics: MetricsPtr,
    repository: RepositoryPtr,
) -> Result<AppState> {
    // ---
    let tokens = TokenService::new(&auth.signing_key, auth.token_ttl)?;
    let hasher = PasswordHasher::new(auth.bcrypt_cost);
    let decoy_hash = hasher.hash(DECOY_PASSWORD)?;

    Ok(AppState::new(
        metrics,
        repository,
        Arc::new(tokens),
        hasher,
        decoy_hash,
    ))
}

/// Build the HTTP router over an already assembled state.
///
/// Protected routes sit behind the bearer-token gate; everything else is
/// public.
pub fn build_router(state: AppState) -> Router {
    // ---
    let protected = Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_logged_in_user))
        .route("/account", get(list_accounts))
        .route("/account/create", post(create_account))
        .route("/transfer/create", post(create_transfer))
        .route("/transfer/{id}", get(get_transfer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the production router: connects to PostgreSQL, runs migrations and
/// selects the metrics backend from configuration.
pub async fn create_router(config: &AppConfig) -> Result<Router> {
    // ---
    let metrics = if config.server.prometheus_metrics {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    let pool = init_database(&config.database).await?;
    let repository = create_postgres_repository(pool);

    let state = create_state(&config.auth, metrics, repository)?;

    Ok(build_router(state))
}

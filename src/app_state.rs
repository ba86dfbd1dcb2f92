//! Application state management.
//!
//! `AppState` is the dependency-injection container handed to every Axum
//! handler through the `State` extractor. It is built once at startup, never
//! mutated afterwards, and cheap to clone (every heavy member sits behind an
//! `Arc`).

use crate::auth::{PasswordHasher, TokenService};
use crate::domain::{MetricsPtr, RepositoryPtr};
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// # Fields
///
/// - `metrics`: Prometheus or no-op metrics sink
/// - `repository`: data-access layer (PostgreSQL or in-memory)
/// - `tokens`: token issuer/verifier holding the immutable signing secret
/// - `hasher`: password hasher at the configured bcrypt cost
/// - `decoy_hash`: hash checked when a login names an unknown email
#[derive(Clone)]
pub struct AppState {
    metrics: MetricsPtr,
    repository: RepositoryPtr,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    decoy_hash: Arc<str>,
}

impl AppState {
    // ---

    pub fn new(
        metrics: MetricsPtr,
        repository: RepositoryPtr,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        decoy_hash: String,
    ) -> Self {
        // ---
        AppState {
            metrics,
            repository,
            tokens,
            hasher,
            decoy_hash: decoy_hash.into(),
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the repository implementation.
    pub(crate) fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }

    /// Get a reference to the token service.
    pub(crate) fn tokens(&self) -> &TokenService {
        // ---
        &self.tokens
    }

    /// Get the password hasher.
    pub(crate) fn hasher(&self) -> PasswordHasher {
        // ---
        self.hasher
    }

    /// Hash at the configured cost that no submitted password matches.
    pub(crate) fn decoy_hash(&self) -> &str {
        // ---
        &self.decoy_hash
    }
}

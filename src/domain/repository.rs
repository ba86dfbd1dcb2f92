use super::models::{Account, Currency, Transfer, User};
use std::sync::Arc;

/// Failure signals of the data-access layer.
///
/// "Not found" is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // ---
    /// A unique constraint rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstraction over user, account and transfer persistence.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Round-trip to the store, used by the full health check.
    async fn ping(&self) -> StoreResult<()>;

    /// Create a user. Fails with `Duplicate` when the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User>;

    /// Get user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Get user by ID.
    async fn get_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>>;

    /// Page through users ordered by id.
    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>>;

    /// Replace a user's password hash and bump `updated_at`.
    async fn update_user_password(
        &self,
        user_id: i64,
        hashed_password: &str,
    ) -> StoreResult<Option<User>>;

    /// Delete a user (and, by cascade, their accounts).
    async fn delete_user(&self, user_id: i64) -> StoreResult<()>;

    /// Delete every user.
    async fn delete_all_users(&self) -> StoreResult<()>;

    /// Open an account with a zero balance. Fails with `Duplicate` when the
    /// user already holds an account in that currency.
    async fn create_account(&self, user_id: i64, currency: Currency) -> StoreResult<Account>;

    /// Get account by ID.
    async fn get_account_by_id(&self, account_id: i64) -> StoreResult<Option<Account>>;

    /// All accounts owned by a user, ordered by id.
    async fn get_accounts_by_user(&self, user_id: i64) -> StoreResult<Vec<Account>>;

    /// Record a transfer row.
    async fn create_transfer(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: f64,
    ) -> StoreResult<Transfer>;

    /// Get transfer by ID.
    async fn get_transfer_by_id(&self, transfer_id: i64) -> StoreResult<Option<Transfer>>;

    /// Transfers leaving an account.
    async fn get_transfers_by_from_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>>;

    /// Transfers arriving at an account.
    async fn get_transfers_by_to_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>>;

    /// Page through transfers ordered by id.
    async fn list_transfers(&self, limit: i64, offset: i64) -> StoreResult<Vec<Transfer>>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;

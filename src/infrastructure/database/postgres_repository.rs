use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Account, Currency, Repository, StoreError, StoreResult, Transfer, User};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        // ---
        User {
            id: r.id,
            email: r.email,
            hashed_password: r.hashed_password,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    user_id: i64,
    balance: f64,
    currency: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        // ---
        let currency = r
            .currency
            .parse::<Currency>()
            .map_err(|e| StoreError::Other(anyhow!("account {}: {e}", r.id)))?;

        Ok(Account {
            id: r.id,
            user_id: r.user_id,
            balance: r.balance,
            currency,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransferRow {
    id: i64,
    from_account_id: i64,
    to_account_id: i64,
    amount: f64,
    created_at: DateTime<Utc>,
}

impl From<TransferRow> for Transfer {
    fn from(r: TransferRow) -> Self {
        // ---
        Transfer {
            id: r.id,
            from_account_id: r.from_account_id,
            to_account_id: r.to_account_id,
            amount: r.amount,
            created_at: r.created_at,
        }
    }
}

// Unique violations (SQLSTATE 23505) become `Duplicate`; everything else is opaque.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // ---
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Other(err.into())
    }
}

const USER_COLUMNS: &str = "id, email, hashed_password, created_at, updated_at";
const ACCOUNT_COLUMNS: &str = "id, user_id, balance, currency, created_at";
const TRANSFER_COLUMNS: &str = "id, from_account_id, to_account_id, amount, created_at";

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn ping(&self) -> StoreResult<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>> {
        // ---
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_user_password(
        &self,
        user_id: i64,
        hashed_password: &str,
    ) -> StoreResult<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET hashed_password = $1, updated_at = NOW()
             WHERE id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(hashed_password)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn delete_user(&self, user_id: i64) -> StoreResult<()> {
        // ---
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_users(&self) -> StoreResult<()> {
        // ---
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(&self, user_id: i64, currency: Currency) -> StoreResult<Account> {
        // ---
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (user_id, currency) VALUES ($1, $2) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(currency.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_account_by_id(&self, account_id: i64) -> StoreResult<Option<Account>> {
        // ---
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn get_accounts_by_user(&self, user_id: i64) -> StoreResult<Vec<Account>> {
        // ---
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn create_transfer(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: f64,
    ) -> StoreResult<Transfer> {
        // ---
        let row = sqlx::query_as::<_, TransferRow>(&format!(
            "INSERT INTO transfers (from_account_id, to_account_id, amount)
             VALUES ($1, $2, $3) RETURNING {TRANSFER_COLUMNS}"
        ))
        .bind(from_account_id)
        .bind(to_account_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_transfer_by_id(&self, transfer_id: i64) -> StoreResult<Option<Transfer>> {
        // ---
        let row = sqlx::query_as::<_, TransferRow>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE id = $1"
        ))
        .bind(transfer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Transfer::from))
    }

    async fn get_transfers_by_from_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let rows = sqlx::query_as::<_, TransferRow>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE from_account_id = $1 ORDER BY id"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Transfer::from).collect())
    }

    async fn get_transfers_by_to_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let rows = sqlx::query_as::<_, TransferRow>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE to_account_id = $1 ORDER BY id"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Transfer::from).collect())
    }

    async fn list_transfers(&self, limit: i64, offset: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let rows = sqlx::query_as::<_, TransferRow>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfers ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Transfer::from).collect())
    }
}

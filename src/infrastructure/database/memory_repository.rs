//! In-process repository.
//!
//! Enforces the same contract as the PostgreSQL schema (unique email, one
//! account per user and currency, ordered listings, cascading deletes) so the
//! HTTP layer can be exercised without a database.

use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::{Account, Currency, Repository, StoreError, StoreResult, Transfer, User};

#[derive(Default)]
struct Tables {
    // ---
    next_id: i64,
    users: BTreeMap<i64, User>,
    accounts: BTreeMap<i64, Account>,
    transfers: BTreeMap<i64, Transfer>,
}

impl Tables {
    // ---
    fn allocate_id(&mut self) -> i64 {
        // ---
        self.next_id += 1;
        self.next_id
    }

    fn page<T: Clone>(rows: &BTreeMap<i64, T>, limit: i64, offset: i64) -> Vec<T> {
        // ---
        rows.values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    // ---
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        // ---
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: tables.allocate_id(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        // ---
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn list_users(&self, limit: i64, offset: i64) -> StoreResult<Vec<User>> {
        // ---
        let tables = self.tables.read().await;
        Ok(Tables::page(&tables.users, limit, offset))
    }

    async fn update_user_password(
        &self,
        user_id: i64,
        hashed_password: &str,
    ) -> StoreResult<Option<User>> {
        // ---
        let mut tables = self.tables.write().await;

        Ok(tables.users.get_mut(&user_id).map(|user| {
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, user_id: i64) -> StoreResult<()> {
        // ---
        let mut tables = self.tables.write().await;

        if tables.users.remove(&user_id).is_some() {
            let owned: Vec<i64> = tables
                .accounts
                .values()
                .filter(|a| a.user_id == user_id)
                .map(|a| a.id)
                .collect();

            tables.accounts.retain(|_, a| a.user_id != user_id);
            tables.transfers.retain(|_, t| {
                !owned.contains(&t.from_account_id) && !owned.contains(&t.to_account_id)
            });
        }

        Ok(())
    }

    async fn delete_all_users(&self) -> StoreResult<()> {
        // ---
        let mut tables = self.tables.write().await;
        tables.users.clear();
        tables.accounts.clear();
        tables.transfers.clear();
        Ok(())
    }

    async fn create_account(&self, user_id: i64, currency: Currency) -> StoreResult<Account> {
        // ---
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::Other(anyhow::anyhow!(
                "account owner {user_id} does not exist"
            )));
        }
        if tables
            .accounts
            .values()
            .any(|a| a.user_id == user_id && a.currency == currency)
        {
            return Err(StoreError::Duplicate("accounts_user_currency_key".to_string()));
        }

        let account = Account {
            id: tables.allocate_id(),
            user_id,
            balance: 0.0,
            currency,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn get_account_by_id(&self, account_id: i64) -> StoreResult<Option<Account>> {
        // ---
        Ok(self.tables.read().await.accounts.get(&account_id).cloned())
    }

    async fn get_accounts_by_user(&self, user_id: i64) -> StoreResult<Vec<Account>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_transfer(
        &self,
        from_account_id: i64,
        to_account_id: i64,
        amount: f64,
    ) -> StoreResult<Transfer> {
        // ---
        let mut tables = self.tables.write().await;

        for id in [from_account_id, to_account_id] {
            if !tables.accounts.contains_key(&id) {
                return Err(StoreError::Other(anyhow::anyhow!(
                    "transfer references missing account {id}"
                )));
            }
        }

        let transfer = Transfer {
            id: tables.allocate_id(),
            from_account_id,
            to_account_id,
            amount,
            created_at: Utc::now(),
        };
        tables.transfers.insert(transfer.id, transfer.clone());

        Ok(transfer)
    }

    async fn get_transfer_by_id(&self, transfer_id: i64) -> StoreResult<Option<Transfer>> {
        // ---
        Ok(self.tables.read().await.transfers.get(&transfer_id).cloned())
    }

    async fn get_transfers_by_from_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables
            .transfers
            .values()
            .filter(|t| t.from_account_id == account_id)
            .cloned()
            .collect())
    }

    async fn get_transfers_by_to_account(&self, account_id: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables
            .transfers
            .values()
            .filter(|t| t.to_account_id == account_id)
            .cloned()
            .collect())
    }

    async fn list_transfers(&self, limit: i64, offset: i64) -> StoreResult<Vec<Transfer>> {
        // ---
        let tables = self.tables.read().await;
        Ok(Tables::page(&tables.transfers, limit, offset))
    }
}

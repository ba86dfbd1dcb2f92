use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user as stored by the repository.
///
/// Carries the password hash, so it is never serialized directly; handlers
/// respond with [`UserResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    // ---
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    // ---
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        // ---
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Currencies an account may be opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    // ---
    USD,
    NGN,
    ZAR,
}

impl Currency {
    // ---
    pub const ALL: [Currency; 3] = [Currency::USD, Currency::NGN, Currency::ZAR];

    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Currency::USD => "USD",
            Currency::NGN => "NGN",
            Currency::ZAR => "ZAR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a currency code is outside the allowlist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

impl FromStr for Currency {
    type Err = UnsupportedCurrency;

    /// Codes are matched exactly; `usd` is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnsupportedCurrency(s.to_string()))
    }
}

/// A bank account held by one user in one currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    // ---
    pub id: i64,
    pub user_id: i64,
    pub balance: f64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

/// A recorded movement of money between two accounts.
///
/// Only the row is stored; balances are not touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    // ---
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

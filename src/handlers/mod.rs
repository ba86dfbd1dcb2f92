// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod accounts;
mod auth;
mod health;
mod metrics;
mod root;
mod shared_types;
mod transfers;
mod users;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_requests};
pub use root::root_handler;

// Registration and login
pub use auth::{login, register, LoginResponse};

// Bearer-protected handlers
pub use accounts::{create_account, list_accounts};
pub use transfers::{create_transfer, get_transfer};
pub use users::{get_logged_in_user, list_users, USERS_PAGE_SIZE};

pub use shared_types::{ApiError, ErrorResponse};

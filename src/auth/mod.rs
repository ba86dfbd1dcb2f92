//! Authentication: password hashing, identity tokens and the access gate.

mod error;
mod gate;
mod password;
mod token;

pub use error::AuthError;
pub use gate::{require_auth, AuthUser};
pub use password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{Claims, TokenError, TokenService};

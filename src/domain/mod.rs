mod metrics;
mod models;
mod repository;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose persistence abstractions and the records they return
pub use models::{Account, Currency, Transfer, UnsupportedCurrency, User, UserResponse};
pub use repository::{Repository, RepositoryPtr, StoreError, StoreResult};

//! backend-status: a single `/api/status` endpoint reporting database and
//! object-storage connectivity.
//!
//! The binary resolves an `AppConfig` once, constructs the MySQL and S3 probes,
//! and serves the router from `routes::create_router`.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod probe;
pub mod routes;
pub mod state;
pub mod status;

pub use error::CheckError;
pub use state::AppState;
pub use status::{get_status, DatabaseStatus, StatusReport, StorageStatus};

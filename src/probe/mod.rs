//! Dependency probes.
//!
//! Each probe performs exactly one read-only liveness attempt against an external
//! dependency and reports the outcome as a `CheckError` on failure. Probes are
//! constructed once at startup and shared across requests, so implementations
//! must be stateless with respect to individual checks.

mod database;
mod storage;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::error::CheckError;

pub use database::MySqlProbe;
pub use storage::S3Probe;

/// Liveness check against the relational database.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Open a fresh connection with the given parameters, run the liveness query
    /// and close the connection.
    async fn ping(&self, config: &DatabaseConfig) -> Result<(), CheckError>;
}

/// Metadata-only access check against an object storage bucket.
#[async_trait]
pub trait StorageProbe: Send + Sync {
    async fn head_bucket(&self, bucket: &str) -> Result<(), CheckError>;
}

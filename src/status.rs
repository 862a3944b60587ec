//! Status aggregation.
//!
//! `get_status` runs the database check and then the storage check, each in its
//! own failure domain, and always returns a fully populated `StatusReport`.
//! Failures are recorded in the report and logged; they never propagate.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::AppConfig;
use crate::error::CheckError;
use crate::probe::{DatabaseProbe, StorageProbe};

/// Constant backend status: if this is served, the process is up.
pub const BACKEND_RUNNING: &str = "Backend is running!";

/// Bucket name echoed when no bucket is configured
pub const BUCKET_NOT_CONFIGURED: &str = "Not Configured";

/// Outcome of the database check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected,
    Failed(CheckError),
}

impl fmt::Display for DatabaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseStatus::Connected => f.write_str("Connected"),
            DatabaseStatus::Failed(err) => write!(f, "Failed: {err}"),
        }
    }
}

impl Serialize for DatabaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of the storage check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    Accessible,
    /// No bucket configured; the probe was skipped
    Unavailable,
    Failed(CheckError),
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageStatus::Accessible => f.write_str("Accessible"),
            StorageStatus::Unavailable => f.write_str("Unavailable"),
            StorageStatus::Failed(err) => write!(f, "Failed: {err}"),
        }
    }
}

impl Serialize for StorageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Consolidated status, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    #[serde(rename = "status")]
    pub backend_status: &'static str,
    pub database_status: DatabaseStatus,
    #[serde(rename = "s3_bucket_status")]
    pub storage_status: StorageStatus,
    #[serde(rename = "database_ip", skip_serializing_if = "Option::is_none")]
    pub database_host: Option<String>,
    #[serde(rename = "s3_bucket")]
    pub storage_bucket_name: String,
}

/// Probe both dependencies and assemble the report. Never fails.
pub async fn get_status(
    config: &AppConfig,
    database: &dyn DatabaseProbe,
    storage: &dyn StorageProbe,
) -> StatusReport {
    let bucket = config.storage.bucket();

    let database_status = check_database(config, database).await;

    let storage_status = match bucket {
        Some(bucket) => check_storage(bucket, storage).await,
        None => {
            tracing::debug!("No bucket configured, skipping storage check");
            StorageStatus::Unavailable
        }
    };

    StatusReport {
        backend_status: BACKEND_RUNNING,
        database_status,
        storage_status,
        database_host: config.database.host.clone(),
        storage_bucket_name: bucket.unwrap_or(BUCKET_NOT_CONFIGURED).to_string(),
    }
}

async fn check_database(config: &AppConfig, database: &dyn DatabaseProbe) -> DatabaseStatus {
    match database.ping(&config.database).await {
        Ok(()) => {
            tracing::debug!(dependency = "database", "Database check succeeded");
            DatabaseStatus::Connected
        }
        Err(err) => {
            tracing::error!(
                dependency = "database",
                kind = err.kind(),
                host = config.database.host.as_deref().unwrap_or("<unset>"),
                error = %err,
                "Database connection failed"
            );
            DatabaseStatus::Failed(err)
        }
    }
}

async fn check_storage(bucket: &str, storage: &dyn StorageProbe) -> StorageStatus {
    match storage.head_bucket(bucket).await {
        Ok(()) => {
            tracing::debug!(dependency = "storage", bucket, "Storage check succeeded");
            StorageStatus::Accessible
        }
        Err(err) => {
            tracing::error!(
                dependency = "storage",
                kind = err.kind(),
                bucket,
                error = %err,
                "S3 bucket access failed"
            );
            StorageStatus::Failed(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Scripted probes shared by unit tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::DatabaseConfig;
    use crate::error::CheckError;
    use crate::probe::{DatabaseProbe, StorageProbe};

    pub struct FakeDatabase {
        result: Result<(), CheckError>,
        pub calls: AtomicUsize,
    }

    impl FakeDatabase {
        pub fn up() -> Self {
            Self {
                result: Ok(()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn down(err: CheckError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DatabaseProbe for FakeDatabase {
        async fn ping(&self, _config: &DatabaseConfig) -> Result<(), CheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    pub struct FakeStorage {
        result: Result<(), CheckError>,
        pub buckets: Mutex<Vec<String>>,
    }

    impl FakeStorage {
        pub fn up() -> Self {
            Self {
                result: Ok(()),
                buckets: Mutex::new(Vec::new()),
            }
        }

        pub fn down(err: CheckError) -> Self {
            Self {
                result: Err(err),
                buckets: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.buckets.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StorageProbe for FakeStorage {
        async fn head_bucket(&self, bucket: &str) -> Result<(), CheckError> {
            self.buckets.lock().unwrap().push(bucket.to_string());
            self.result.clone()
        }
    }
}

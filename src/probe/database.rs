//! MySQL liveness probe.
//!
//! Opens a dedicated connection per check (no pool), so every report reflects the
//! database's state at request time rather than the health of a cached socket.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError};
use sqlx::{ConnectOptions, Connection};

use super::DatabaseProbe;
use crate::config::DatabaseConfig;
use crate::error::CheckError;

/// Query used to confirm a connection is usable. Reads no application data.
const LIVENESS_QUERY: &str = "SELECT 1";

// MySQL server error numbers
const ER_DBACCESS_DENIED_ERROR: u16 = 1044;
const ER_ACCESS_DENIED_ERROR: u16 = 1045;
const ER_BAD_DB_ERROR: u16 = 1049;
const ER_ACCESS_DENIED_NO_PASSWORD_ERROR: u16 = 1698;

/// Probe backed by a short-lived `MySqlConnection`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlProbe;

impl MySqlProbe {
    pub fn new() -> Self {
        Self
    }

    /// Build connection options, failing fast when no host is configured.
    fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions, CheckError> {
        let host = config
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                CheckError::Misconfigured("database host is not configured".to_string())
            })?;

        let mut options = MySqlConnectOptions::new().host(host);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        if let Some(name) = &config.name {
            options = options.database(name);
        }

        Ok(options.disable_statement_logging())
    }
}

#[async_trait]
impl DatabaseProbe for MySqlProbe {
    #[tracing::instrument(name = "probe.database", level = "debug", skip_all)]
    async fn ping(&self, config: &DatabaseConfig) -> Result<(), CheckError> {
        let options = Self::connect_options(config)?;

        let mut conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(classify_sqlx_error)?;
        tracing::trace!("database connection opened");

        let result = sqlx::query(LIVENESS_QUERY).execute(&mut conn).await;

        // Close regardless of the query outcome; a failed close does not change the verdict.
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Closing database connection failed");
        }

        result.map(|_| ()).map_err(classify_sqlx_error)
    }
}

/// Map a driver error onto the failure taxonomy, keeping the driver's message.
fn classify_sqlx_error(err: sqlx::Error) -> CheckError {
    let message = err.to_string();
    match &err {
        sqlx::Error::Configuration(_) => CheckError::Misconfigured(message),
        sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            CheckError::Timeout(message)
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => CheckError::Unreachable(message),
        sqlx::Error::PoolTimedOut => CheckError::Timeout(message),
        sqlx::Error::Database(db) => {
            match db.try_downcast_ref::<MySqlDatabaseError>().map(|e| e.number()) {
                Some(
                    ER_ACCESS_DENIED_ERROR
                    | ER_DBACCESS_DENIED_ERROR
                    | ER_ACCESS_DENIED_NO_PASSWORD_ERROR,
                ) => CheckError::Rejected(message),
                Some(ER_BAD_DB_ERROR) => CheckError::Misconfigured(message),
                _ => CheckError::Other(message),
            }
        }
        _ => CheckError::Other(message),
    }
}

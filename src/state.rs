//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::probe::{DatabaseProbe, StorageProbe};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration resolved at startup and the two dependency probes.
/// Probes are trait objects so tests can substitute scripted fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: Arc<dyn DatabaseProbe>,
    pub storage: Arc<dyn StorageProbe>,
}

impl AppState {
    /// Creates a new application state from the given configuration and probes.
    pub fn new<D, S>(config: AppConfig, database: D, storage: S) -> Self
    where
        D: DatabaseProbe + 'static,
        S: StorageProbe + 'static,
    {
        Self {
            config: Arc::new(config),
            database: Arc::new(database),
            storage: Arc::new(storage),
        }
    }
}

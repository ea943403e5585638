//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, HistoryService, ProductService, ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub product_service: Arc<dyn ProductService>,
    pub history_service: Arc<dyn HistoryService>,
    pub database: Arc<Database>,
    /// Cookie attributes depend on the environment
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire all services over the given database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone());
        Self::new(&container, database, config)
    }

    /// Build state from an existing container.
    pub fn new(container: &dyn ServiceContainer, database: Arc<Database>, config: Config) -> Self {
        Self {
            auth_service: container.auth(),
            product_service: container.products(),
            history_service: container.history(),
            database,
            config: Arc::new(config),
        }
    }
}

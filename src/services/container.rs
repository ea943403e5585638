//! Service Container - centralized service access.
//!
//! Wires every service to one shared `Persistence` so the HTTP layer only ever
//! sees trait objects.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, HistoryReporter, HistoryService, ProductManager, ProductService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn history(&self) -> Arc<dyn HistoryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    product_service: Arc<dyn ProductService>,
    history_service: Arc<dyn HistoryService>,
}

impl Services {
    /// Assemble a container from already-built services (tests, embedding).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        product_service: Arc<dyn ProductService>,
        history_service: Arc<dyn HistoryService>,
    ) -> Self {
        Self {
            auth_service,
            product_service,
            history_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            product_service: Arc::new(ProductManager::new(uow.clone())),
            history_service: Arc::new(HistoryReporter::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn history(&self) -> Arc<dyn HistoryService> {
        self.history_service.clone()
    }
}

//! Unit of Work - centralized repository access.
//!
//! Services reach every repository through this trait so tests can swap the
//! whole persistence layer for mocks in one place. Product mutations and their
//! history records are written independently; a history append that fails
//! never rolls back the product change.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    HistoryRepository, HistoryStore, ProductRepository, ProductStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Get product history repository
    fn history(&self) -> Arc<dyn HistoryRepository>;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection
pub struct Persistence {
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    history_repo: Arc<HistoryStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            history_repo: Arc::new(HistoryStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn history(&self) -> Arc<dyn HistoryRepository> {
        self.history_repo.clone()
    }
}

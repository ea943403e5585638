//! Product history repository - append and date-range queries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product_history::{self, ActiveModel, Entity as HistoryEntity};
use super::entities::user::Entity as UserEntity;
use crate::domain::{DateRange, HistoryRecord, HistoryUser, NewHistoryEntry, ProductHistory, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// History repository trait for dependency injection.
///
/// The log is append-only: no update or delete.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append a record stamped with the current time
    async fn append(&self, entry: NewHistoryEntry) -> AppResult<ProductHistory>;

    /// Records inside the range (all records for `None`) joined with their
    /// acting user, newest first
    async fn find_in_range(&self, range: Option<DateRange>) -> AppResult<Vec<HistoryRecord>>;
}

/// SeaORM-backed history repository
pub struct HistoryStore {
    db: DatabaseConnection,
}

impl HistoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepository for HistoryStore {
    async fn append(&self, entry: NewHistoryEntry) -> AppResult<ProductHistory> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            action: Set(entry.action.to_string()),
            product_name: Set(entry.product_name),
            changes: Set(entry.changes),
            user_id: Set(entry.user_id),
            timestamp: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        ProductHistory::try_from(model)
    }

    async fn find_in_range(&self, range: Option<DateRange>) -> AppResult<Vec<HistoryRecord>> {
        let mut query = HistoryEntity::find();

        if let Some(range) = range {
            query = query
                .filter(product_history::Column::Timestamp.gte(range.start))
                .filter(product_history::Column::Timestamp.lt(range.end));
        }

        let rows = query
            .find_also_related(UserEntity)
            .order_by_desc(product_history::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(entry, user)| {
                let user = user.map(|u| HistoryUser::from(User::from(u)));
                Ok(HistoryRecord::new(ProductHistory::try_from(entry)?, user))
            })
            .collect()
    }
}

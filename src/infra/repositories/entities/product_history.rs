//! Product history database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{HistoryAction, ProductHistory};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// One of `add`, `update`, `delete`
    pub action: String,
    pub product_name: String,
    pub changes: String,
    pub user_id: Uuid,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ProductHistory {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let action = model
            .action
            .parse::<HistoryAction>()
            .map_err(AppError::internal)?;

        Ok(ProductHistory {
            id: model.id,
            action,
            product_name: model.product_name,
            changes: model.changes,
            user_id: model.user_id,
            timestamp: model.timestamp,
        })
    }
}

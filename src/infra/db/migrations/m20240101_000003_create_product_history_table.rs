//! Migration: Create product_history table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductHistory::Action).string_len(16).not_null())
                    .col(ColumnDef::new(ProductHistory::ProductName).string_len(255).not_null())
                    .col(ColumnDef::new(ProductHistory::Changes).text().not_null())
                    .col(ColumnDef::new(ProductHistory::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProductHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_history_user_id")
                            .from(ProductHistory::Table, ProductHistory::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Date-range queries filter on timestamp
        manager
            .create_index(
                Index::create()
                    .name("idx_product_history_timestamp")
                    .table(ProductHistory::Table)
                    .col(ProductHistory::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductHistory {
    Table,
    Id,
    Action,
    ProductName,
    Changes,
    UserId,
    Timestamp,
}

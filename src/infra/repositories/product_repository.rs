//! Product repository implementation.
//!
//! Every query is scoped to the owning user; a product belonging to someone
//! else behaves exactly like a missing one.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::config::DUPLICATE_BARCODE_MESSAGE;
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products owned by the user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Product>>;

    /// Owned products whose quantity is zero
    async fn list_out_of_stock(&self, user_id: Uuid) -> AppResult<Vec<Product>>;

    /// Find an owned product by ID
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Product>>;

    /// Find an owned product by barcode
    async fn find_by_barcode(&self, user_id: Uuid, barcode: &str) -> AppResult<Option<Product>>;

    /// Insert a product for the user
    async fn create(&self, user_id: Uuid, product: NewProduct) -> AppResult<Product>;

    /// Apply a partial update; `NotFound` if the product is not owned by the user
    async fn update(&self, id: Uuid, user_id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    /// Delete an owned product, returning what was removed
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<Product>;
}

/// SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<product::Model>> {
        ProductEntity::find_by_id(id)
            .filter(product::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

/// The only unique key on products is (user_id, barcode)
fn map_write_err(err: DbErr) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict(DUPLICATE_BARCODE_MESSAGE),
        other => other,
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::UserId.eq(user_id))
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn list_out_of_stock(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::UserId.eq(user_id))
            .filter(product::Column::Quantity.eq(0))
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.find_model(id, user_id).await?.map(Product::from))
    }

    async fn find_by_barcode(&self, user_id: Uuid, barcode: &str) -> AppResult<Option<Product>> {
        let result = ProductEntity::find()
            .filter(product::Column::UserId.eq(user_id))
            .filter(product::Column::Barcode.eq(barcode))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn create(&self, user_id: Uuid, product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(product.name),
            category: Set(product.category),
            price: Set(product.price),
            quantity: Set(product.quantity),
            barcode: Set(product.barcode),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, user_id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let existing = self
            .find_model(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(quantity) = changes.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(barcode) = changes.barcode {
            active.barcode = Set(barcode);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_err)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<Product> {
        let existing = self
            .find_model(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let result = ProductEntity::delete_by_id(existing.id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(Product::from(existing))
    }
}

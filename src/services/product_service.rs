//! Product service - owner-scoped inventory CRUD with an audit trail.
//!
//! Every successful mutation appends one history record. The append is
//! best-effort: a failure is logged and the mutation result still returned.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::DUPLICATE_BARCODE_MESSAGE;
use crate::domain::{Actor, NewHistoryEntry, NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// The actor's products, newest first
    async fn list_products(&self, actor: &Actor) -> AppResult<Vec<Product>>;

    /// The actor's products with nothing left in stock
    async fn list_out_of_stock(&self, actor: &Actor) -> AppResult<Vec<Product>>;

    async fn get_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product>;

    async fn add_product(&self, actor: &Actor, product: NewProduct) -> AppResult<Product>;

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product>;

    /// Delete and return the removed product
    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product>;
}

/// Reject mutations from the shared demo login.
fn ensure_can_mutate(actor: &Actor, verb: &str) -> AppResult<()> {
    if actor.is_demo() {
        return Err(AppError::forbidden(format!(
            "You cannot {} products in demo account. Please create a personal account to continue.",
            verb
        )));
    }
    Ok(())
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_barcode_free(
        &self,
        user_id: Uuid,
        barcode: &str,
        except: Option<Uuid>,
    ) -> AppResult<()> {
        match self.uow.products().find_by_barcode(user_id, barcode).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(AppError::conflict(DUPLICATE_BARCODE_MESSAGE))
            }
            _ => Ok(()),
        }
    }

    async fn record(&self, entry: NewHistoryEntry) {
        let action = entry.action;
        let product_name = entry.product_name.clone();

        match self.uow.history().append(entry).await {
            Ok(saved) => {
                tracing::debug!(history_id = %saved.id, action = %action, "History recorded");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    action = %action,
                    product_name = %product_name,
                    "Failed to record product history"
                );
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list_products(&self, actor: &Actor) -> AppResult<Vec<Product>> {
        self.uow.products().list_for_user(actor.id).await
    }

    async fn list_out_of_stock(&self, actor: &Actor) -> AppResult<Vec<Product>> {
        self.uow.products().list_out_of_stock(actor.id).await
    }

    async fn get_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_for_user(id, actor.id)
            .await?
            .ok_or_not_found()
    }

    async fn add_product(&self, actor: &Actor, product: NewProduct) -> AppResult<Product> {
        ensure_can_mutate(actor, "add")?;
        product.validate()?;
        self.ensure_barcode_free(actor.id, &product.barcode, None)
            .await?;

        let created = self.uow.products().create(actor.id, product).await?;
        tracing::info!(user_id = %actor.id, product_id = %created.id, "Product added");

        self.record(NewHistoryEntry::added(&created, actor.id)).await;
        Ok(created)
    }

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        ensure_can_mutate(actor, "modify")?;
        changes.validate()?;

        let current = self.get_product(actor, id).await?;
        if let Some(barcode) = changes.barcode.as_deref() {
            if barcode != current.barcode {
                self.ensure_barcode_free(actor.id, barcode, Some(id)).await?;
            }
        }

        let updated = self.uow.products().update(id, actor.id, changes).await?;
        tracing::info!(user_id = %actor.id, product_id = %updated.id, "Product updated");

        self.record(NewHistoryEntry::updated(&updated, actor.id))
            .await;
        Ok(updated)
    }

    async fn delete_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product> {
        ensure_can_mutate(actor, "delete")?;

        let deleted = self.uow.products().delete(id, actor.id).await?;
        tracing::info!(user_id = %actor.id, product_id = %deleted.id, "Product deleted");

        self.record(NewHistoryEntry::deleted(&deleted, actor.id))
            .await;
        Ok(deleted)
    }
}

//! Product history audit records.
//!
//! History is append-only: records are created alongside product mutations
//! and never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::product::Product;
use super::user::User;
use crate::config::{ACTION_ADD, ACTION_DELETE, ACTION_UPDATE};

/// Kind of product mutation recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Add,
    Update,
    Delete,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Add => ACTION_ADD,
            HistoryAction::Update => ACTION_UPDATE,
            HistoryAction::Delete => ACTION_DELETE,
        }
    }
}

impl std::str::FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ACTION_ADD => Ok(HistoryAction::Add),
            ACTION_UPDATE => Ok(HistoryAction::Update),
            ACTION_DELETE => Ok(HistoryAction::Delete),
            other => Err(format!("unknown history action: {}", other)),
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHistory {
    pub id: Uuid,
    pub action: HistoryAction,
    pub product_name: String,
    pub changes: String,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// History entry about to be appended; the timestamp is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub action: HistoryAction,
    pub product_name: String,
    pub changes: String,
    pub user_id: Uuid,
}

impl NewHistoryEntry {
    pub fn added(product: &Product, user_id: Uuid) -> Self {
        Self {
            action: HistoryAction::Add,
            product_name: product.name.clone(),
            changes: format!(
                "Product added with category: {}, price: {}, quantity: {}",
                product.category, product.price, product.quantity
            ),
            user_id,
        }
    }

    pub fn updated(product: &Product, user_id: Uuid) -> Self {
        Self {
            action: HistoryAction::Update,
            product_name: product.name.clone(),
            changes: format!(
                "Product updated with new category: {}, price: {}, quantity: {}",
                product.category, product.price, product.quantity
            ),
            user_id,
        }
    }

    pub fn deleted(product: &Product, user_id: Uuid) -> Self {
        Self {
            action: HistoryAction::Delete,
            product_name: product.name.clone(),
            changes: "Product deleted".to_string(),
            user_id,
        }
    }
}

/// Acting user as embedded in history responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<User> for HistoryUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

/// History entry joined with its acting user (None if the user no longer exists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: Uuid,
    pub action: HistoryAction,
    #[schema(example = "Wireless Mouse")]
    pub product_name: String,
    #[schema(example = "Product added with category: Electronics, price: 24.99, quantity: 12")]
    pub changes: String,
    pub user_id: Uuid,
    pub user: Option<HistoryUser>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(entry: ProductHistory, user: Option<HistoryUser>) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            product_name: entry.product_name,
            changes: entry.changes,
            user_id: entry.user_id,
            user,
            timestamp: entry.timestamp,
        }
    }

    /// Email of the acting user, if it could be resolved
    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

//! Product domain entity and mutation payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub id: Uuid,
    #[schema(example = "Wireless Mouse")]
    pub name: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = 24.99)]
    pub price: f64,
    #[schema(example = 12)]
    pub quantity: i32,
    #[schema(example = "0123456789012")]
    pub barcode: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a product
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255, message = "Product name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Category must be between 1 and 255 characters"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 255, message = "Barcode must be between 1 and 255 characters"))]
    pub barcode: String,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductChanges {
    #[validate(length(min = 1, max = 255, message = "Product name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Category must be between 1 and 255 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(length(min = 1, max = 255, message = "Barcode must be between 1 and 255 characters"))]
    pub barcode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_rules() {
        let mut product = NewProduct {
            name: "Mouse".to_string(),
            category: "Electronics".to_string(),
            price: 0.0,
            quantity: 0,
            barcode: "123".to_string(),
        };
        assert!(product.validate().is_ok());

        product.price = -1.0;
        assert!(product.validate().is_err());

        product.price = 1.0;
        product.name = String::new();
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_text_fields_are_bounded() {
        let mut product = NewProduct {
            name: "x".repeat(255),
            category: "Electronics".to_string(),
            price: 1.0,
            quantity: 1,
            barcode: "123".to_string(),
        };
        assert!(product.validate().is_ok());

        product.name = "x".repeat(40_000);
        let errors = product.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let changes = ProductChanges {
            barcode: Some("9".repeat(256)),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_changes_rules_skip_absent_fields() {
        assert!(ProductChanges::default().validate().is_ok());

        let changes = ProductChanges {
            quantity: Some(-3),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Mouse".to_string(),
            category: "Electronics".to_string(),
            price: 10.0,
            quantity: 0,
            barcode: "123".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
    }
}

//! Product row and write payload for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A persisted product row.
///
/// `id` and `created_at` are assigned by the backend at insertion, exactly
/// once, and are never written by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// The backend stores `numeric` and puts a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Write payload: a product minus the server-assigned fields.
///
/// Used verbatim for inserts; updates send the same shape against an id
/// filter. A `None` description is omitted entirely so an update leaves the
/// stored value untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decimal(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_product_deserializes_backend_row() {
        let row = json!({
            "id": 3,
            "name": "Widget",
            "price": 9.99,
            "description": null,
            "created_at": "2024-05-01T12:00:00+00:00"
        });

        let product: Product = serde_json::from_value(row).expect("deserialize row");
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, decimal("9.99"));
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_product_deserializes_without_description_key() {
        let row = json!({
            "id": 1,
            "name": "Widget",
            "price": 5,
            "created_at": "2024-05-01T12:00:00+00:00"
        });

        let product: Product = serde_json::from_value(row).expect("deserialize row");
        assert_eq!(product.price, decimal("5"));
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_new_product_serializes_price_as_number() {
        let input = NewProduct {
            name: "Widget".to_owned(),
            price: decimal("9.99"),
            description: None,
        };

        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(value, json!({"name": "Widget", "price": 9.99}));
    }

    #[test]
    fn test_new_product_never_carries_server_fields() {
        let input = NewProduct {
            name: "Widget".to_owned(),
            price: decimal("1.50"),
            description: Some("blue".to_owned()),
        };

        let value = serde_json::to_value(&input).expect("serialize");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["description", "name", "price"]);
    }
}

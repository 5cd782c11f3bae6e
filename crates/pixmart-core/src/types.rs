//! # Domain Types
//!
//! Document types used throughout Pixmart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Document Types                                  │
//! │                                                                         │
//! │  ┌──────────────────────┐            ┌──────────────────────┐          │
//! │  │       Product        │            │      Order<P>        │          │
//! │  │  ──────────────────  │            │  ──────────────────  │          │
//! │  │  id                  │◄───────────│  products: Vec<P>    │          │
//! │  │  likes               │  reference │  buyer_email         │          │
//! │  │  urls / links / user │            │  status              │          │
//! │  │  tags: Vec<Tag>      │            │  id                  │          │
//! │  └──────────────────────┘            └──────────────────────┘          │
//! │                                                                         │
//! │  Order<String>  = stored form (raw product ids)                        │
//! │  Order<Product> = populated form (ids replaced by documents)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialized Shape
//! Field names follow the stored document shape: products use snake_case
//! (`alt_description`, `first_name`), orders use camelCase (`buyerEmail`).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Generates a fresh document identifier.
///
/// UUID v7 strings sort by creation time, so "ascending id" is also
/// "oldest first".
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// Image URLs for a product, one per rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUrls {
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Canonical links for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLinks {
    /// API link to the product itself.
    #[serde(rename = "self")]
    pub self_link: String,
    /// Human-facing page.
    pub html: String,
}

/// The creator a product is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUser {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    pub username: String,
}

/// A single tag on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Tag {
            title: title.into(),
        }
    }
}

/// A product document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, generated at creation, never changes.
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub alt_description: Option<String>,

    pub likes: i64,

    pub urls: ProductUrls,

    pub links: ProductLinks,

    pub user: ProductUser,

    /// Tags in insertion order.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Product {
    /// Checks whether any tag title equals `title` exactly.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|tag| tag.title == title)
    }
}

/// Fields accepted when creating a product.
///
/// Everything except the identifier, which the repository generates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub likes: i64,
    pub urls: ProductUrls,
    pub links: ProductLinks,
    pub user: ProductUser,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl NewProduct {
    /// Parses creation input from a raw JSON document.
    ///
    /// ## Returns
    /// * `Err(ValidationError::InvalidDocument)` - missing required key,
    ///   wrong type, or unknown key
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Builds the stored document under the given identifier.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            description: self.description,
            alt_description: self.alt_description,
            likes: self.likes,
            urls: self.urls,
            links: self.links,
            user: self.user,
            tags: self.tags,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Order has been placed.
    #[default]
    Created,
    /// Order is being processed.
    Pending,
    /// Order has been fulfilled.
    Completed,
}

impl OrderStatus {
    /// Every status, in declaration order.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Created,
        OrderStatus::Pending,
        OrderStatus::Completed,
    ];

    /// Returns the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order document.
///
/// `P` is the element type of `products`: a raw product id (`String`) as
/// stored, or a full [`Product`] once populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order<P = String> {
    /// Unique identifier, generated at creation, never changes.
    pub id: String,

    pub buyer_email: String,

    /// Referenced products, in order. Non-owning.
    pub products: Vec<P>,

    #[serde(default)]
    pub status: OrderStatus,
}

/// An order whose product references have been resolved.
pub type PopulatedOrder = Order<Product>;

impl Order<String> {
    /// Swaps the raw id list for resolved documents, keeping everything else.
    pub fn with_products(self, products: Vec<Product>) -> PopulatedOrder {
        Order {
            id: self.id,
            buyer_email: self.buyer_email,
            products,
            status: self.status,
        }
    }
}

/// Fields accepted when creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrder {
    pub buyer_email: String,
    pub products: Vec<String>,
    /// Defaults to [`OrderStatus::Created`] when absent.
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl NewOrder {
    pub fn new(buyer_email: impl Into<String>, products: Vec<String>) -> Self {
        NewOrder {
            buyer_email: buyer_email.into(),
            products,
            status: None,
        }
    }

    /// Parses creation input from a raw JSON document.
    ///
    /// An unknown status string fails here, before anything is stored.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Builds the stored document under the given identifier.
    pub fn into_order(self, id: String) -> Order {
        Order {
            id,
            buyer_email: self.buyer_email,
            products: self.products,
            status: self.status.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Created);
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = NewOrder::new("a@b.c", vec!["p1".to_string()]).into_order("o1".to_string());
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "o1",
                "buyerEmail": "a@b.c",
                "products": ["p1"],
                "status": "CREATED"
            })
        );
    }

    #[test]
    fn test_new_order_rejects_unknown_status() {
        let result = NewOrder::from_json(json!({
            "buyerEmail": "a@b.c",
            "products": [],
            "status": "SHIPPED"
        }));
        assert!(matches!(result, Err(ValidationError::InvalidDocument { .. })));
    }

    #[test]
    fn test_new_order_requires_products_key() {
        let result = NewOrder::from_json(json!({ "buyerEmail": "a@b.c" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_product_from_json() {
        let product = NewProduct::from_json(json!({
            "likes": 3,
            "urls": { "regular": "r", "small": "s", "thumb": "t" },
            "links": { "self": "api", "html": "page" },
            "user": { "id": "u1", "first_name": "Ada", "username": "ada" },
            "tags": [{ "title": "nature" }]
        }))
        .unwrap()
        .into_product("p1".to_string());

        assert_eq!(product.links.self_link, "api");
        assert_eq!(product.user.last_name, None);
        assert!(product.has_tag("nature"));
        assert!(!product.has_tag("Nature"));
    }

    #[test]
    fn test_new_product_missing_likes() {
        let result = NewProduct::from_json(json!({
            "urls": { "regular": "r", "small": "s", "thumb": "t" },
            "links": { "self": "api", "html": "page" },
            "user": { "id": "u1", "first_name": "Ada", "username": "ada" }
        }));
        assert!(matches!(result, Err(ValidationError::InvalidDocument { .. })));
    }

    #[test]
    fn test_generated_ids_are_unique_and_ordered() {
        let first = generate_id();
        let second = generate_id();
        assert_ne!(first, second);
        assert!(first < second);

        let parsed = Uuid::parse_str(&first).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }
}

//! # Patches
//!
//! Typed partial updates applied by `edit`.
//!
//! A patch is a set of optional fields. `apply` overwrites exactly the fields
//! that are present; nested records are replaced whole, never merged. Patches
//! parsed from JSON reject unknown keys, so `id` cannot be rewritten.
//!
//! ```text
//! stored:  { likes: 3, urls: {regular: a, small: b, thumb: c}, ... }
//! patch:   { urls: {regular: x, small: y, thumb: z} }
//! result:  { likes: 3, urls: {regular: x, small: y, thumb: z}, ... }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::types::{Order, OrderStatus, Product, ProductLinks, ProductUrls, ProductUser, Tag};

/// Reads a present key as `Some(value)`, so `null` becomes `Some(None)`
/// while an absent key stays `None` through `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Product Patch
// =============================================================================

/// Partial update for a [`Product`].
///
/// `description` and `alt_description` are doubly optional: the outer
/// `Option` says whether to touch the field, the inner one is the new value
/// (`None` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<ProductUrls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ProductLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ProductUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ProductPatch {
    /// Parses a patch from raw JSON changes.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &ProductPatch::default()
    }

    /// Overwrites every present field on `product`.
    pub fn apply(self, product: &mut Product) {
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(alt_description) = self.alt_description {
            product.alt_description = alt_description;
        }
        if let Some(likes) = self.likes {
            product.likes = likes;
        }
        if let Some(urls) = self.urls {
            product.urls = urls;
        }
        if let Some(links) = self.links {
            product.links = links;
        }
        if let Some(user) = self.user {
            product.user = user;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
    }
}

// =============================================================================
// Order Patch
// =============================================================================

/// Partial update for an [`Order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderPatch {
    /// Parses a patch from raw JSON changes.
    ///
    /// ## Example
    /// ```rust
    /// use pixmart_core::OrderPatch;
    /// use serde_json::json;
    ///
    /// assert!(OrderPatch::from_json(json!({ "status": "PENDING" })).is_ok());
    /// assert!(OrderPatch::from_json(json!({ "status": "INVALID" })).is_err());
    /// assert!(OrderPatch::from_json(json!({ "id": "other" })).is_err());
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Sets the status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the referenced product list.
    pub fn products(mut self, products: Vec<String>) -> Self {
        self.products = Some(products);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &OrderPatch::default()
    }

    /// Overwrites every present field on a stored (unpopulated) order.
    pub fn apply(self, order: &mut Order) {
        if let Some(buyer_email) = self.buyer_email {
            order.buyer_email = buyer_email;
        }
        if let Some(products) = self.products {
            order.products = products;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

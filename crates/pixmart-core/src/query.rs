//! # List Options
//!
//! Filter and pagination settings for `list` operations.
//!
//! Results are always ordered by ascending `id`, then windowed:
//!
//! ```text
//! matches (ascending id):  [0] [1] ... [9] [10] ... [19] [20] ...
//!                           └─ offset=10 ─┘ └─ limit=10 ─┘
//! ```
//!
//! A `limit` of `0` means "no limit".

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::OrderStatus;
use crate::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET};

fn default_offset() -> u32 {
    DEFAULT_LIST_OFFSET
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

/// The skip/take window shared by both list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// How many entries to take, or `None` for all remaining.
    pub fn take(&self) -> Option<u32> {
        (self.limit > 0).then_some(self.limit)
    }
}

// =============================================================================
// Product List Options
// =============================================================================

/// Options for listing products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductListOptions {
    #[serde(default = "default_offset")]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Keep only products with a tag whose title equals this exactly.
    #[serde(default)]
    pub tag: Option<String>,
}

impl Default for ProductListOptions {
    fn default() -> Self {
        ProductListOptions {
            offset: DEFAULT_LIST_OFFSET,
            limit: DEFAULT_LIST_LIMIT,
            tag: None,
        }
    }
}

impl ProductListOptions {
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn page(&self) -> Page {
        Page {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

// =============================================================================
// Order List Options
// =============================================================================

/// Options for listing orders. Filters combine with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderListOptions {
    #[serde(default = "default_offset")]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Keep only orders whose `products` contain this id.
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl Default for OrderListOptions {
    fn default() -> Self {
        OrderListOptions {
            offset: DEFAULT_LIST_OFFSET,
            limit: DEFAULT_LIST_LIMIT,
            product_id: None,
            status: None,
        }
    }
}

impl OrderListOptions {
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn page(&self) -> Page {
        Page {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

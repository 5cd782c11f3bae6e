//! # Repository Module
//!
//! Document repositories for Pixmart.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.orders().get(id)                                           │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create / list / get / edit / destroy                              │
//! │  └── populate ──────────────┐                                          │
//! │       │                     ▼                                           │
//! │       │               ProductRepository                                │
//! │       │               ├── create / list / get / edit / destroy         │
//! │       │               └── get_many (batch lookup)                      │
//! │       ▼                     │                                           │
//! │  SQLite: orders, order_products, products                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product documents
//! - [`OrderRepository`](order::OrderRepository) - Order documents and
//!   product reference population

use pixmart_core::Page;
use sqlx::{QueryBuilder, Sqlite};

pub mod order;
pub mod product;

/// Appends `LIMIT ? OFFSET ?` for a page.
///
/// SQLite reads a negative LIMIT as "no limit".
pub(crate) fn push_page(query: &mut QueryBuilder<'_, Sqlite>, page: Page) {
    let limit = page.take().map(i64::from).unwrap_or(-1);

    query
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(i64::from(page.offset));
}

//! # pixmart-core: Pure Domain Logic for Pixmart
//!
//! Document types and the rules around them, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pixmart Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (service, CLI, tests)                 │   │
//! │  │        db.orders().get(id), db.products().list(options)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               pixmart-db (Storage Layer)                        │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pixmart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   patch   │  │   query   │  │ populate  │  │   │
//! │  │   │  Product  │  │  Product- │  │  List-    │  │ reassem-  │  │   │
//! │  │   │  Order<P> │  │  OrderPat │  │  Options  │  │   ble     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Documents (`Product`, `Order<P>`) and creation inputs
//! - [`patch`] - Typed partial updates used by `edit`
//! - [`query`] - List filters and pagination
//! - [`populate`] - Order-preserving reference reassembly
//! - [`validation`] - Required-field rules
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use pixmart_core::{NewOrder, OrderStatus};
//!
//! let order = NewOrder::new("ada@example.com", vec!["p1".to_string()])
//!     .into_order(pixmart_core::generate_id());
//!
//! assert_eq!(order.status, OrderStatus::Created);
//! assert!(pixmart_core::validation::validate_order(&order).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod patch;
pub mod populate;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use patch::{OrderPatch, ProductPatch};
pub use query::{OrderListOptions, Page, ProductListOptions};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Entries skipped by `list` when no offset is given.
pub const DEFAULT_LIST_OFFSET: u32 = 0;

/// Entries returned by `list` when no limit is given.
pub const DEFAULT_LIST_LIMIT: u32 = 25;

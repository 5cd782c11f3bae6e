//! # Order Repository
//!
//! Database operations for orders and their product references.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Read/Write Paths                            │
//! │                                                                         │
//! │  create(new)                                                           │
//! │     └── validate → INSERT order + index rows → populate                │
//! │                                                                         │
//! │  get(id)                                                               │
//! │     └── SELECT order → populate                                        │
//! │                                                                         │
//! │  edit(id, patch)                                                       │
//! │     └── SELECT raw order → apply patch → validate                      │
//! │         → UPDATE order + rewrite index rows → populate                 │
//! │                                                                         │
//! │  list(options)                                                         │
//! │     └── SELECT orders (raw ids, never populated)                       │
//! │                                                                         │
//! │  destroy(id)                                                           │
//! │     └── DELETE order (index rows cascade, products untouched)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Population
//! The stored order always keeps raw product ids. Population happens on the
//! way out: one batch lookup through [`ProductRepository`], then an indexed
//! reassembly that keeps the original order and drops ids that no longer
//! resolve. A failure during population does not undo the write before it.
//!
//! ## Product Index
//! `orders.products` is mirrored into `order_products` (one row per
//! position) so the `productId` filter is an indexed lookup. Both are written
//! in the same transaction.

use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use pixmart_core::populate::{distinct_ids, missing_ids, reassemble};
use pixmart_core::validation::validate_order;
use pixmart_core::{
    generate_id, NewOrder, Order, OrderListOptions, OrderPatch, OrderStatus, PopulatedOrder,
};

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use crate::repository::push_page;

const SELECT_ORDERS: &str = r#"
    SELECT
        id,
        buyer_email,
        products,
        status
    FROM orders
"#;

/// Row shape of the `orders` table.
#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    buyer_email: String,
    products: Json<Vec<String>>,
    status: OrderStatus,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            buyer_email: row.buyer_email,
            products: row.products.0,
            status: row.status,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    products: ProductRepository,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    ///
    /// ## Arguments
    /// * `pool` - Pool holding the `orders` collection
    /// * `products` - Used to resolve product references
    pub fn new(pool: SqlitePool, products: ProductRepository) -> Self {
        OrderRepository { pool, products }
    }

    /// Creates an order and returns it populated.
    ///
    /// `status` defaults to `CREATED`. Referenced products are not required
    /// to exist.
    ///
    /// ## Returns
    /// * `Ok(PopulatedOrder)` - Stored order with resolvable products
    /// * `Err(DbError::Validation)` - Empty `buyerEmail` or malformed id
    pub async fn create(&self, new_order: NewOrder) -> DbResult<PopulatedOrder> {
        let order = new_order.into_order(generate_id());
        validate_order(&order)?;

        debug!(
            id = %order.id,
            status = %order.status,
            products = order.products.len(),
            "Creating order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, buyer_email, products, status)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&order.id)
        .bind(&order.buyer_email)
        .bind(Json(&order.products))
        .bind(order.status)
        .execute(&mut *tx)
        .await?;

        replace_product_index(&mut tx, &order).await?;
        tx.commit().await?;

        self.populate(order).await
    }

    /// Lists orders ordered by ascending id.
    ///
    /// Returned orders carry raw product ids; they are NOT populated.
    pub async fn list(&self, options: &OrderListOptions) -> DbResult<Vec<Order>> {
        debug!(
            offset = options.offset,
            limit = options.limit,
            product_id = ?options.product_id,
            status = ?options.status,
            "Listing orders"
        );

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_ORDERS);
        let mut conjunction = " WHERE ";

        if let Some(product_id) = &options.product_id {
            query
                .push(conjunction)
                .push("id IN (SELECT order_id FROM order_products WHERE product_id = ")
                .push_bind(product_id.clone())
                .push(")");
            conjunction = " AND ";
        }

        if let Some(status) = options.status {
            query.push(conjunction).push("status = ").push_bind(status);
        }

        query.push(" ORDER BY id ASC");
        push_page(&mut query, options.page());

        let rows: Vec<OrderRow> = query.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "List returned orders");
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Gets an order by ID with its products populated.
    ///
    /// ## Returns
    /// * `Ok(Some(PopulatedOrder))` - Order found
    /// * `Ok(None)` - Order not found
    pub async fn get(&self, id: &str) -> DbResult<Option<PopulatedOrder>> {
        match self.find_raw(id).await? {
            Some(order) => Ok(Some(self.populate(order).await?)),
            None => Ok(None),
        }
    }

    /// Gets an order by ID exactly as stored (raw product ids).
    pub async fn find_raw(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDERS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Order::from))
    }

    /// Applies a patch to an existing order and returns it populated.
    ///
    /// The patch is applied to the raw stored form, so resolved documents
    /// never end up persisted in place of ids. An empty patch writes nothing.
    ///
    /// ## Returns
    /// * `Ok(Some(PopulatedOrder))` - The updated order
    /// * `Ok(None)` - No order with this id
    /// * `Err(DbError::Validation)` - The patched order is invalid;
    ///   nothing is written
    pub async fn edit(&self, id: &str, patch: OrderPatch) -> DbResult<Option<PopulatedOrder>> {
        let Some(mut order) = self.find_raw(id).await? else {
            debug!(id = %id, "Edit skipped, order not found");
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(self.populate(order).await?));
        }

        let products_changed = patch.products.is_some();
        patch.apply(&mut order);
        validate_order(&order)?;

        debug!(id = %id, status = %order.status, "Updating order");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                buyer_email = ?2,
                products = ?3,
                status = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&order.id)
        .bind(&order.buyer_email)
        .bind(Json(&order.products))
        .bind(order.status)
        .execute(&mut *tx)
        .await?;

        // Deleted between read and write; dropping tx rolls back
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if products_changed {
            replace_product_index(&mut tx, &order).await?;
        }
        tx.commit().await?;

        Ok(Some(self.populate(order).await?))
    }

    /// Deletes an order.
    ///
    /// Never touches the referenced products.
    ///
    /// ## Returns
    /// Number of deleted documents (0 or 1).
    pub async fn destroy(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts total orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Replaces product ids with product documents.
    ///
    /// All references are resolved before returning. Ids without a
    /// matching product are dropped.
    pub async fn populate(&self, order: Order) -> DbResult<PopulatedOrder> {
        let fetched = self
            .products
            .get_many(&distinct_ids(&order.products))
            .await?;
        let resolved = reassemble(&order.products, fetched);

        if resolved.len() < order.products.len() {
            debug!(
                id = %order.id,
                missing = ?missing_ids(&order.products, &resolved),
                "Dropped unresolvable product references"
            );
        }

        Ok(order.with_products(resolved))
    }
}

/// Rewrites the `order_products` index rows for one order.
async fn replace_product_index(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    sqlx::query("DELETE FROM order_products WHERE order_id = ?1")
        .bind(&order.id)
        .execute(&mut *conn)
        .await?;

    // json_each yields the array index as `key`
    sqlx::query(
        r#"
        INSERT INTO order_products (order_id, position, product_id)
        SELECT ?1, key, value FROM json_each(?2)
        "#,
    )
    .bind(&order.id)
    .bind(Json(&order.products))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::new_product;
    use pixmart_core::{Product, ValidationError};
    use serde_json::json;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product(db: &Database, likes: i64) -> Product {
        db.products().create(new_product(likes, &[])).await.unwrap()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_populates_in_order() {
        let db = db().await;
        let p1 = product(&db, 1).await;
        let p2 = product(&db, 2).await;

        let order = db
            .orders()
            .create(NewOrder::new(
                "ada@example.com",
                vec![p2.id.clone(), p1.id.clone()],
            ))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.products, vec![p2, p1]);
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_status() {
        let db = db().await;
        let input = NewOrder::from_json(json!({
            "buyerEmail": "ada@example.com",
            "products": [],
            "status": "PENDING"
        }))
        .unwrap();

        let order = db.orders().create(input).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.products.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_buyer_email() {
        let db = db().await;
        let err = db
            .orders()
            .create(NewOrder::new("  ", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "buyerEmail"
        ));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_round_trips_and_drops_dangling_reference() {
        let db = db().await;
        let p1 = product(&db, 1).await;

        let created = db
            .orders()
            .create(NewOrder::new(
                "ada@example.com",
                vec![p1.id.clone(), "nonexistent".to_string()],
            ))
            .await
            .unwrap();
        assert_eq!(created.products, vec![p1.clone()]);

        let fetched = db.orders().get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        // The stored document still carries both ids
        let raw = db.orders().find_raw(&created.id).await.unwrap().unwrap();
        assert_eq!(raw.products, vec![p1.id, "nonexistent".to_string()]);
    }

    #[tokio::test]
    async fn test_populate_beyond_sqlite_parameter_limit() {
        let db = db().await;
        let real = product(&db, 1).await;

        // More distinct references than SQLite's 32766 host parameters
        let mut references = vec![real.id.clone()];
        references.extend((0..40_000).map(|i| format!("ghost{i}")));

        let created = db
            .orders()
            .create(NewOrder::new("bulk@example.com", references))
            .await
            .unwrap();
        assert_eq!(created.products, vec![real.clone()]);

        let fetched = db.orders().get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.products, vec![real.clone()]);

        let raw = db.orders().find_raw(&created.id).await.unwrap().unwrap();
        assert_eq!(raw.products.len(), 40_001);

        let containing = db
            .orders()
            .list(&OrderListOptions::default().product_id("ghost39999"))
            .await
            .unwrap();
        assert_eq!(containing.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_with_empty_patch_returns_populated_order() {
        let db = db().await;
        let x = product(&db, 1).await;
        let order = db
            .orders()
            .create(NewOrder::new("a@example.com", vec![x.id.clone()]))
            .await
            .unwrap();

        let unchanged = db
            .orders()
            .edit(&order.id, OrderPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged, Some(order));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = db().await;
        assert_eq!(db.orders().get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_filters_combine() {
        let db = db().await;
        let orders = db.orders();
        let x = product(&db, 1).await;
        let y = product(&db, 2).await;

        let pending_x = orders
            .create(NewOrder::new("a@example.com", vec![x.id.clone()]))
            .await
            .unwrap();
        orders
            .edit(&pending_x.id, OrderPatch::default().status(OrderStatus::Pending))
            .await
            .unwrap();

        // CREATED with x
        orders
            .create(NewOrder::new("b@example.com", vec![y.id.clone(), x.id.clone()]))
            .await
            .unwrap();

        let pending_y = orders
            .create(NewOrder::new("c@example.com", vec![y.id.clone()]))
            .await
            .unwrap();
        orders
            .edit(&pending_y.id, OrderPatch::default().status(OrderStatus::Pending))
            .await
            .unwrap();

        let found = orders
            .list(
                &OrderListOptions::default()
                    .status(OrderStatus::Pending)
                    .product_id(x.id.clone()),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pending_x.id);
        // Raw ids, not populated documents
        assert_eq!(found[0].products, vec![x.id.clone()]);

        let with_x = orders
            .list(&OrderListOptions::default().product_id(x.id.clone()))
            .await
            .unwrap();
        assert_eq!(with_x.len(), 2);

        let pending = orders
            .list(&OrderListOptions::default().status(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending[0].id < pending[1].id);
    }

    #[tokio::test]
    async fn test_list_window() {
        let db = db().await;
        let mut created = Vec::new();
        for i in 0..12 {
            let order = db
                .orders()
                .create(NewOrder::new(format!("buyer{i}@example.com"), vec![]))
                .await
                .unwrap();
            created.push(order.id);
        }
        created.sort();

        let page = db
            .orders()
            .list(&OrderListOptions::default().offset(5).limit(4))
            .await
            .unwrap();

        let page_ids: Vec<String> = page.into_iter().map(|o| o.id).collect();
        assert_eq!(page_ids, created[5..9].to_vec());
    }

    #[tokio::test]
    async fn test_edit_replaces_products_and_index() {
        let db = db().await;
        let orders = db.orders();
        let x = product(&db, 1).await;
        let y = product(&db, 2).await;

        let order = orders
            .create(NewOrder::new("a@example.com", vec![x.id.clone()]))
            .await
            .unwrap();

        let edited = orders
            .edit(&order.id, OrderPatch::default().products(vec![y.id.clone()]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&edited.products), vec![y.id.as_str()]);
        assert_eq!(edited.buyer_email, "a@example.com");

        let by_x = orders
            .list(&OrderListOptions::default().product_id(x.id.clone()))
            .await
            .unwrap();
        assert!(by_x.is_empty());

        let by_y = orders
            .list(&OrderListOptions::default().product_id(y.id.clone()))
            .await
            .unwrap();
        assert_eq!(by_y.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_missing_returns_none() {
        let db = db().await;
        let result = db
            .orders()
            .edit("nope", OrderPatch::default().status(OrderStatus::Completed))
            .await
            .unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_edit_invalid_status_leaves_order_unchanged() {
        let db = db().await;
        let order = db
            .orders()
            .create(NewOrder::new("a@example.com", vec![]))
            .await
            .unwrap();

        let result: DbResult<Option<PopulatedOrder>> =
            match OrderPatch::from_json(json!({ "status": "INVALID" })) {
                Ok(patch) => db.orders().edit(&order.id, patch).await,
                Err(err) => Err(err.into()),
            };

        assert!(matches!(result, Err(DbError::Validation(_))));
        assert_eq!(db.orders().get(&order.id).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_edit_invalid_email_leaves_order_unchanged() {
        let db = db().await;
        let order = db
            .orders()
            .create(NewOrder::new("a@example.com", vec![]))
            .await
            .unwrap();

        let patch = OrderPatch {
            buyer_email: Some(String::new()),
            ..OrderPatch::default()
        };
        let err = db.orders().edit(&order.id, patch).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(db.orders().get(&order.id).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_status_check_constraint() {
        let db = db().await;
        let err = sqlx::query(
            "INSERT INTO orders (id, buyer_email, products, status) VALUES ('o1', 'a', '[]', 'SHIPPED')",
        )
        .execute(db.pool())
        .await
        .map_err(DbError::from)
        .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }));

        let err = sqlx::query("INSERT INTO orders (id, buyer_email) VALUES ('o2', NULL)")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_destroy_does_not_cascade_to_products() {
        let db = db().await;
        let x = product(&db, 1).await;
        let order = db
            .orders()
            .create(NewOrder::new("a@example.com", vec![x.id.clone()]))
            .await
            .unwrap();

        assert_eq!(db.orders().destroy(&order.id).await.unwrap(), 1);
        assert_eq!(db.orders().destroy(&order.id).await.unwrap(), 0);
        assert_eq!(db.orders().destroy("never-existed").await.unwrap(), 0);

        assert_eq!(db.products().get(&x.id).await.unwrap(), Some(x.clone()));
        let by_x = db
            .orders()
            .list(&OrderListOptions::default().product_id(x.id))
            .await
            .unwrap();
        assert!(by_x.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_stops_resolving() {
        let db = db().await;
        let x = product(&db, 1).await;
        let y = product(&db, 2).await;
        let order = db
            .orders()
            .create(NewOrder::new(
                "a@example.com",
                vec![x.id.clone(), y.id.clone(), x.id.clone()],
            ))
            .await
            .unwrap();
        assert_eq!(
            ids(&order.products),
            vec![x.id.as_str(), y.id.as_str(), x.id.as_str()]
        );

        db.products().destroy(&x.id).await.unwrap();

        let fetched = db.orders().get(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.products, vec![y]);
    }
}

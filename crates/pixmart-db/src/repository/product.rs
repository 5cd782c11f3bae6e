//! # Product Repository
//!
//! Database operations for product documents.
//!
//! ## Key Operations
//! - CRUD on single documents
//! - Tag-filtered, paginated listing
//! - Batch lookup by id (used to populate order references)
//!
//! ## Tag Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Tag Filter Works                             │
//! │                                                                         │
//! │  list(tag = "nature")                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  json_each(products.tags) expands each row's tag array                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ p1 | [{"title":"nature"},{"title":"sky"}]│ ← MATCH                   │
//! │  │ p2 | [{"title":"Nature"}]                │   (case-sensitive)        │
//! │  │ p3 | []                                  │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ORDER BY id ASC LIMIT ? OFFSET ?                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use pixmart_core::validation::validate_product;
use pixmart_core::{
    generate_id, NewProduct, Product, ProductLinks, ProductListOptions, ProductPatch,
    ProductUrls, ProductUser, Tag,
};

use crate::error::DbResult;
use crate::repository::push_page;

const SELECT_PRODUCTS: &str = r#"
    SELECT
        id,
        description,
        alt_description,
        likes,
        urls,
        links,
        user,
        tags
    FROM products
"#;

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    description: Option<String>,
    alt_description: Option<String>,
    likes: i64,
    urls: Json<ProductUrls>,
    links: Json<ProductLinks>,
    user: Json<ProductUser>,
    tags: Json<Vec<Tag>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            description: row.description,
            alt_description: row.alt_description,
            likes: row.likes,
            urls: row.urls.0,
            links: row.links.0,
            user: row.user.0,
            tags: row.tags.0,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create(new_product).await?;
/// let nature = repo.list(&ProductListOptions::default().tag("nature")).await?;
/// let same = repo.get(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with a freshly generated id.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored document
    /// * `Err(DbError::Validation)` - A required field is empty
    pub async fn create(&self, new_product: NewProduct) -> DbResult<Product> {
        let product = new_product.into_product(generate_id());
        validate_product(&product)?;

        debug!(id = %product.id, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, description, alt_description, likes,
                urls, links, user, tags
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.description)
        .bind(&product.alt_description)
        .bind(product.likes)
        .bind(Json(&product.urls))
        .bind(Json(&product.links))
        .bind(Json(&product.user))
        .bind(Json(&product.tags))
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products ordered by ascending id.
    ///
    /// ## Arguments
    /// * `options` - Offset/limit window and optional exact tag match
    pub async fn list(&self, options: &ProductListOptions) -> DbResult<Vec<Product>> {
        debug!(
            offset = options.offset,
            limit = options.limit,
            tag = ?options.tag,
            "Listing products"
        );

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_PRODUCTS);

        if let Some(tag) = &options.tag {
            query
                .push(
                    " WHERE EXISTS (SELECT 1 FROM json_each(products.tags) AS t \
                     WHERE json_extract(t.value, '$.title') = ",
                )
                .push_bind(tag.clone())
                .push(")");
        }

        query.push(" ORDER BY id ASC");
        push_page(&mut query, options.page());

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "List returned products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCTS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Fetches every product whose id is in `ids`, in one query.
    ///
    /// The id list travels as a single JSON parameter, so its length is not
    /// bounded by SQLite's host parameter limit.
    ///
    /// The result order is unspecified and ids with no document are simply
    /// absent. Callers that need order must reassemble.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ids.len(), "Fetching products by id");

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "{SELECT_PRODUCTS} WHERE id IN (SELECT value FROM json_each(?1))"
        ))
        .bind(Json(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Applies a patch to an existing product. An empty patch writes nothing.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The updated document
    /// * `Ok(None)` - No product with this id
    /// * `Err(DbError::Validation)` - The patched document is invalid;
    ///   nothing is written
    pub async fn edit(&self, id: &str, patch: ProductPatch) -> DbResult<Option<Product>> {
        let Some(mut product) = self.get(id).await? else {
            debug!(id = %id, "Edit skipped, product not found");
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(product));
        }

        patch.apply(&mut product);
        validate_product(&product)?;

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                description = ?2,
                alt_description = ?3,
                likes = ?4,
                urls = ?5,
                links = ?6,
                user = ?7,
                tags = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.description)
        .bind(&product.alt_description)
        .bind(product.likes)
        .bind(Json(&product.urls))
        .bind(Json(&product.links))
        .bind(Json(&product.user))
        .bind(Json(&product.tags))
        .execute(&self.pool)
        .await?;

        // Deleted between read and write
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(product))
    }

    /// Deletes a product.
    ///
    /// Orders referencing it are left alone; their reference simply stops
    /// resolving.
    ///
    /// ## Returns
    /// Number of deleted documents (0 or 1).
    pub async fn destroy(&self, id: &str) -> DbResult<u64> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
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
    use pixmart_core::ValidationError;
    use serde_json::json;

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = repo().await;
        let created = repo.create(new_product(7, &["nature", "sky"])).await.unwrap();

        assert!(!created.id.is_empty());
        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_required_field() {
        let repo = repo().await;
        let mut input = new_product(1, &[]);
        input.urls.thumb = String::new();

        let err = repo.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "urls.thumb"
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = repo().await;
        assert_eq!(repo.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_by_tag_with_window() {
        let repo = repo().await;

        let mut nature_ids = Vec::new();
        for i in 0..30 {
            let product = repo.create(new_product(i, &["city", "nature"])).await.unwrap();
            nature_ids.push(product.id);
        }
        for i in 0..5 {
            repo.create(new_product(100 + i, &["city"])).await.unwrap();
        }
        nature_ids.sort();

        let page = repo
            .list(&ProductListOptions::default().tag("nature").offset(10).limit(10))
            .await
            .unwrap();

        let page_ids: Vec<String> = page.iter().map(|p| p.id.clone()).collect();
        assert_eq!(page_ids, nature_ids[10..20].to_vec());
        assert!(page.iter().all(|p| p.has_tag("nature")));
    }

    #[tokio::test]
    async fn test_list_tag_is_exact_and_case_sensitive() {
        let repo = repo().await;
        repo.create(new_product(1, &["Nature"])).await.unwrap();
        repo.create(new_product(2, &["nature walk"])).await.unwrap();
        let hit = repo.create(new_product(3, &["nature"])).await.unwrap();

        let found = repo
            .list(&ProductListOptions::default().tag("nature"))
            .await
            .unwrap();
        assert_eq!(found, vec![hit]);
    }

    #[tokio::test]
    async fn test_list_default_and_unbounded_limit() {
        let repo = repo().await;
        for i in 0..30 {
            repo.create(new_product(i, &[])).await.unwrap();
        }

        let default_page = repo.list(&ProductListOptions::default()).await.unwrap();
        assert_eq!(default_page.len(), 25);
        assert!(default_page.windows(2).all(|w| w[0].id < w[1].id));

        let everything = repo
            .list(&ProductListOptions::default().limit(0))
            .await
            .unwrap();
        assert_eq!(everything.len(), 30);

        let past_end = repo
            .list(&ProductListOptions::default().offset(40))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_get_many_returns_existing_subset() {
        let repo = repo().await;
        let a = repo.create(new_product(1, &[])).await.unwrap();
        let b = repo.create(new_product(2, &[])).await.unwrap();

        let mut found = repo
            .get_many(&[b.id.clone(), "missing".to_string(), a.id.clone()])
            .await
            .unwrap();
        found.sort_by(|x, y| x.id.cmp(&y.id));

        assert_eq!(found, vec![a, b]);
        assert!(repo.get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_many_beyond_sqlite_parameter_limit() {
        let repo = repo().await;
        let real = repo.create(new_product(1, &[])).await.unwrap();

        // SQLite caps host parameters at 32766 per statement
        let mut ids: Vec<String> = (0..40_000).map(|i| format!("ghost{i}")).collect();
        ids.push(real.id.clone());

        let found = repo.get_many(&ids).await.unwrap();
        assert_eq!(found, vec![real]);
    }

    #[tokio::test]
    async fn test_edit_with_empty_patch_returns_stored_document() {
        let repo = repo().await;
        let created = repo.create(new_product(7, &["nature"])).await.unwrap();

        let unchanged = repo
            .edit(&created.id, ProductPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged, Some(created));

        assert_eq!(
            repo.edit("nope", ProductPatch::default()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_edit_overwrites_and_persists() {
        let repo = repo().await;
        let created = repo.create(new_product(1, &["nature"])).await.unwrap();

        let patch = ProductPatch::from_json(json!({
            "likes": 42,
            "description": null,
            "tags": [{ "title": "sea" }]
        }))
        .unwrap();
        let edited = repo.edit(&created.id, patch).await.unwrap().unwrap();

        assert_eq!(edited.likes, 42);
        assert_eq!(edited.description, None);
        assert_eq!(edited.tags, vec![Tag::new("sea")]);
        assert_eq!(edited.user, created.user);
        assert_eq!(repo.get(&created.id).await.unwrap(), Some(edited));
    }

    #[tokio::test]
    async fn test_edit_missing_returns_none() {
        let repo = repo().await;
        let patch = ProductPatch {
            likes: Some(1),
            ..ProductPatch::default()
        };

        assert_eq!(repo.edit("nope", patch).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_edit_invalid_leaves_document_unchanged() {
        let repo = repo().await;
        let created = repo.create(new_product(1, &[])).await.unwrap();

        let patch = ProductPatch::from_json(json!({
            "links": { "self": "", "html": "page" }
        }))
        .unwrap();
        let err = repo.edit(&created.id, patch).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(repo.get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let repo = repo().await;
        let created = repo.create(new_product(1, &[])).await.unwrap();

        assert_eq!(repo.destroy(&created.id).await.unwrap(), 1);
        assert_eq!(repo.destroy(&created.id).await.unwrap(), 0);
        assert_eq!(repo.destroy("never-existed").await.unwrap(), 0);
        assert_eq!(repo.get(&created.id).await.unwrap(), None);
    }
}

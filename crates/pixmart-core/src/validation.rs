//! # Validation Module
//!
//! Required-field validation for stored documents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Required keys present, types correct                              │
//! │  └── Enum values within their declared set                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required strings non-empty                                        │
//! │  └── Reference ids syntactically valid                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraint on order status                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs on the whole document, both at create time and after a
//! patch has been merged during edit.

use crate::error::ValidationError;
use crate::types::{Order, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a required string field is present and non-blank.
///
/// ## Example
/// ```rust
/// use pixmart_core::validation::validate_required;
///
/// assert!(validate_required("buyerEmail", "ada@example.com").is_ok());
/// assert!(validate_required("buyerEmail", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Validates a document identifier used as a reference.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain whitespace
///
/// Existence of the referenced document is NOT checked.
pub fn validate_reference_id(field: &str, id: &str) -> ValidationResult<()> {
    validate_required(field, id)?;

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates every required field of a product.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required("id", &product.id)?;

    validate_required("urls.regular", &product.urls.regular)?;
    validate_required("urls.small", &product.urls.small)?;
    validate_required("urls.thumb", &product.urls.thumb)?;

    validate_required("links.self", &product.links.self_link)?;
    validate_required("links.html", &product.links.html)?;

    validate_required("user.id", &product.user.id)?;
    validate_required("user.first_name", &product.user.first_name)?;
    validate_required("user.username", &product.user.username)?;

    for (index, tag) in product.tags.iter().enumerate() {
        validate_required(&format!("tags.{index}.title"), &tag.title)?;
    }

    Ok(())
}

/// Validates every required field of a stored (unpopulated) order.
///
/// `status` needs no check here: the type only admits declared values.
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    validate_required("id", &order.id)?;
    validate_required("buyerEmail", &order.buyer_email)?;

    for (index, product_id) in order.products.iter().enumerate() {
        validate_reference_id(&format!("products.{index}"), product_id)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewOrder, ProductLinks, ProductUrls, ProductUser, Tag};

    fn product() -> Product {
        Product {
            id: "p1".to_string(),
            description: None,
            alt_description: None,
            likes: 0,
            urls: ProductUrls {
                regular: "r".to_string(),
                small: "s".to_string(),
                thumb: "t".to_string(),
            },
            links: ProductLinks {
                self_link: "api".to_string(),
                html: "page".to_string(),
            },
            user: ProductUser {
                id: "u1".to_string(),
                first_name: "Ada".to_string(),
                last_name: None,
                portfolio_url: None,
                username: "ada".to_string(),
            },
            tags: vec![Tag::new("nature")],
        }
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product()).is_ok());

        let mut missing_thumb = product();
        missing_thumb.urls.thumb = String::new();
        assert_eq!(
            validate_product(&missing_thumb),
            Err(ValidationError::required("urls.thumb"))
        );

        let mut missing_username = product();
        missing_username.user.username = " ".to_string();
        assert_eq!(
            validate_product(&missing_username),
            Err(ValidationError::required("user.username"))
        );

        let mut blank_tag = product();
        blank_tag.tags.push(Tag::new(""));
        assert_eq!(
            validate_product(&blank_tag),
            Err(ValidationError::required("tags.1.title"))
        );
    }

    #[test]
    fn test_validate_order() {
        let order = NewOrder::new("ada@example.com", vec!["p1".to_string()])
            .into_order("o1".to_string());
        assert!(validate_order(&order).is_ok());

        let no_email = NewOrder::new("", vec![]).into_order("o1".to_string());
        assert_eq!(
            validate_order(&no_email),
            Err(ValidationError::required("buyerEmail"))
        );

        let bad_ref = NewOrder::new("ada@example.com", vec!["p 1".to_string()])
            .into_order("o1".to_string());
        assert!(matches!(
            validate_order(&bad_ref),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_dangling_reference_is_valid() {
        let order = NewOrder::new("ada@example.com", vec!["nonexistent".to_string()])
            .into_order("o1".to_string());
        assert!(validate_order(&order).is_ok());
    }
}

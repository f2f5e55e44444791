//! # Validation Module
//!
//! Input validation utilities for HomeStock.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form text (ProductForm)                                      │
//! │  ├── parse_count: lenient integer parsing ("12abc" → 12, "" → 0)       │
//! │  └── validate_product_name: trim + non-empty                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ProductInput (typed, already valid)                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store write (validate_product)                               │
//! │  └── Re-checks every invariant before the blob is rewritten            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use homestock_core::validation::{parse_count, validate_product_name};
//!
//! assert_eq!(validate_product_name("  Café ").unwrap(), "Café");
//! assert_eq!(parse_count("quantity", "5").unwrap(), 5);
//! assert!(parse_count("quantity", "-3").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Leading/trailing whitespace is dropped
/// - Must not be empty afterwards
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock count (`quantity` or `minQuantity`).
///
/// Zero is allowed; negatives are not.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Parses a count typed into a form field.
///
/// ## Parsing Rules
/// ```text
/// "5"      → 5          "  7"    → 7
/// "5.7"    → 5          "12abc"  → 12
/// ""       → 0          "abc"    → 0
/// "-0"     → 0          "-3"     → Err(Negative)
/// ```
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of ASCII digits is taken. Text without any leading digits counts as zero.
pub fn parse_count(field: &str, raw: &str) -> ValidationResult<i64> {
    let text = raw.trim_start();

    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() {
        return Ok(0);
    }

    let magnitude: i64 = digits.parse().map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    })?;

    let value = if negative { -magnitude } else { magnitude };
    validate_stock_level(field, value)?;

    Ok(value)
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a full product record before it is written.
///
/// ## Rules
/// - `id` must not be blank
/// - `name` must not be blank after trimming
/// - `quantity` and `minQuantity` must be non-negative
/// - `updatedAt` must not precede `createdAt`
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    validate_product_name(&product.name)?;
    validate_stock_level("quantity", product.quantity)?;
    validate_stock_level("minQuantity", product.min_quantity)?;

    if product.updated_at < product.created_at {
        return Err(ValidationError::InvalidTimestamps);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

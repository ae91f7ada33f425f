//! # Validation Module
//!
//! Input validation for Cantina.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: Presentation   - format checks, immediate feedback
//! Layer 2: THIS MODULE    - business rule validation, pre-persistence
//! Layer 3: SQLite         - NOT NULL, UNIQUE, foreign keys
//! ```
//! A failure here always means nothing was written.

use crate::error::ValidationError;
use crate::types::NewProduct;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an optional description: at most 1000 characters.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = description {
        if text.len() > 1000 {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: 1000,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price at product creation: strictly positive.
///
/// Stored prices are only required to be non-negative, but the creation
/// form rejects free or negative prices up front.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a cart quantity: 1 through [`MAX_LINE_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an initial stock level: zero is fine, negative is not.
pub fn validate_initial_stock(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "initial_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an expense entry: non-empty description, amount > 0.
pub fn validate_expense(description: &str, amount_cents: i64) -> ValidationResult<()> {
    if description.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates everything needed to create a product with its inventory row.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    validate_price_cents("purchase_price", input.purchase_price_cents)?;
    validate_price_cents("sale_price", input.sale_price_cents)?;
    validate_initial_stock(input.initial_quantity)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Agua 600ml".to_string(),
            description: Some("Botella de agua".to_string()),
            purchase_price_cents: 200,
            sale_price_cents: 500,
            initial_quantity: 10,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Agua 600ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("sale_price", 500).is_ok());
        assert!(validate_price_cents("sale_price", 0).is_err());
        assert!(validate_price_cents("sale_price", -100).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_initial_stock() {
        assert!(validate_initial_stock(0).is_ok());
        assert!(validate_initial_stock(50).is_ok());
        assert!(validate_initial_stock(-1).is_err());
    }

    #[test]
    fn test_validate_expense() {
        assert!(validate_expense("Bolsas", 1500).is_ok());
        assert!(validate_expense("", 1500).is_err());
        assert!(validate_expense("Bolsas", 0).is_err());
        assert!(validate_expense("Bolsas", -10).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&new_product()).is_ok());

        let mut bad = new_product();
        bad.sale_price_cents = 0;
        assert!(validate_new_product(&bad).is_err());

        let mut bad = new_product();
        bad.initial_quantity = -5;
        assert!(validate_new_product(&bad).is_err());
    }
}

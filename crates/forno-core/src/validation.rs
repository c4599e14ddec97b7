//! # Validation Module
//!
//! Request validation for the pricing calculator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic shape checks before sending                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (request hygiene)                                │
//! │  ├── Required ids present                                              │
//! │  ├── Selection count bound                                             │
//! │  └── Quarter-set bound (1..=4 members)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator (business exceptions)                             │
//! │  ├── Crust availability for size                                       │
//! │  └── Deep-dish gluten-free exclusion                                   │
//! │                                                                         │
//! │  Defense in depth: every failure is recoverable by fixing the request  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::QuoteRequest;
use crate::MAX_TOPPING_SELECTIONS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the structural hygiene of a calculation request.
///
/// ## Rules
/// - restaurant_id and menu_item_id must be non-empty
/// - at most `MAX_TOPPING_SELECTIONS` selections
/// - every placement must cover something (no empty quarter sets)
pub fn validate_request(request: &QuoteRequest) -> ValidationResult<()> {
    validate_required(&request.restaurant_id, "restaurant_id")?;
    validate_required(&request.menu_item_id, "menu_item_id")?;

    if request.toppings.len() > MAX_TOPPING_SELECTIONS {
        return Err(ValidationError::TooManyToppings {
            max: MAX_TOPPING_SELECTIONS,
        });
    }

    for selection in &request.toppings {
        validate_required(&selection.customization_id, "customization_id")?;
        selection.placement.validate()?;
    }

    Ok(())
}

/// Validates that a required string field is non-empty.
pub fn validate_required(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

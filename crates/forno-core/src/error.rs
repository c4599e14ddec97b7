//! # Error Types
//!
//! Domain-specific error types for forno-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forno-core errors (this file)                                         │
//! │  ├── PricingError     - Unrecoverable pricing failures                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  forno-engine errors (separate crate)                                  │
//! │  └── EngineError      - Coalescer / channel failures                   │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → EngineError → Caller           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, size, crust)
//! 3. Errors are enum variants, never String
//! 4. A failed calculation NEVER degrades to a $0 price; the distinction
//!    between "failed" and "free" is load-bearing for a POS
//!
//! ## Recoverability
//! Every variant here is recoverable from the caller's perspective: fix the
//! request (pick an offered crust, drop the empty quarter set) and retry.
//! There is no fatal state inside the engine itself.

use thiserror::Error;

use crate::types::{CrustType, SizeCode};

// =============================================================================
// Pricing Error
// =============================================================================

/// Unrecoverable conditions for a single calculation.
///
/// "Unrecoverable" means the calculation cannot settle on a price; the
/// caller must correct the request. Unknown toppings are deliberately NOT
/// here: they degrade to warnings (see `PricingCalculator`).
#[derive(Debug, Error)]
pub enum PricingError {
    /// The requested menu item does not exist in the catalog snapshot.
    #[error("Menu item not found: {0}")]
    UnknownMenuItem(String),

    /// No crust pricing row exists for the requested (size, crust) pair.
    ///
    /// ## When This Occurs
    /// - The combination was never offered
    /// - The catalog snapshot is missing rows
    ///
    /// The caller must NOT default to $0 or silently substitute another
    /// crust; it should surface the combination as unavailable.
    #[error("No pricing available for {size:?} {crust:?}")]
    PricingUnavailable { size: SizeCode, crust: CrustType },

    /// The crust pricing row exists but is flagged unavailable.
    #[error("Crust {crust:?} is not currently offered in size {size:?}")]
    CrustNotAvailable { size: SizeCode, crust: CrustType },

    /// A specialty item has no priced variant for the requested size.
    ///
    /// Specialty items take their base price from their own variant table,
    /// never from the generic crust table, so a missing variant fails the
    /// calculation outright.
    #[error("Item {item_id} has no priced variant for size {size:?}")]
    VariantUnavailable { item_id: String, size: SizeCode },

    /// The request is structurally unusable (empty ids, corrupt payload).
    #[error("Malformed pricing request: {reason}")]
    MalformedRequest { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any price is computed. Used for early rejection of
/// requests that violate business exceptions or structural bounds.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A quarter-set placement with no members covers nothing.
    ///
    /// A topping that covers zero quarters is a contradiction; callers that
    /// mean "no topping" must send amount `none` instead.
    #[error("Quarter-set placement must name between 1 and 4 quarters")]
    EmptyQuarterSet,

    /// Gluten-free crust is excluded for the smallest size of deep-dish
    /// style items.
    ///
    /// ## Business Exception
    /// The deep-dish recipe cannot be prepared gluten-free at the smallest
    /// size. The request fails validation; it is never silently repriced
    /// onto another crust.
    #[error("Gluten-free crust is not offered for {item_id} in size {size:?}")]
    GlutenFreeNotOffered { item_id: String, size: SizeCode },

    /// Too many topping selections in a single request.
    #[error("Request cannot have more than {max} topping selections")]
    TooManyToppings { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PricingError::PricingUnavailable {
            size: SizeCode::Medium,
            crust: CrustType::Stuffed,
        };
        assert_eq!(
            err.to_string(),
            "No pricing available for Medium Stuffed"
        );

        let err = PricingError::VariantUnavailable {
            item_id: "item-meat-feast".to_string(),
            size: SizeCode::Small,
        };
        assert_eq!(
            err.to_string(),
            "Item item-meat-feast has no priced variant for size Small"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::EmptyQuarterSet;
        assert_eq!(
            err.to_string(),
            "Quarter-set placement must name between 1 and 4 quarters"
        );

        let err = ValidationError::TooManyToppings { max: 50 };
        assert_eq!(
            err.to_string(),
            "Request cannot have more than 50 topping selections"
        );
    }

    #[test]
    fn test_validation_converts_to_pricing_error() {
        let validation_err = ValidationError::Required {
            field: "menu_item_id".to_string(),
        };
        let pricing_err: PricingError = validation_err.into();
        assert!(matches!(pricing_err, PricingError::Validation(_)));
    }
}

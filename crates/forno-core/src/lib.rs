//! # forno-core: Pure Pricing Logic for Forno POS
//!
//! This crate is the **heart** of Forno POS. It prices customizable items
//! (pizza, chicken, appetizers) as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forno POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Ordering Frontend (out of scope)              │   │
//! │  │     Size picker ──► Topping grid ──► Price display ──► Cart     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ QuoteRequest                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    forno-engine                                 │   │
//! │  │     Debounce ──► De-duplicate ──► Last-writer-wins delivery     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ forno-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ placement │  │   crust   │  │ template  │  │  pricing  │  │   │
//! │  │   │ geometry  │  │ base+up-  │  │ default   │  │ calculator│  │   │
//! │  │   │ ×bps      │  │ charge    │  │ merge     │  │ breakdown │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        Menu administration / order placement (out of scope)     │   │
//! │  │        supplies CatalogSnapshot, consumes ConfiguredCartItem    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and request types (Customization, MenuItem, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`placement`] - Geometric placement sum type and its multiplier
//! - [`crust`] - Crust/size resolver (base price + upcharge)
//! - [`template`] - Template default merge
//! - [`pricing`] - The calculator: totals, breakdown, warnings
//! - [`cart`] - Cart item composer (price freezing)
//! - [`error`] - Pricing and validation error types
//! - [`validation`] - Request hygiene checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: A quote is a function of (snapshot, request)
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Cents (i64) and basis-point multipliers only
//! 4. **Explicit Errors**: A failed calculation is never a silent $0
//!
//! ## Example Usage
//!
//! ```rust
//! use forno_core::pricing::PricingCalculator;
//! use forno_core::types::{
//!     CatalogSnapshot, CrustPricing, CrustType, ItemKind, MenuItem, QuoteRequest, SizeCode,
//! };
//!
//! let mut catalog = CatalogSnapshot::new("r-1");
//! catalog.add_crust_pricing(CrustPricing {
//!     size_code: SizeCode::Medium,
//!     crust_type: CrustType::Thin,
//!     base_price_cents: 999,
//!     upcharge_cents: 0,
//!     is_available: true,
//! });
//! catalog.add_item(MenuItem {
//!     id: "item-byo".to_string(),
//!     name: "Build Your Own".to_string(),
//!     kind: ItemKind::Pizza,
//!     is_deep_dish: false,
//!     variants: vec![],
//!     base_prep_minutes: 12,
//! });
//!
//! let request = QuoteRequest {
//!     restaurant_id: "r-1".to_string(),
//!     menu_item_id: "item-byo".to_string(),
//!     size_code: SizeCode::Medium,
//!     crust_type: CrustType::Thin,
//!     toppings: vec![],
//! };
//!
//! let quote = PricingCalculator::new().quote(&catalog, &request).unwrap();
//! assert_eq!(quote.final_price_cents, 999);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod crust;
pub mod error;
pub mod money;
pub mod placement;
pub mod pricing;
pub mod template;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use forno_core::Money` instead of
// `use forno_core::money::Money`

pub use cart::{compose, ConfiguredCartItem};
pub use crust::{BasePriceSource, CrustQuote};
pub use error::{PricingError, PricingResult, ValidationError};
pub use money::Money;
pub use placement::{Placement, Quarter};
pub use pricing::{PriceBreakdownItem, PriceQuote, PricingCalculator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum topping selections accepted in a single calculation request.
///
/// ## Business Reason
/// Bounds request size and kitchen feasibility; a request listing every
/// catalog entry is a bug, not an order.
pub const MAX_TOPPING_SELECTIONS: usize = 50;

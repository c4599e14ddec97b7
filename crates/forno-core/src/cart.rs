//! # Cart Item Composer
//!
//! Turns a settled quote plus the raw selections into the persisted line
//! item that order placement consumes.
//!
//! ## Price Freezing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Price-at-configuration-time                            │
//! │                                                                         │
//! │  configure ──► recalc ──► recalc ──► ... ──► COMMIT                     │
//! │   (quote)     (quote)    (quote)            (compose)                  │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                       ConfiguredCartItem                │
//! │                                       price FROZEN here                 │
//! │                                                                         │
//! │  Later catalog edits by an administrator never retroactively alter      │
//! │  already-composed cart items or placed orders.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::placement::Placement;
use crate::pricing::{BreakdownKind, PriceQuote};
use crate::types::{CrustType, MenuItem, QuoteRequest, SizeCode, ToppingAmount};

// =============================================================================
// Priced Topping
// =============================================================================

/// A topping frozen into a cart item with its priced amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedTopping {
    pub name: String,
    pub amount: ToppingAmount,
    #[ts(type = "string | Array<string> | null")]
    pub placement: Option<Placement>,
    /// Contribution at configuration time (negative for removal credits).
    pub price_cents: i64,
    pub is_default: bool,
}

// =============================================================================
// Configured Cart Item
// =============================================================================

/// One configured, priced line item ready for order placement.
///
/// ## Identity
/// `id` is fresh per composition. Composing twice from identical inputs
/// yields structurally identical items except for this identifier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredCartItem {
    /// Line item identity (UUID v4), fresh per composition.
    pub id: String,

    pub menu_item_id: String,

    /// "SIZE CRUST Name", e.g. `12" Thin Build Your Own`.
    pub display_name: String,

    pub size_code: SizeCode,
    pub crust_type: CrustType,

    /// Toppings with their priced amounts, frozen.
    pub selected_toppings: Vec<PricedTopping>,

    /// Base price at configuration time, frozen.
    pub base_price_cents: i64,

    /// Final price at configuration time, frozen.
    pub total_price_cents: i64,

    pub estimated_prep_minutes: u32,

    /// When the item was committed to the cart.
    #[ts(as = "String")]
    pub configured_at: DateTime<Utc>,
}

/// Composes a cart line item from a settled quote.
///
/// Pure apart from the fresh identifier and timestamp: idempotent on all
/// priced content.
pub fn compose(item: &MenuItem, quote: &PriceQuote, request: &QuoteRequest) -> ConfiguredCartItem {
    let selected_toppings = quote
        .breakdown
        .iter()
        .filter(|row| {
            matches!(
                row.kind,
                BreakdownKind::Topping | BreakdownKind::TemplateDefault | BreakdownKind::TemplateExtra
            )
        })
        .map(|row| PricedTopping {
            name: row.name.clone(),
            amount: row.amount.unwrap_or(ToppingAmount::None),
            placement: row.placement.clone(),
            price_cents: row.price_cents,
            is_default: row.is_default,
        })
        .collect();

    ConfiguredCartItem {
        id: Uuid::new_v4().to_string(),
        menu_item_id: request.menu_item_id.clone(),
        display_name: format!(
            "{} {} {}",
            quote.size_code.label(),
            quote.crust_type.label(),
            item.name
        ),
        size_code: quote.size_code,
        crust_type: quote.crust_type,
        selected_toppings,
        base_price_cents: quote.base_price_cents,
        total_price_cents: quote.final_price_cents,
        estimated_prep_minutes: quote.estimated_prep_minutes,
        configured_at: Utc::now(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

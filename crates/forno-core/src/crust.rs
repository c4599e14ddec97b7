//! # Crust/Size Resolver
//!
//! Resolves the base price and crust upcharge for one (item, size, crust)
//! combination.
//!
//! ## Base Price Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Where the base price comes from                     │
//! │                                                                         │
//! │  Specialty item (has template)      Generic item (no template)          │
//! │  ─────────────────────────────      ──────────────────────────          │
//! │  base   ← item's priced variant     base   ← crust table row            │
//! │  upcharge ← crust table row         upcharge ← crust table row          │
//! │                                                                         │
//! │  The crust table is NEVER a fallback base for specialty items.          │
//! │  A specialty item without a variant for the size fails outright.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Business Exception
//! Deep-dish style items reject gluten-free crust at the smallest size. This
//! is a validation failure, not a silent reprice.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::money::Money;
use crate::types::{CatalogSnapshot, CrustType, MenuItem, SizeCode};

// =============================================================================
// Crust Quote
// =============================================================================

/// Which table supplied the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BasePriceSource {
    /// Item's own priced variant (specialty/pre-configured items).
    Specialty,
    /// Generic crust/size table.
    Regular,
}

/// Resolved base price and crust upcharge for one combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrustQuote {
    pub base_price: Money,
    pub base_price_source: BasePriceSource,
    pub crust_upcharge: Money,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves base price and upcharge, enforcing availability and the
/// deep-dish gluten-free exclusion.
///
/// ## Failure Modes
/// - gluten-free on the smallest size of a deep-dish item → validation error
/// - missing crust row → `PricingUnavailable`
/// - row flagged unavailable → `CrustNotAvailable`
/// - specialty item without a variant for the size → `VariantUnavailable`
pub fn resolve(
    catalog: &CatalogSnapshot,
    item: &MenuItem,
    size: SizeCode,
    crust: CrustType,
) -> PricingResult<CrustQuote> {
    // Business exception checked before any lookup: the request must fail
    // validation, not be priced and then rejected
    if item.is_deep_dish && size == SizeCode::smallest() && crust == CrustType::GlutenFree {
        return Err(ValidationError::GlutenFreeNotOffered {
            item_id: item.id.clone(),
            size,
        }
        .into());
    }

    let row = catalog
        .crust_row(size, crust)
        .ok_or(PricingError::PricingUnavailable { size, crust })?;

    if !row.is_available {
        return Err(PricingError::CrustNotAvailable { size, crust });
    }

    match catalog.template_for(&item.id) {
        Some(_) => {
            // Specialty: base from the item's own variant, upcharge from the
            // crust table. No fallback to the generic base.
            let base_price = item
                .variant_price(size)
                .ok_or_else(|| PricingError::VariantUnavailable {
                    item_id: item.id.clone(),
                    size,
                })?;

            Ok(CrustQuote {
                base_price,
                base_price_source: BasePriceSource::Specialty,
                crust_upcharge: row.upcharge(),
            })
        }
        None => Ok(CrustQuote {
            base_price: row.base_price(),
            base_price_source: BasePriceSource::Regular,
            crust_upcharge: row.upcharge(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CrustPricing, ItemKind, MenuItemVariant, PizzaTemplate, ToppingAmount, ToppingTier,
        TemplateTopping,
    };

    fn crust_row(size: SizeCode, crust: CrustType, base: i64, upcharge: i64) -> CrustPricing {
        CrustPricing {
            size_code: size,
            crust_type: crust,
            base_price_cents: base,
            upcharge_cents: upcharge,
            is_available: true,
        }
    }

    fn plain_item(id: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: "Build Your Own".to_string(),
            kind: ItemKind::Pizza,
            is_deep_dish: false,
            variants: vec![],
            base_prep_minutes: 12,
        }
    }

    fn specialty_item(id: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: "Meat Feast".to_string(),
            kind: ItemKind::Pizza,
            is_deep_dish: false,
            variants: vec![MenuItemVariant {
                size_code: SizeCode::Medium,
                price_cents: 1499,
            }],
            base_prep_minutes: 15,
        }
    }

    fn template_for(item_id: &str) -> PizzaTemplate {
        PizzaTemplate {
            menu_item_id: item_id.to_string(),
            credit_limit_bps: 5_000,
            toppings: vec![TemplateTopping {
                customization_id: "c-pepperoni".to_string(),
                default_amount: ToppingAmount::Normal,
                is_removable: true,
                substitution_tier: ToppingTier::Normal,
                sort_order: 1,
            }],
        }
    }

    #[test]
    fn test_regular_item_uses_crust_table_base() {
        let mut catalog = CatalogSnapshot::new("r-1");
        catalog.add_crust_pricing(crust_row(SizeCode::Medium, CrustType::Thin, 999, 0));
        let item = plain_item("item-byo");
        catalog.add_item(item.clone());

        let quote = resolve(&catalog, &item, SizeCode::Medium, CrustType::Thin).unwrap();
        assert_eq!(quote.base_price.cents(), 999);
        assert_eq!(quote.base_price_source, BasePriceSource::Regular);
        assert_eq!(quote.crust_upcharge.cents(), 0);
    }

    #[test]
    fn test_specialty_item_uses_variant_base_and_table_upcharge() {
        let mut catalog = CatalogSnapshot::new("r-1");
        catalog.add_crust_pricing(crust_row(SizeCode::Medium, CrustType::Stuffed, 999, 200));
        let item = specialty_item("item-meat-feast");
        catalog.add_item(item.clone());
        catalog.add_template(template_for("item-meat-feast"));

        let quote = resolve(&catalog, &item, SizeCode::Medium, CrustType::Stuffed).unwrap();
        // Base from the variant ($14.99), NOT the table's $9.99
        assert_eq!(quote.base_price.cents(), 1499);
        assert_eq!(quote.base_price_source, BasePriceSource::Specialty);
        assert_eq!(quote.crust_upcharge.cents(), 200);
    }

    #[test]
    fn test_specialty_without_variant_fails_not_falls_back() {
        let mut catalog = CatalogSnapshot::new("r-1");
        catalog.add_crust_pricing(crust_row(SizeCode::Large, CrustType::Thin, 1199, 0));
        let item = specialty_item("item-meat-feast"); // medium variant only
        catalog.add_item(item.clone());
        catalog.add_template(template_for("item-meat-feast"));

        let err = resolve(&catalog, &item, SizeCode::Large, CrustType::Thin).unwrap_err();
        assert!(matches!(err, PricingError::VariantUnavailable { .. }));
    }

    #[test]
    fn test_missing_row_is_pricing_unavailable() {
        let catalog = CatalogSnapshot::new("r-1");
        let item = plain_item("item-byo");

        let err = resolve(&catalog, &item, SizeCode::Medium, CrustType::Pan).unwrap_err();
        assert!(matches!(err, PricingError::PricingUnavailable { .. }));
    }

    #[test]
    fn test_unavailable_row_is_rejected() {
        let mut catalog = CatalogSnapshot::new("r-1");
        let mut row = crust_row(SizeCode::Medium, CrustType::Pan, 999, 100);
        row.is_available = false;
        catalog.add_crust_pricing(row);
        let item = plain_item("item-byo");

        let err = resolve(&catalog, &item, SizeCode::Medium, CrustType::Pan).unwrap_err();
        assert!(matches!(err, PricingError::CrustNotAvailable { .. }));
    }

    #[test]
    fn test_deep_dish_rejects_gluten_free_on_smallest_size() {
        let mut catalog = CatalogSnapshot::new("r-1");
        catalog.add_crust_pricing(crust_row(SizeCode::Small, CrustType::GlutenFree, 899, 150));
        let mut item = plain_item("item-deep");
        item.is_deep_dish = true;

        let err = resolve(&catalog, &item, SizeCode::Small, CrustType::GlutenFree).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Validation(ValidationError::GlutenFreeNotOffered { .. })
        ));

        // Larger sizes are fine
        catalog.add_crust_pricing(crust_row(SizeCode::Medium, CrustType::GlutenFree, 999, 150));
        assert!(resolve(&catalog, &item, SizeCode::Medium, CrustType::GlutenFree).is_ok());
    }
}

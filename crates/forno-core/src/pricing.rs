//! # Pricing Calculator
//!
//! Composes the catalog, crust table, template registry, and placement
//! resolver into one final price and an ordered, itemized breakdown.
//!
//! ## Calculation Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              idle → validating → computing → settled | failed           │
//! │                                                                         │
//! │  validating:  request hygiene, item lookup, crust availability,         │
//! │               gluten-free exclusion, quarter-set bounds                 │
//! │                                                                         │
//! │  computing:   base (crust::resolve)                                     │
//! │             + crust upcharge                                            │
//! │             + Σ topping prices      (add-on / escalated-default paths)  │
//! │             − Σ substitution credits (capped, floored at base)          │
//! │                                                                         │
//! │  settled:     PriceQuote { totals, breakdown[], warnings[] }            │
//! │  failed:      PricingError, NEVER a silent $0                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Pricing Branches
//! Add-on toppings and template defaults are priced by two explicit
//! functions (`addon_price`, `escalation_price`) rather than conditionals
//! scattered through callers, because the logic must be identical across all
//! customizable item kinds (pizza, chicken, appetizer).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::crust::{self, BasePriceSource};
use crate::error::{PricingError, PricingResult};
use crate::money::{Money, BPS_ONE};
use crate::placement::Placement;
use crate::template::{self, MergedTopping};
use crate::types::{
    CatalogSnapshot, CrustType, Customization, PriceType, QuoteRequest, SizeCode, ToppingAmount,
    ToppingTier,
};
use crate::validation;

// =============================================================================
// Breakdown
// =============================================================================

/// What a breakdown row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    /// Specialty item's own variant price.
    SpecialtyBase,
    /// Generic crust-table base price.
    RegularBase,
    /// Crust upcharge.
    Crust,
    /// Chargeable add-on topping.
    Topping,
    /// Template default at (or below) its included amount, or a removal.
    TemplateDefault,
    /// Template default escalated beyond its included amount.
    TemplateExtra,
}

/// One row of the itemized breakdown.
///
/// Every cent of the final price is accounted for by these rows; removals
/// appear with a negative price so the audit trail shows the credit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdownItem {
    pub name: String,
    pub price_cents: i64,
    pub kind: BreakdownKind,
    pub amount: Option<ToppingAmount>,
    #[ts(type = "string | Array<string> | null")]
    pub placement: Option<Placement>,
    pub category: Option<crate::types::CustomizationCategory>,
    pub is_default: bool,
    pub note: Option<String>,
}

// =============================================================================
// Price Quote
// =============================================================================

/// A settled calculation: totals, breakdown, and non-fatal warnings.
///
/// Wire shape (camelCase) matches what the ordering frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub base_price_cents: i64,
    pub base_price_source: BasePriceSource,
    pub crust_upcharge_cents: i64,
    pub topping_cost_cents: i64,
    /// Credit actually applied (after the base-price floor), not the raw sum.
    pub substitution_credit_cents: i64,
    pub final_price_cents: i64,
    pub breakdown: Vec<PriceBreakdownItem>,
    pub size_code: SizeCode,
    pub crust_type: CrustType,
    pub estimated_prep_minutes: u32,
    pub warnings: Vec<String>,
}

impl PriceQuote {
    /// Returns the final price as Money.
    #[inline]
    pub fn final_price(&self) -> Money {
        Money::from_cents(self.final_price_cents)
    }

    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

// =============================================================================
// Topping Price Kernels
// =============================================================================

/// (amount multiplier, size multiplier) for one customization, per its
/// price type.
fn component_bps(c: &Customization, amount: ToppingAmount, size: SizeCode) -> (u32, u32) {
    match c.price_type {
        // Fixed: base price regardless of amount and size; none still zero
        PriceType::Fixed => {
            let amount_bps = if amount == ToppingAmount::None { 0 } else { BPS_ONE };
            (amount_bps, BPS_ONE)
        }
        PriceType::Multiplied => (
            c.pricing_rules.schedules.normal.bps_for(amount),
            c.pricing_rules.size_multiplier_bps(size),
        ),
        PriceType::Tiered => (
            c.pricing_rules
                .schedules
                .for_tier(c.tier())
                .bps_for(amount),
            c.pricing_rules.size_multiplier_bps(size),
        ),
    }
}

/// Price of a non-default (add-on) topping.
///
/// `base × tier[amount] × size × placement`, rounded once. Sauces are always
/// free.
pub fn addon_price(
    c: &Customization,
    amount: ToppingAmount,
    size: SizeCode,
    placement: &Placement,
) -> Money {
    if c.category.is_sauce() {
        return Money::zero();
    }
    let (amount_bps, size_bps) = component_bps(c, amount, size);
    c.base_price()
        .scale_bps3(amount_bps, size_bps, placement.multiplier_bps())
}

/// Marginal price of a template default escalated beyond its included
/// amount.
///
/// Only the multiplier DIFFERENCE is charged; the included amount is
/// already in the specialty base. Floored at 0, so a selection below the
/// default never goes negative.
pub fn escalation_price(
    c: &Customization,
    amount: ToppingAmount,
    default_amount: ToppingAmount,
    size: SizeCode,
    placement: &Placement,
) -> Money {
    if c.category.is_sauce() {
        return Money::zero();
    }
    let (amount_bps, size_bps) = component_bps(c, amount, size);
    let (default_bps, _) = component_bps(c, default_amount, size);
    let marginal_bps = amount_bps.saturating_sub(default_bps);
    c.base_price()
        .scale_bps3(marginal_bps, size_bps, placement.multiplier_bps())
}

/// Nominal included value of a template default, for credit purposes.
///
/// Valued at whole placement on the template's substitution tier, the tier
/// the customer would be allowed to substitute into.
pub fn nominal_included_value(
    c: &Customization,
    default_amount: ToppingAmount,
    substitution_tier: ToppingTier,
    size: SizeCode,
) -> Money {
    if c.category.is_sauce() {
        return Money::zero();
    }
    match c.price_type {
        PriceType::Fixed => {
            if default_amount == ToppingAmount::None {
                Money::zero()
            } else {
                c.base_price()
            }
        }
        _ => {
            let amount_bps = c
                .pricing_rules
                .schedules
                .for_tier(substitution_tier)
                .bps_for(default_amount);
            let size_bps = c.pricing_rules.size_multiplier_bps(size);
            c.base_price().scale_bps3(amount_bps, size_bps, BPS_ONE)
        }
    }
}

// =============================================================================
// Pricing Calculator
// =============================================================================

/// The calculation entrypoint.
///
/// Stateless: a quote is a pure function of (catalog snapshot, request).
/// Recomputation, debouncing, and in-flight de-duplication belong to the
/// engine layer, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCalculator;

impl PricingCalculator {
    /// Creates a calculator.
    pub fn new() -> Self {
        PricingCalculator
    }

    /// Prices one configured item.
    ///
    /// ## Errors
    /// Fails only for unrecoverable conditions: unknown menu item, missing
    /// or unavailable crust row, missing specialty variant, malformed
    /// request, or a validation failure (gluten-free exclusion, empty
    /// quarter set). Unknown customizations degrade to warnings.
    pub fn quote(
        &self,
        catalog: &CatalogSnapshot,
        request: &QuoteRequest,
    ) -> PricingResult<PriceQuote> {
        // ---- validating ----
        validation::validate_request(request)?;

        let item = catalog
            .item(&request.menu_item_id)
            .ok_or_else(|| PricingError::UnknownMenuItem(request.menu_item_id.clone()))?;

        let crust_quote = crust::resolve(catalog, item, request.size_code, request.crust_type)?;

        // ---- computing ----
        let template = catalog.template_for(&item.id);
        let merge = template::merge_defaults(template, &request.toppings, catalog);
        let mut warnings = merge.warnings;

        let mut breakdown = Vec::new();

        breakdown.push(PriceBreakdownItem {
            name: item.name.clone(),
            price_cents: crust_quote.base_price.cents(),
            kind: match crust_quote.base_price_source {
                BasePriceSource::Specialty => BreakdownKind::SpecialtyBase,
                BasePriceSource::Regular => BreakdownKind::RegularBase,
            },
            amount: None,
            placement: None,
            category: None,
            is_default: false,
            note: None,
        });

        if !crust_quote.crust_upcharge.is_zero() {
            breakdown.push(PriceBreakdownItem {
                name: format!("{} crust", request.crust_type.label()),
                price_cents: crust_quote.crust_upcharge.cents(),
                kind: BreakdownKind::Crust,
                amount: None,
                placement: None,
                category: None,
                is_default: false,
                note: None,
            });
        }

        let mut topping_rows = Vec::new();
        let mut topping_cost = Money::zero();
        let mut raw_credit = Money::zero();
        let mut chargeable_count = 0u32;

        for merged in &merge.toppings {
            let customization = match catalog.customization(&merged.customization_id) {
                Some(c) => c,
                None => {
                    // Warn-and-ignore: one bad topping never fails the quote
                    warnings.push(format!(
                        "Unknown customization {} ignored",
                        merged.customization_id
                    ));
                    continue;
                }
            };

            if !customization.applies_to_kind(item.kind) {
                warnings.push(format!(
                    "{} does not apply to {:?} items; ignored",
                    customization.name, item.kind
                ));
                continue;
            }

            let row = if merged.is_default {
                self.price_default(
                    customization,
                    merged,
                    template.map(|t| t.credit_limit_bps).unwrap_or(0),
                    request.size_code,
                    &mut raw_credit,
                )
            } else {
                let price = addon_price(
                    customization,
                    merged.amount,
                    request.size_code,
                    &merged.placement,
                );
                if price.is_positive() {
                    topping_cost += price;
                    chargeable_count += 1;
                }
                PriceBreakdownItem {
                    name: customization.name.clone(),
                    price_cents: price.cents(),
                    kind: BreakdownKind::Topping,
                    amount: Some(merged.amount),
                    placement: Some(merged.placement.clone()),
                    category: Some(customization.category),
                    is_default: false,
                    note: None,
                }
            };

            if row.kind == BreakdownKind::TemplateExtra && row.price_cents > 0 {
                topping_cost += Money::from_cents(row.price_cents);
                chargeable_count += 1;
            }

            topping_rows.push((merged.sort_order, customization.category, row));
        }

        // Template defaults first (template order), then add-ons by category
        // priority, then alphabetical
        topping_rows.sort_by(|a, b| {
            let key_a = (
                !a.2.is_default,
                a.0,
                a.1.breakdown_priority(),
                a.2.name.to_lowercase(),
            );
            let key_b = (
                !b.2.is_default,
                b.0,
                b.1.breakdown_priority(),
                b.2.name.to_lowercase(),
            );
            key_a.cmp(&key_b)
        });
        breakdown.extend(topping_rows.into_iter().map(|(_, _, row)| row));

        // Credits can never drive the final price below the base variant
        // price
        let credit_ceiling = crust_quote.crust_upcharge + topping_cost;
        let applied_credit = if raw_credit > credit_ceiling {
            warnings.push(
                "Substitution credit capped: final price cannot fall below the base price"
                    .to_string(),
            );
            credit_ceiling
        } else {
            raw_credit
        };

        let final_price =
            crust_quote.base_price + crust_quote.crust_upcharge + topping_cost - applied_credit;

        // ---- settled ----
        Ok(PriceQuote {
            base_price_cents: crust_quote.base_price.cents(),
            base_price_source: crust_quote.base_price_source,
            crust_upcharge_cents: crust_quote.crust_upcharge.cents(),
            topping_cost_cents: topping_cost.cents(),
            substitution_credit_cents: applied_credit.cents(),
            final_price_cents: final_price.cents(),
            breakdown,
            size_code: request.size_code,
            crust_type: request.crust_type,
            estimated_prep_minutes: item.base_prep_minutes + chargeable_count / 2,
            warnings,
        })
    }

    /// Prices one template-default entry (included / escalated / removed).
    fn price_default(
        &self,
        customization: &Customization,
        merged: &MergedTopping,
        credit_limit_bps: u32,
        size: SizeCode,
        raw_credit: &mut Money,
    ) -> PriceBreakdownItem {
        let default_amount = merged.default_amount.unwrap_or(ToppingAmount::Normal);

        if merged.is_removal() {
            if merged.is_removable {
                let tier = merged
                    .substitution_tier
                    .unwrap_or_else(|| customization.tier());
                let nominal = nominal_included_value(customization, default_amount, tier, size);
                let credit = nominal.scale_bps(credit_limit_bps);
                *raw_credit += credit;
                return PriceBreakdownItem {
                    name: customization.name.clone(),
                    price_cents: -credit.cents(),
                    kind: BreakdownKind::TemplateDefault,
                    amount: Some(ToppingAmount::None),
                    placement: Some(merged.placement.clone()),
                    category: Some(customization.category),
                    is_default: true,
                    note: Some("substitution credit".to_string()),
                };
            }
            return PriceBreakdownItem {
                name: customization.name.clone(),
                price_cents: 0,
                kind: BreakdownKind::TemplateDefault,
                amount: Some(ToppingAmount::None),
                placement: Some(merged.placement.clone()),
                category: Some(customization.category),
                is_default: true,
                note: Some("removed".to_string()),
            };
        }

        if merged.amount > default_amount {
            let price = escalation_price(
                customization,
                merged.amount,
                default_amount,
                size,
                &merged.placement,
            );
            return PriceBreakdownItem {
                name: customization.name.clone(),
                price_cents: price.cents(),
                kind: BreakdownKind::TemplateExtra,
                amount: Some(merged.amount),
                placement: Some(merged.placement.clone()),
                category: Some(customization.category),
                is_default: true,
                note: None,
            };
        }

        // At or below the included amount: the specialty base already covers
        // it
        let note = if merged.amount < default_amount {
            Some("reduced".to_string())
        } else {
            Some("included".to_string())
        };
        PriceBreakdownItem {
            name: customization.name.clone(),
            price_cents: 0,
            kind: BreakdownKind::TemplateDefault,
            amount: Some(merged.amount),
            placement: Some(merged.placement.clone()),
            category: Some(customization.category),
            is_default: true,
            note,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

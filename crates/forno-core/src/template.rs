//! # Template Default Resolver
//!
//! Merges a specialty item's template defaults with the caller's explicit
//! selections into one tagged list the calculator can price.
//!
//! ## Merge Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Template Merge                                   │
//! │                                                                         │
//! │  Template default     Caller selection        Merged entry              │
//! │  ────────────────     ────────────────        ────────────              │
//! │  mushrooms, normal    (none sent)             default @ normal, whole   │
//! │  mushrooms, normal    amount = extra          default escalated         │
//! │  mushrooms, normal    amount = none           REMOVAL (credit path)     │
//! │  (not in template)    pepperoni, extra        add-on                    │
//! │                                                                         │
//! │  Every merged entry carries is_default so the two pricing branches      │
//! │  stay explicit instead of scattered conditionals.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sauce Exclusivity
//! Selections in the sauce category are mutually exclusive: the last sauce in
//! request order wins and superseded sauces are dropped with a warning. A
//! selected sauce also supersedes the template's default sauce.

use crate::placement::Placement;
use crate::types::{CatalogSnapshot, PizzaTemplate, ToppingAmount, ToppingSelection, ToppingTier};

/// Sort order assigned to add-ons so template defaults always lead.
const ADDON_SORT_ORDER: i32 = i32::MAX;

// =============================================================================
// Merged Topping
// =============================================================================

/// One merged entry: either a template default (possibly overridden) or an
/// explicit add-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTopping {
    pub customization_id: String,
    pub amount: ToppingAmount,
    pub placement: Placement,

    /// True for entries that originate from the item's template.
    pub is_default: bool,

    /// The template's included amount; `None` for add-ons.
    pub default_amount: Option<ToppingAmount>,

    /// Whether removal earns a substitution credit (template entries only).
    pub is_removable: bool,

    /// Tier whose schedule values the topping for credit purposes; `None`
    /// for add-ons.
    pub substitution_tier: Option<ToppingTier>,

    /// Template position; add-ons sort after all defaults.
    pub sort_order: i32,
}

impl MergedTopping {
    /// Whether this entry is a removal of a template default.
    pub fn is_removal(&self) -> bool {
        self.is_default && self.amount == ToppingAmount::None
    }
}

/// Result of the merge: the tagged list plus any non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub toppings: Vec<MergedTopping>,
    pub warnings: Vec<String>,
}

// =============================================================================
// Merge
// =============================================================================

/// Merges template defaults with explicit selections.
///
/// Template entries come first, in template sort order; unmatched selections
/// follow as add-ons in request order. Duplicate selections for one
/// customization collapse to the last occurrence.
pub fn merge_defaults(
    template: Option<&PizzaTemplate>,
    selections: &[ToppingSelection],
    catalog: &CatalogSnapshot,
) -> MergeOutcome {
    let mut warnings = Vec::new();

    // Last occurrence wins for duplicated customization ids
    let mut deduped: Vec<ToppingSelection> = Vec::with_capacity(selections.len());
    for selection in selections {
        if let Some(existing) = deduped
            .iter_mut()
            .find(|s| s.customization_id == selection.customization_id)
        {
            warnings.push(format!(
                "Duplicate selection for {}; keeping the last one",
                selection.customization_id
            ));
            *existing = selection.clone();
        } else {
            deduped.push(selection.clone());
        }
    }

    // Sauce exclusivity: keep only the last sauce selection
    let sauce_ids: Vec<String> = deduped
        .iter()
        .filter(|s| {
            catalog
                .customization(&s.customization_id)
                .map(|c| c.category.is_sauce())
                .unwrap_or(false)
        })
        .map(|s| s.customization_id.clone())
        .collect();

    if sauce_ids.len() > 1 {
        let winner = sauce_ids.last().cloned().unwrap_or_default();
        for superseded in &sauce_ids[..sauce_ids.len() - 1] {
            warnings.push(format!(
                "Sauce {superseded} superseded by {winner}; sauces are mutually exclusive"
            ));
        }
        deduped.retain(|s| {
            s.customization_id == winner || !sauce_ids.contains(&s.customization_id)
        });
    }

    let mut merged = Vec::new();
    let mut consumed: Vec<&str> = Vec::new();

    if let Some(template) = template {
        for default in template.sorted_toppings() {
            let override_selection = deduped
                .iter()
                .find(|s| s.customization_id == default.customization_id);

            let (amount, placement) = match override_selection {
                Some(selection) => {
                    consumed.push(&default.customization_id);
                    (selection.amount, selection.placement.clone())
                }
                // Not mentioned: present at its default amount, whole
                None => (default.default_amount, Placement::Whole),
            };

            merged.push(MergedTopping {
                customization_id: default.customization_id.clone(),
                amount,
                placement,
                is_default: true,
                default_amount: Some(default.default_amount),
                is_removable: default.is_removable,
                substitution_tier: Some(default.substitution_tier),
                sort_order: default.sort_order,
            });
        }
    }

    // Whatever the template didn't claim is an add-on
    for selection in &deduped {
        if consumed.contains(&selection.customization_id.as_str()) {
            continue;
        }
        merged.push(MergedTopping {
            customization_id: selection.customization_id.clone(),
            amount: selection.amount,
            placement: selection.placement.clone(),
            is_default: false,
            default_amount: None,
            is_removable: false,
            substitution_tier: None,
            sort_order: ADDON_SORT_ORDER,
        });
    }

    MergeOutcome {
        toppings: merged,
        warnings,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Customization, CustomizationCategory, ItemKind, PriceType, PricingRules, TemplateTopping,
        ToppingTier,
    };
    use std::collections::BTreeSet;

    fn sauce(id: &str) -> Customization {
        Customization {
            id: id.to_string(),
            name: id.to_string(),
            category: CustomizationCategory::ToppingSauce,
            base_price_cents: 0,
            price_type: PriceType::Fixed,
            pricing_rules: PricingRules::default(),
            applies_to: BTreeSet::from([ItemKind::Pizza]),
        }
    }

    fn selection(id: &str, amount: ToppingAmount) -> ToppingSelection {
        ToppingSelection {
            customization_id: id.to_string(),
            amount,
            placement: Placement::Whole,
        }
    }

    fn template() -> PizzaTemplate {
        PizzaTemplate {
            menu_item_id: "item-1".to_string(),
            credit_limit_bps: 5_000,
            toppings: vec![
                TemplateTopping {
                    customization_id: "c-mushrooms".to_string(),
                    default_amount: ToppingAmount::Normal,
                    is_removable: true,
                    substitution_tier: ToppingTier::Normal,
                    sort_order: 1,
                },
                TemplateTopping {
                    customization_id: "c-onions".to_string(),
                    default_amount: ToppingAmount::Light,
                    is_removable: false,
                    substitution_tier: ToppingTier::Normal,
                    sort_order: 2,
                },
            ],
        }
    }

    #[test]
    fn test_untouched_defaults_present_at_default_amount() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(Some(&template()), &[], &catalog);

        assert_eq!(outcome.toppings.len(), 2);
        let mushrooms = &outcome.toppings[0];
        assert!(mushrooms.is_default);
        assert_eq!(mushrooms.amount, ToppingAmount::Normal);
        assert_eq!(mushrooms.placement, Placement::Whole);
        assert_eq!(mushrooms.default_amount, Some(ToppingAmount::Normal));
    }

    #[test]
    fn test_override_keeps_default_tag() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(
            Some(&template()),
            &[selection("c-mushrooms", ToppingAmount::Extra)],
            &catalog,
        );

        let mushrooms = &outcome.toppings[0];
        assert!(mushrooms.is_default);
        assert_eq!(mushrooms.amount, ToppingAmount::Extra);
        assert_eq!(mushrooms.default_amount, Some(ToppingAmount::Normal));
        assert!(!mushrooms.is_removal());
    }

    #[test]
    fn test_none_on_default_is_a_removal() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(
            Some(&template()),
            &[selection("c-mushrooms", ToppingAmount::None)],
            &catalog,
        );

        assert!(outcome.toppings[0].is_removal());
        assert!(outcome.toppings[0].is_removable);
    }

    #[test]
    fn test_unmatched_selection_is_an_addon_after_defaults() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(
            Some(&template()),
            &[selection("c-pepperoni", ToppingAmount::Extra)],
            &catalog,
        );

        assert_eq!(outcome.toppings.len(), 3);
        let addon = outcome.toppings.last().unwrap();
        assert_eq!(addon.customization_id, "c-pepperoni");
        assert!(!addon.is_default);
        assert_eq!(addon.default_amount, None);
        assert!(outcome.toppings[0].sort_order < addon.sort_order);
    }

    #[test]
    fn test_no_template_means_all_addons() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(
            None,
            &[
                selection("c-pepperoni", ToppingAmount::Normal),
                selection("c-mushrooms", ToppingAmount::Light),
            ],
            &catalog,
        );

        assert_eq!(outcome.toppings.len(), 2);
        assert!(outcome.toppings.iter().all(|t| !t.is_default));
    }

    #[test]
    fn test_duplicate_selection_last_wins() {
        let catalog = CatalogSnapshot::new("r-1");
        let outcome = merge_defaults(
            None,
            &[
                selection("c-pepperoni", ToppingAmount::Light),
                selection("c-pepperoni", ToppingAmount::Xxtra),
            ],
            &catalog,
        );

        assert_eq!(outcome.toppings.len(), 1);
        assert_eq!(outcome.toppings[0].amount, ToppingAmount::Xxtra);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_sauce_exclusivity_last_wins() {
        let mut catalog = CatalogSnapshot::new("r-1");
        catalog.add_customization(sauce("c-marinara"));
        catalog.add_customization(sauce("c-bbq"));

        let outcome = merge_defaults(
            None,
            &[
                selection("c-marinara", ToppingAmount::Normal),
                selection("c-bbq", ToppingAmount::Normal),
            ],
            &catalog,
        );

        assert_eq!(outcome.toppings.len(), 1);
        assert_eq!(outcome.toppings[0].customization_id, "c-bbq");
        assert!(outcome.warnings[0].contains("mutually exclusive"));
    }
}

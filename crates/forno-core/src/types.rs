//! # Domain Types
//!
//! Catalog and request types consumed by the pricing calculator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Snapshot                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ Customization   │   │  CrustPricing   │   │   MenuItem      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  size_code      │   │  id             │       │
//! │  │  category       │   │  crust_type     │   │  kind           │       │
//! │  │  base_price     │   │  base_price     │   │  is_deep_dish   │       │
//! │  │  price_type     │   │  upcharge       │   │  variants[]     │       │
//! │  │  pricing_rules  │   │  is_available   │   │  prep minutes   │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                        │                │
//! │                                              ┌─────────┴───────┐        │
//! │                                              │  PizzaTemplate  │        │
//! │                                              │  ─────────────  │        │
//! │                                              │  toppings[]     │        │
//! │                                              │  credit limit   │        │
//! │                                              └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Everything in the snapshot is read-only per calculation. The surrounding
//! service fetches or caches it; the calculator never mutates it. Selections
//! and quotes are created per interaction and replaced on every recalculation
//! until the item is committed to the cart, at which point the price freezes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use ts_rs::TS;

use crate::money::{Money, BPS_ONE};
use crate::placement::Placement;

// =============================================================================
// Size / Crust / Kind
// =============================================================================

/// Pizza size, ordered smallest to largest.
///
/// The derive order matters: `Ord` gives us `SizeCode::smallest()` and the
/// deep-dish gluten-free exclusion rule keys off the smallest size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SizeCode {
    Small,
    Medium,
    Large,
    XLarge,
}

impl SizeCode {
    /// The smallest offered size.
    pub const fn smallest() -> Self {
        SizeCode::Small
    }

    /// Display label shown on receipts and cart lines.
    pub const fn label(&self) -> &'static str {
        match self {
            SizeCode::Small => "10\"",
            SizeCode::Medium => "12\"",
            SizeCode::Large => "14\"",
            SizeCode::XLarge => "16\"",
        }
    }
}

/// Crust type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CrustType {
    Original,
    Thin,
    Pan,
    Stuffed,
    GlutenFree,
}

impl CrustType {
    /// Display label shown on receipts and cart lines.
    pub const fn label(&self) -> &'static str {
        match self {
            CrustType::Original => "Original",
            CrustType::Thin => "Thin",
            CrustType::Pan => "Pan",
            CrustType::Stuffed => "Stuffed",
            CrustType::GlutenFree => "Gluten-Free",
        }
    }
}

/// The kind of customizable item being priced.
///
/// The pricing paths are identical for all kinds; the kind only gates which
/// customizations apply (`Customization::applies_to`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Pizza,
    Chicken,
    Appetizer,
}

// =============================================================================
// Topping Amount
// =============================================================================

/// How much of a topping, totally ordered.
///
/// The order none < light < normal < extra < xxtra is load-bearing: tier
/// schedules must be monotone non-decreasing along it, and "escalated beyond
/// the default" is defined by this ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ToppingAmount {
    None,
    Light,
    Normal,
    Extra,
    Xxtra,
}

impl Default for ToppingAmount {
    fn default() -> Self {
        ToppingAmount::Normal
    }
}

impl ToppingAmount {
    /// Display label for breakdown rows.
    pub const fn label(&self) -> &'static str {
        match self {
            ToppingAmount::None => "none",
            ToppingAmount::Light => "light",
            ToppingAmount::Normal => "normal",
            ToppingAmount::Extra => "extra",
            ToppingAmount::Xxtra => "xxtra",
        }
    }
}

// =============================================================================
// Customization Category / Tier
// =============================================================================

/// Catalog category of a customization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationCategory {
    ToppingNormal,
    ToppingPremium,
    ToppingBeef,
    ToppingCheese,
    ToppingSauce,
    WhiteMeat,
    Sides,
    Preparation,
    Condiments,
}

impl CustomizationCategory {
    /// Whether this category is a sauce.
    ///
    /// Sauces are mutually exclusive and always free, regardless of tier.
    pub const fn is_sauce(&self) -> bool {
        matches!(self, CustomizationCategory::ToppingSauce)
    }

    /// Cost tier used to select the amount-to-multiplier schedule.
    ///
    /// Cheese and the non-topping categories price on the normal schedule.
    pub const fn tier(&self) -> ToppingTier {
        match self {
            CustomizationCategory::ToppingPremium => ToppingTier::Premium,
            CustomizationCategory::ToppingBeef => ToppingTier::Beef,
            _ => ToppingTier::Normal,
        }
    }

    /// Sort rank for the breakdown list.
    ///
    /// Premium and beef sort before normal, then cheese, then sauce, then
    /// the non-topping categories.
    pub const fn breakdown_priority(&self) -> u8 {
        match self {
            CustomizationCategory::ToppingPremium => 0,
            CustomizationCategory::ToppingBeef => 1,
            CustomizationCategory::ToppingNormal => 2,
            CustomizationCategory::ToppingCheese => 3,
            CustomizationCategory::ToppingSauce => 4,
            CustomizationCategory::WhiteMeat => 5,
            CustomizationCategory::Sides => 6,
            CustomizationCategory::Preparation => 7,
            CustomizationCategory::Condiments => 8,
        }
    }
}

/// Topping cost class selecting a distinct amount-to-multiplier schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ToppingTier {
    Normal,
    Premium,
    Beef,
}

// =============================================================================
// Pricing Rules
// =============================================================================

/// How a customization's base price reacts to amount and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Base price regardless of amount and size (placement still applies).
    Fixed,
    /// Base × normal amount schedule × size multiplier.
    Multiplied,
    /// Base × the tier's own amount schedule × size multiplier.
    Tiered,
}

/// Amount-to-multiplier schedule for one tier, in basis points.
///
/// ## Invariant
/// Must be monotone non-decreasing along none < light < normal < extra <
/// xxtra, and `none` must be 0; `is_monotonic` checks both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierSchedule {
    pub none_bps: u32,
    pub light_bps: u32,
    pub normal_bps: u32,
    pub extra_bps: u32,
    pub xxtra_bps: u32,
}

impl TierSchedule {
    /// Multiplier for a given amount.
    pub const fn bps_for(&self, amount: ToppingAmount) -> u32 {
        match amount {
            ToppingAmount::None => self.none_bps,
            ToppingAmount::Light => self.light_bps,
            ToppingAmount::Normal => self.normal_bps,
            ToppingAmount::Extra => self.extra_bps,
            ToppingAmount::Xxtra => self.xxtra_bps,
        }
    }

    /// Checks the monotonicity invariant (and that `none` prices at zero).
    pub const fn is_monotonic(&self) -> bool {
        self.none_bps == 0
            && self.none_bps <= self.light_bps
            && self.light_bps <= self.normal_bps
            && self.normal_bps <= self.extra_bps
            && self.extra_bps <= self.xxtra_bps
    }
}

/// Per-tier schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierSchedules {
    pub normal: TierSchedule,
    pub premium: TierSchedule,
    pub beef: TierSchedule,
}

impl TierSchedules {
    /// Schedule for a tier.
    pub const fn for_tier(&self, tier: ToppingTier) -> &TierSchedule {
        match tier {
            ToppingTier::Normal => &self.normal,
            ToppingTier::Premium => &self.premium,
            ToppingTier::Beef => &self.beef,
        }
    }
}

impl Default for TierSchedules {
    /// House defaults: light ×0.5, normal ×1.0, extra ×2.0, xxtra ×3.0 on
    /// the normal tier; premium 1.5× that; beef 2× that.
    fn default() -> Self {
        TierSchedules {
            normal: TierSchedule {
                none_bps: 0,
                light_bps: 5_000,
                normal_bps: 10_000,
                extra_bps: 20_000,
                xxtra_bps: 30_000,
            },
            premium: TierSchedule {
                none_bps: 0,
                light_bps: 7_500,
                normal_bps: 15_000,
                extra_bps: 30_000,
                xxtra_bps: 45_000,
            },
            beef: TierSchedule {
                none_bps: 0,
                light_bps: 10_000,
                normal_bps: 20_000,
                extra_bps: 40_000,
                xxtra_bps: 60_000,
            },
        }
    }
}

/// Size and tier multipliers for one customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct PricingRules {
    /// Per-size multipliers in bps. A missing size means ×1.0.
    pub size_bps: BTreeMap<SizeCode, u32>,

    /// Amount schedules per tier.
    #[serde(default)]
    pub schedules: TierSchedules,
}

impl PricingRules {
    /// Size multiplier for a size, defaulting to ×1.0.
    pub fn size_multiplier_bps(&self, size: SizeCode) -> u32 {
        self.size_bps.get(&size).copied().unwrap_or(BPS_ONE)
    }
}

// =============================================================================
// Customization
// =============================================================================

/// One topping/modifier in the per-restaurant catalog.
///
/// Immutable per catalog snapshot; owned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customization {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in the breakdown and on receipts.
    pub name: String,

    /// Catalog category (determines tier and breakdown ordering).
    pub category: CustomizationCategory,

    /// Base price in cents before any multipliers.
    pub base_price_cents: i64,

    /// How the base price reacts to amount and size.
    pub price_type: PriceType,

    /// Size multipliers and tier schedules.
    #[serde(default)]
    pub pricing_rules: PricingRules,

    /// Item kinds this customization may be applied to.
    pub applies_to: BTreeSet<ItemKind>,
}

impl Customization {
    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// The cost tier of this customization.
    #[inline]
    pub fn tier(&self) -> ToppingTier {
        self.category.tier()
    }

    /// Whether this customization applies to the given item kind.
    pub fn applies_to_kind(&self, kind: ItemKind) -> bool {
        self.applies_to.contains(&kind)
    }
}

// =============================================================================
// Crust Pricing
// =============================================================================

/// One row of the crust/size price table.
///
/// Absence of a row for a (size, crust) pair means "not offered"; the
/// calculator fails rather than guessing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrustPricing {
    pub size_code: SizeCode,
    pub crust_type: CrustType,
    /// Generic base price for non-specialty items, in cents.
    pub base_price_cents: i64,
    /// Crust upcharge applied on top of any base, in cents.
    pub upcharge_cents: i64,
    /// Rows can be temporarily switched off without being deleted.
    pub is_available: bool,
}

impl CrustPricing {
    /// Returns the generic base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Returns the crust upcharge as Money.
    #[inline]
    pub fn upcharge(&self) -> Money {
        Money::from_cents(self.upcharge_cents)
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A per-size priced variant of a menu item.
///
/// For specialty items this is the base price source, never the generic
/// crust table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItemVariant {
    pub size_code: SizeCode,
    pub price_cents: i64,
}

/// A customizable menu item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,

    /// Deep-dish style items reject gluten-free crust at the smallest size.
    pub is_deep_dish: bool,

    /// Per-size priced variants (specialty base price source).
    pub variants: Vec<MenuItemVariant>,

    /// Kitchen prep estimate before topping adjustments, in minutes.
    pub base_prep_minutes: u32,
}

impl MenuItem {
    /// Priced variant for a size, if one exists.
    pub fn variant_price(&self, size: SizeCode) -> Option<Money> {
        self.variants
            .iter()
            .find(|v| v.size_code == size)
            .map(|v| Money::from_cents(v.price_cents))
    }
}

// =============================================================================
// Pizza Template
// =============================================================================

/// A default topping on a specialty item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplateTopping {
    pub customization_id: String,

    /// Amount included in the specialty price.
    pub default_amount: ToppingAmount,

    /// Whether removing this topping earns a substitution credit.
    pub is_removable: bool,

    /// Tier whose schedule values the topping for credit purposes.
    pub substitution_tier: ToppingTier,

    /// Position in the template's canonical ordering.
    pub sort_order: i32,
}

/// Ordered default toppings for a specialty/pre-configured item.
///
/// Items without a template price through the generic crust/topping path.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PizzaTemplate {
    pub menu_item_id: String,

    /// Cap on each removal's substitution credit, as bps of the removed
    /// default's nominal included value.
    pub credit_limit_bps: u32,

    pub toppings: Vec<TemplateTopping>,
}

impl PizzaTemplate {
    /// Default entry for a customization, if the template includes it.
    pub fn topping(&self, customization_id: &str) -> Option<&TemplateTopping> {
        self.toppings
            .iter()
            .find(|t| t.customization_id == customization_id)
    }

    /// Template toppings in sort order.
    pub fn sorted_toppings(&self) -> Vec<&TemplateTopping> {
        let mut out: Vec<&TemplateTopping> = self.toppings.iter().collect();
        out.sort_by_key(|t| t.sort_order);
        out
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// One topping choice in a calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToppingSelection {
    pub customization_id: String,
    pub amount: ToppingAmount,
    #[serde(default)]
    #[ts(type = "string | Array<string>")]
    pub placement: Placement,
}

/// A calculation request, as consumed by the engine.
///
/// Wire shape (snake_case) matches what the ordering frontend sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteRequest {
    pub restaurant_id: String,
    pub menu_item_id: String,
    pub size_code: SizeCode,
    pub crust_type: CrustType,
    #[serde(default)]
    pub toppings: Vec<ToppingSelection>,
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Read-only catalog bundle handed to the calculator per request.
///
/// Supplied by the menu-administration subsystem (out of scope here). The
/// calculator is a pure function of (snapshot, request); later catalog edits
/// never retroactively alter already-configured cart items.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub restaurant_id: String,
    customizations: HashMap<String, Customization>,
    crust_prices: HashMap<(SizeCode, CrustType), CrustPricing>,
    templates: HashMap<String, PizzaTemplate>,
    items: HashMap<String, MenuItem>,
}

impl CatalogSnapshot {
    /// Creates an empty snapshot for a restaurant.
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        CatalogSnapshot {
            restaurant_id: restaurant_id.into(),
            ..Default::default()
        }
    }

    /// Adds a customization to the snapshot.
    pub fn add_customization(&mut self, customization: Customization) {
        self.customizations
            .insert(customization.id.clone(), customization);
    }

    /// Adds a crust pricing row to the snapshot.
    pub fn add_crust_pricing(&mut self, row: CrustPricing) {
        self.crust_prices
            .insert((row.size_code, row.crust_type), row);
    }

    /// Adds a template, keyed by its menu item.
    pub fn add_template(&mut self, template: PizzaTemplate) {
        self.templates
            .insert(template.menu_item_id.clone(), template);
    }

    /// Adds a menu item to the snapshot.
    pub fn add_item(&mut self, item: MenuItem) {
        self.items.insert(item.id.clone(), item);
    }

    /// Looks up a customization by id.
    pub fn customization(&self, id: &str) -> Option<&Customization> {
        self.customizations.get(id)
    }

    /// Looks up the crust pricing row for a (size, crust) pair.
    pub fn crust_row(&self, size: SizeCode, crust: CrustType) -> Option<&CrustPricing> {
        self.crust_prices.get(&(size, crust))
    }

    /// Looks up the template for a menu item, if it is a specialty item.
    pub fn template_for(&self, menu_item_id: &str) -> Option<&PizzaTemplate> {
        self.templates.get(menu_item_id)
    }

    /// Looks up a menu item by id.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_ordering() {
        assert!(ToppingAmount::None < ToppingAmount::Light);
        assert!(ToppingAmount::Light < ToppingAmount::Normal);
        assert!(ToppingAmount::Normal < ToppingAmount::Extra);
        assert!(ToppingAmount::Extra < ToppingAmount::Xxtra);
    }

    #[test]
    fn test_default_schedules_are_monotonic() {
        let schedules = TierSchedules::default();
        assert!(schedules.normal.is_monotonic());
        assert!(schedules.premium.is_monotonic());
        assert!(schedules.beef.is_monotonic());
    }

    #[test]
    fn test_non_monotonic_schedule_detected() {
        let broken = TierSchedule {
            none_bps: 0,
            light_bps: 10_000,
            normal_bps: 5_000, // out of order
            extra_bps: 20_000,
            xxtra_bps: 30_000,
        };
        assert!(!broken.is_monotonic());
    }

    #[test]
    fn test_category_tier_mapping() {
        assert_eq!(
            CustomizationCategory::ToppingPremium.tier(),
            ToppingTier::Premium
        );
        assert_eq!(CustomizationCategory::ToppingBeef.tier(), ToppingTier::Beef);
        assert_eq!(
            CustomizationCategory::ToppingCheese.tier(),
            ToppingTier::Normal
        );
        assert!(CustomizationCategory::ToppingSauce.is_sauce());
    }

    #[test]
    fn test_breakdown_priority_order() {
        use CustomizationCategory::*;
        assert!(ToppingPremium.breakdown_priority() < ToppingBeef.breakdown_priority());
        assert!(ToppingBeef.breakdown_priority() < ToppingNormal.breakdown_priority());
        assert!(ToppingNormal.breakdown_priority() < ToppingCheese.breakdown_priority());
        assert!(ToppingCheese.breakdown_priority() < ToppingSauce.breakdown_priority());
    }

    #[test]
    fn test_size_multiplier_defaults_to_one() {
        let rules = PricingRules::default();
        assert_eq!(rules.size_multiplier_bps(SizeCode::Medium), BPS_ONE);

        let mut sized = PricingRules::default();
        sized.size_bps.insert(SizeCode::XLarge, 15_000);
        assert_eq!(sized.size_multiplier_bps(SizeCode::XLarge), 15_000);
        assert_eq!(sized.size_multiplier_bps(SizeCode::Small), BPS_ONE);
    }

    #[test]
    fn test_menu_item_variant_lookup() {
        let item = MenuItem {
            id: "item-1".to_string(),
            name: "Meat Feast".to_string(),
            kind: ItemKind::Pizza,
            is_deep_dish: false,
            variants: vec![
                MenuItemVariant {
                    size_code: SizeCode::Medium,
                    price_cents: 1499,
                },
                MenuItemVariant {
                    size_code: SizeCode::Large,
                    price_cents: 1799,
                },
            ],
            base_prep_minutes: 15,
        };

        assert_eq!(
            item.variant_price(SizeCode::Medium).unwrap().cents(),
            1499
        );
        assert!(item.variant_price(SizeCode::Small).is_none());
    }

    #[test]
    fn test_template_sorted_toppings() {
        let template = PizzaTemplate {
            menu_item_id: "item-1".to_string(),
            credit_limit_bps: 5_000,
            toppings: vec![
                TemplateTopping {
                    customization_id: "c-onions".to_string(),
                    default_amount: ToppingAmount::Normal,
                    is_removable: true,
                    substitution_tier: ToppingTier::Normal,
                    sort_order: 2,
                },
                TemplateTopping {
                    customization_id: "c-pepperoni".to_string(),
                    default_amount: ToppingAmount::Normal,
                    is_removable: true,
                    substitution_tier: ToppingTier::Normal,
                    sort_order: 1,
                },
            ],
        };

        let sorted = template.sorted_toppings();
        assert_eq!(sorted[0].customization_id, "c-pepperoni");
        assert_eq!(sorted[1].customization_id, "c-onions");
        assert!(template.topping("c-onions").is_some());
        assert!(template.topping("c-missing").is_none());
    }

    #[test]
    fn test_request_wire_shape() {
        let json = r#"{
            "restaurant_id": "r-1",
            "menu_item_id": "item-1",
            "size_code": "medium",
            "crust_type": "thin",
            "toppings": [
                { "customization_id": "c-pepperoni", "amount": "extra", "placement": "whole" },
                { "customization_id": "c-mushrooms", "amount": "normal", "placement": ["q1", "q2"] }
            ]
        }"#;

        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.size_code, SizeCode::Medium);
        assert_eq!(request.crust_type, CrustType::Thin);
        assert_eq!(request.toppings.len(), 2);
        assert_eq!(request.toppings[0].amount, ToppingAmount::Extra);
        assert_eq!(request.toppings[1].placement.multiplier_bps(), 5_000);
    }
}

//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A pizza topping priced as:                                             │
//! │    $2.00 × 1.5 × 0.25 × 1.1 = $0.8250000000000001  → which cent?       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    Every multiplier is an integer in basis points (10000 = ×1.0)        │
//! │    200¢ × 15000 × 2500 × 11000 / 10000³ = 82.5¢ → rounds ONCE to 83¢   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forno_core::money::Money;
//!
//! // Create from cents (preferred)
//! let base = Money::from_cents(200); // $2.00
//!
//! // Extra amount (×2.0) on the whole pizza (×1.0) at 12" (×1.0)
//! let topping = base.scale_bps3(20_000, 10_000, 10_000);
//! assert_eq!(topping.cents(), 400); // $4.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(2.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// One whole unit in basis points (×1.0).
///
/// All pricing multipliers in this crate (tier schedules, size factors,
/// placement fractions, credit limits) are expressed in basis points so that
/// price math never touches floating point.
pub const BPS_ONE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for substitution credits
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Customization.base_price ──► topping price ──► PriceQuote.topping_cost
/// CrustPricing.base_price  ──► base price    ──► PriceQuote.final_price
/// MenuItem variant price   ──► specialty base ─► ConfiguredCartItem.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps a negative value up to zero.
    ///
    /// Used for the "floored at 0" rule on escalated template defaults: a
    /// selection below the default amount never produces a negative charge.
    #[inline]
    pub const fn floor_at_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Scales by a single basis-point multiplier with one rounding step.
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    ///
    /// let base = Money::from_cents(200);          // $2.00
    /// assert_eq!(base.scale_bps(5_000).cents(), 100);  // ×0.5 = $1.00
    /// assert_eq!(base.scale_bps(2_500).cents(), 50);   // ×0.25 = $0.50
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        // i128 prevents overflow; +5000 rounds half away from zero
        let scaled = if self.0 >= 0 {
            (self.0 as i128 * bps as i128 + 5_000) / 10_000
        } else {
            (self.0 as i128 * bps as i128 - 5_000) / 10_000
        };
        Money(scaled as i64)
    }

    /// Scales by three basis-point multipliers with a SINGLE rounding step.
    ///
    /// This is the topping price kernel: tier × size × placement applied as
    /// one exact integer product, rounded once at the end. Rounding each
    /// factor separately would accumulate up to 3 cents of drift per topping.
    ///
    /// ## Example
    /// ```rust
    /// use forno_core::money::Money;
    ///
    /// // $2.00 pepperoni, extra (×2.0), 12" (×1.0), whole pizza (×1.0)
    /// let base = Money::from_cents(200);
    /// assert_eq!(base.scale_bps3(20_000, 10_000, 10_000).cents(), 400);
    ///
    /// // Same topping on one quarter (×0.25): $1.00
    /// assert_eq!(base.scale_bps3(20_000, 10_000, 2_500).cents(), 100);
    /// ```
    pub fn scale_bps3(&self, a_bps: u32, b_bps: u32, c_bps: u32) -> Money {
        const DENOM: i128 = 10_000i128 * 10_000 * 10_000;
        let numer = self.0 as i128 * a_bps as i128 * b_bps as i128 * c_bps as i128;
        let scaled = if numer >= 0 {
            (numer + DENOM / 2) / DENOM
        } else {
            (numer - DENOM / 2) / DENOM
        };
        Money(scaled as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and breakdown notes. Use frontend formatting for
/// actual UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

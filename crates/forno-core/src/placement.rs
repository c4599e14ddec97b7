//! # Placement Module
//!
//! Geometric topping placement and its price multiplier.
//!
//! ## Placement Geometry
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Placement → Price Multiplier                         │
//! │                                                                         │
//! │    whole        left        right       quarter     three_quarters      │
//! │   ┌──┬──┐     ┌──┬──┐     ┌──┬──┐     ┌──┬──┐     ┌──┬──┐              │
//! │   │██│██│     │██│  │     │  │██│     │██│  │     │██│██│              │
//! │   ├──┼──┤     ├──┼──┤     ├──┼──┤     ├──┼──┤     ├──┼──┤              │
//! │   │██│██│     │██│  │     │  │██│     │  │  │     │██│  │              │
//! │   └──┴──┘     └──┴──┘     └──┴──┘     └──┴──┘     └──┴──┘              │
//! │    ×1.00       ×0.50       ×0.50       ×0.25       ×0.75               │
//! │                                                                         │
//! │   Explicit quarter sets: {q1,q3} → ×0.50, {q1,q2,q3,q4} ≡ whole        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Placement is a tagged value on the wire: either a string literal
//! (`"whole"`, `"left"`, ...) or an array of quarter tags (`["q1","q3"]`).
//! The serde impls below accept and produce both shapes; internally it is
//! always the sum type with an exhaustive match in `multiplier_bps`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ValidationError;
use crate::money::BPS_ONE;

// =============================================================================
// Quarter
// =============================================================================

/// One quarter of the pie, numbered clockwise from top-left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// All four quarters in canonical order.
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Wire tag for this quarter.
    pub const fn tag(&self) -> &'static str {
        match self {
            Quarter::Q1 => "q1",
            Quarter::Q2 => "q2",
            Quarter::Q3 => "q3",
            Quarter::Q4 => "q4",
        }
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Where on the item a topping goes.
///
/// ## Design Note
/// This is deliberately a sum type, not a string. The placement multiplier
/// function matches exhaustively, so adding a new placement is a compile
/// error everywhere it matters instead of a silent ×1.0.
///
/// `Quarters` uses a `BTreeSet` so the set is deduplicated and ordered:
/// `["q3","q1","q3"]` and `["q1","q3"]` are the same placement, which also
/// keeps the canonical request key (used for de-duplication upstream) stable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placement {
    /// The entire item (default).
    Whole,
    /// Left half.
    Left,
    /// Right half.
    Right,
    /// A single (unspecified) quarter.
    Quarter,
    /// Three quarters.
    ThreeQuarters,
    /// An explicit set of quarters, 1..=4 distinct members.
    Quarters(BTreeSet<Quarter>),
}

impl Placement {
    /// Price multiplier for this placement, in basis points.
    ///
    /// Exhaustive by construction: whole 10000, halves 5000, quarter 2500,
    /// three-quarters 7500, explicit set 2500 × |set|.
    pub fn multiplier_bps(&self) -> u32 {
        match self {
            Placement::Whole => BPS_ONE,
            Placement::Left | Placement::Right => 5_000,
            Placement::Quarter => 2_500,
            Placement::ThreeQuarters => 7_500,
            Placement::Quarters(set) => 2_500 * set.len() as u32,
        }
    }

    /// Rejects placements that cover nothing.
    ///
    /// An empty quarter set is the only invalid state the type can express;
    /// more than four members is unrepresentable (distinct set over four
    /// tags).
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Placement::Quarters(set) if set.is_empty() => Err(ValidationError::EmptyQuarterSet),
            _ => Ok(()),
        }
    }

    /// Collapses equivalent forms: a four-member quarter set IS `whole`.
    ///
    /// Used before canonical encoding so `["q1","q2","q3","q4"]` and
    /// `"whole"` de-duplicate to the same request key.
    pub fn normalized(&self) -> Placement {
        match self {
            Placement::Quarters(set) if set.len() == 4 => Placement::Whole,
            other => other.clone(),
        }
    }

    /// Canonical token for request de-duplication keys.
    ///
    /// Stable across equivalent spellings of the same placement.
    pub fn canonical_token(&self) -> String {
        match self.normalized() {
            Placement::Whole => "whole".to_string(),
            Placement::Left => "left".to_string(),
            Placement::Right => "right".to_string(),
            Placement::Quarter => "quarter".to_string(),
            Placement::ThreeQuarters => "three_quarters".to_string(),
            Placement::Quarters(set) => {
                let tags: Vec<&str> = set.iter().map(Quarter::tag).collect();
                tags.join("+")
            }
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Whole
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_token())
    }
}

// =============================================================================
// Wire Format (serde)
// =============================================================================

/// Intermediate shape for the tagged wire format.
///
/// A placement arrives either as a string literal or as an array of quarter
/// tags; serde's untagged representation distinguishes the two.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PlacementRepr {
    Literal(String),
    QuarterSet(Vec<Quarter>),
}

impl Serialize for Placement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let repr = match self {
            Placement::Quarters(set) => {
                PlacementRepr::QuarterSet(set.iter().copied().collect())
            }
            literal => PlacementRepr::Literal(literal.canonical_token()),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PlacementRepr::deserialize(deserializer)? {
            PlacementRepr::Literal(s) => match s.as_str() {
                "whole" => Ok(Placement::Whole),
                "left" => Ok(Placement::Left),
                "right" => Ok(Placement::Right),
                "quarter" => Ok(Placement::Quarter),
                "three_quarters" => Ok(Placement::ThreeQuarters),
                other => Err(serde::de::Error::custom(format!(
                    "unknown placement literal: {other}"
                ))),
            },
            PlacementRepr::QuarterSet(quarters) => {
                // Duplicates collapse silently; the set is what matters
                Ok(Placement::Quarters(quarters.into_iter().collect()))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # forno-engine: Request Coalescing Layer for Forno POS
//!
//! This crate wraps [`forno_core`] with the interactive recalculation loop:
//! every selection change on the ordering screen becomes a submission, and
//! the coalescer turns bursts of submissions into the minimum number of
//! actual calculations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Forno POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Ordering Frontend (out of scope)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ submit(QuoteRequest)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ forno-engine (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   CoalescerHandle ──► QuoteCoalescer task ──► QuoteEvent stream │   │
//! │  │        │                     │                                  │   │
//! │  │        │              PricingBackend trait                      │   │
//! │  └────────┼─────────────────────┼──────────────────────────────────┘   │
//! │           │                     │                                      │
//! │  ┌────────▼─────────────────────▼──────────────────────────────────┐   │
//! │  │                    forno-core (pure pricing)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coalescer`] - Debounce, de-duplication, last-writer-wins delivery
//! - [`backend`] - The [`PricingBackend`] seam and the snapshot-backed impl
//! - [`error`] - Engine lifecycle errors
//!
//! ## Why a Separate Crate?
//!
//! Timing and channels are runtime concerns; forno-core stays a pure
//! function of (snapshot, request) with no tokio dependency. Keeping the
//! loop here means pricing tests never touch a clock and coalescer tests
//! never touch pricing rules.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod coalescer;
pub mod error;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backend::{PricingBackend, SnapshotBackend};
pub use coalescer::{
    canonical_key, CoalescerConfig, CoalescerHandle, QuoteCoalescer, QuoteEvent, DEFAULT_DEBOUNCE,
};
pub use error::{EngineError, EngineResult};

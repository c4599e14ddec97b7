//! # Pricing Backend
//!
//! The seam between the coalescing layer and the actual calculation.
//!
//! The production backend wraps a [`PricingCalculator`] and a catalog
//! snapshot; tests substitute counting or failing backends to observe how
//! many calculations the coalescer actually issues.

use forno_core::pricing::{PriceQuote, PricingCalculator};
use forno_core::types::{CatalogSnapshot, QuoteRequest};
use forno_core::PricingResult;

/// Trait for computing a quote on behalf of the coalescer.
///
/// Implementations must be cheap and side-effect free; the coalescer calls
/// them at most once per settled debounce window.
pub trait PricingBackend: Send + Sync + 'static {
    /// Prices one request.
    fn quote(&self, request: &QuoteRequest) -> PricingResult<PriceQuote>;
}

/// Backend over an in-memory catalog snapshot.
///
/// The snapshot is read-only for the backend's lifetime; swapping in a
/// fresh catalog means building a fresh backend (and coalescer), which is
/// exactly the price-freezing lifecycle the cart expects.
pub struct SnapshotBackend {
    catalog: CatalogSnapshot,
    calculator: PricingCalculator,
}

impl SnapshotBackend {
    /// Creates a backend over a catalog snapshot.
    pub fn new(catalog: CatalogSnapshot) -> Self {
        SnapshotBackend {
            catalog,
            calculator: PricingCalculator::new(),
        }
    }
}

impl PricingBackend for SnapshotBackend {
    fn quote(&self, request: &QuoteRequest) -> PricingResult<PriceQuote> {
        self.calculator.quote(&self.catalog, request)
    }
}

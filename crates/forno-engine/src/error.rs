//! # Engine Error Types
//!
//! Failures of the coalescing layer itself. Pricing failures travel inside
//! [`QuoteEvent`](crate::coalescer::QuoteEvent) results, not here.

use thiserror::Error;

/// Coalescer lifecycle errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The coalescer task has stopped and can no longer accept requests.
    #[error("Coalescer is no longer running")]
    ChannelClosed,
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

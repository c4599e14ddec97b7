//! # Quote Coalescer
//!
//! Owns the interactive recalculation loop: debounce, de-duplication, and
//! last-writer-wins delivery.
//!
//! ## Coalescer Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       QuoteCoalescer Loop                               │
//! │                                                                         │
//! │  submit ──► pending request (newest wins) ──► debounce timer            │
//! │  submit ──► replaces pending, timer restarts                            │
//! │                                   │                                     │
//! │                            timer fires                                  │
//! │                                   │                                     │
//! │              key == last settled key? ──yes──► suppressed (no call)     │
//! │                                   │no                                   │
//! │                          backend.quote(request)                         │
//! │                                   │                                     │
//! │          newer submit arrived meanwhile? ──yes──► result DISCARDED      │
//! │                                   │no                                   │
//! │                          QuoteEvent delivered                           │
//! │                                                                         │
//! │  Timers and the "last request" cache live HERE, owned by the task,      │
//! │  never as ambient module state.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - A burst of submissions inside one debounce window issues ONE backend
//!   call, for the last submission.
//! - A request whose canonical key equals the last settled key issues no
//!   backend call at all.
//! - A result is delivered only if no newer submission exists; superseded
//!   results are discarded whole, never merged.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use forno_core::pricing::PriceQuote;
use forno_core::types::QuoteRequest;
use forno_core::PricingError;

use crate::backend::PricingBackend;
use crate::error::{EngineError, EngineResult};

/// Default debounce window for coalescing selection bursts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

// =============================================================================
// Configuration
// =============================================================================

/// Coalescer tuning knobs.
#[derive(Debug, Clone)]
pub struct CoalescerConfig {
    /// How long to wait after the last submission before pricing.
    pub debounce: Duration,

    /// Event channel capacity.
    pub event_buffer: usize,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        CoalescerConfig {
            debounce: DEFAULT_DEBOUNCE,
            event_buffer: 16,
        }
    }
}

// =============================================================================
// Events and Commands
// =============================================================================

/// One delivered calculation outcome.
///
/// `generation` increases with every submission; consumers that buffer
/// events can drop any event older than the newest seen.
#[derive(Debug)]
pub struct QuoteEvent {
    /// Submission generation this event settles.
    pub generation: u64,

    /// Canonical key of the priced request.
    pub key: String,

    /// The calculation outcome.
    pub result: Result<PriceQuote, PricingError>,
}

enum Command {
    Submit(QuoteRequest),
    Shutdown,
}

// =============================================================================
// Canonical Request Key
// =============================================================================

/// Canonical encoding of a request for de-duplication.
///
/// Topping order and equivalent placement spellings (`whole` vs the full
/// quarter set) do not affect the key.
pub fn canonical_key(request: &QuoteRequest) -> String {
    let mut toppings: Vec<String> = request
        .toppings
        .iter()
        .map(|t| {
            format!(
                "{}@{}@{}",
                t.customization_id,
                t.amount.label(),
                t.placement.canonical_token()
            )
        })
        .collect();
    toppings.sort();

    format!(
        "{}|{}|{:?}|{:?}|{}",
        request.restaurant_id,
        request.menu_item_id,
        request.size_code,
        request.crust_type,
        toppings.join(",")
    )
    .to_lowercase()
}

// =============================================================================
// Quote Coalescer
// =============================================================================

/// Handle for submitting requests to a running coalescer.
#[derive(Clone)]
pub struct CoalescerHandle {
    cmd_tx: mpsc::Sender<Command>,
}

impl CoalescerHandle {
    /// Submits a (possibly rapid-fire) recalculation request.
    ///
    /// Submissions inside one debounce window coalesce; only the newest is
    /// ever priced.
    pub async fn submit(&self, request: QuoteRequest) -> EngineResult<()> {
        self.cmd_tx
            .send(Command::Submit(request))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Signals the coalescer to shut down gracefully.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
    }
}

/// The coalescing task.
pub struct QuoteCoalescer {
    backend: Arc<dyn PricingBackend>,
    config: CoalescerConfig,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<QuoteEvent>,
}

impl QuoteCoalescer {
    /// Spawns a coalescer task over the given backend.
    ///
    /// Returns the submission handle and the event stream. The task runs
    /// until `shutdown` is called or every handle is dropped.
    pub fn spawn(
        backend: Arc<dyn PricingBackend>,
        config: CoalescerConfig,
    ) -> (CoalescerHandle, mpsc::Receiver<QuoteEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer);

        let coalescer = QuoteCoalescer {
            backend,
            config,
            cmd_rx,
            event_tx,
        };
        tokio::spawn(coalescer.run());

        (CoalescerHandle { cmd_tx }, event_rx)
    }

    /// Main loop: collect submissions, debounce, price, deliver.
    async fn run(mut self) {
        info!(debounce_ms = self.config.debounce.as_millis() as u64, "Quote coalescer started");

        let mut generation: u64 = 0;
        let mut pending: Option<(QuoteRequest, String, u64)> = None;
        let mut deadline: Option<Instant> = None;
        let mut last_settled_key: Option<String> = None;

        loop {
            tokio::select! {
                maybe_cmd = self.cmd_rx.recv() => {
                    match maybe_cmd {
                        Some(Command::Submit(request)) => {
                            generation += 1;
                            let key = canonical_key(&request);
                            debug!(generation, %key, "Submission received");
                            pending = Some((request, key, generation));
                            deadline = Some(Instant::now() + self.config.debounce);
                        }
                        Some(Command::Shutdown) | None => {
                            info!("Quote coalescer shutting down");
                            break;
                        }
                    }
                }

                _ = sleep_until_deadline(deadline), if deadline.is_some() => {
                    deadline = None;
                    let Some((request, key, request_generation)) = pending.take() else {
                        continue;
                    };

                    // Duplicate suppression: identical serialized request,
                    // no second calculation
                    if last_settled_key.as_deref() == Some(key.as_str()) {
                        debug!(%key, "Duplicate request suppressed");
                        continue;
                    }

                    let result = self.backend.quote(&request);

                    // Last-writer-wins: a submission that raced the
                    // calculation supersedes this result entirely
                    let mut superseded = false;
                    let mut shutting_down = false;
                    while let Ok(cmd) = self.cmd_rx.try_recv() {
                        match cmd {
                            Command::Submit(newer) => {
                                generation += 1;
                                let newer_key = canonical_key(&newer);
                                pending = Some((newer, newer_key, generation));
                                deadline = Some(Instant::now() + self.config.debounce);
                                superseded = true;
                            }
                            Command::Shutdown => {
                                shutting_down = true;
                            }
                        }
                    }

                    if superseded {
                        debug!(
                            generation = request_generation,
                            "Superseded calculation discarded"
                        );
                    } else {
                        if result.is_ok() {
                            last_settled_key = Some(key.clone());
                        }
                        let event = QuoteEvent {
                            generation: request_generation,
                            key,
                            result,
                        };
                        if self.event_tx.send(event).await.is_err() {
                            warn!("Event receiver dropped; stopping coalescer");
                            break;
                        }
                    }

                    if shutting_down {
                        info!("Quote coalescer shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Sleeps until the deadline; callers gate this branch on `deadline.is_some()`.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        // Unreachable under the select! guard
        None => std::future::pending().await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forno_core::crust::BasePriceSource;
    use forno_core::placement::{Placement, Quarter};
    use forno_core::types::{CrustType, SizeCode, ToppingAmount, ToppingSelection};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that counts calls and echoes a fixed price.
    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn new() -> Arc<Self> {
            Arc::new(CountingBackend {
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PricingBackend for CountingBackend {
        fn quote(&self, request: &QuoteRequest) -> forno_core::PricingResult<PriceQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PriceQuote {
                base_price_cents: 999,
                base_price_source: BasePriceSource::Regular,
                crust_upcharge_cents: 0,
                topping_cost_cents: 100 * request.toppings.len() as i64,
                substitution_credit_cents: 0,
                final_price_cents: 999 + 100 * request.toppings.len() as i64,
                breakdown: vec![],
                size_code: request.size_code,
                crust_type: request.crust_type,
                estimated_prep_minutes: 12,
                warnings: vec![],
            })
        }
    }

    fn request(toppings: Vec<ToppingSelection>) -> QuoteRequest {
        QuoteRequest {
            restaurant_id: "r-1".to_string(),
            menu_item_id: "item-byo".to_string(),
            size_code: SizeCode::Medium,
            crust_type: CrustType::Thin,
            toppings,
        }
    }

    fn selection(id: &str, amount: ToppingAmount, placement: Placement) -> ToppingSelection {
        ToppingSelection {
            customization_id: id.to_string(),
            amount,
            placement,
        }
    }

    fn config() -> CoalescerConfig {
        CoalescerConfig {
            debounce: Duration::from_millis(300),
            event_buffer: 16,
        }
    }

    #[test]
    fn test_canonical_key_ignores_topping_order() {
        let a = request(vec![
            selection("c-pepperoni", ToppingAmount::Extra, Placement::Whole),
            selection("c-mushrooms", ToppingAmount::Normal, Placement::Left),
        ]);
        let b = request(vec![
            selection("c-mushrooms", ToppingAmount::Normal, Placement::Left),
            selection("c-pepperoni", ToppingAmount::Extra, Placement::Whole),
        ]);
        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn test_canonical_key_normalizes_placement_spelling() {
        let explicit = request(vec![selection(
            "c-pepperoni",
            ToppingAmount::Normal,
            Placement::Quarters(BTreeSet::from(Quarter::ALL)),
        )]);
        let literal = request(vec![selection(
            "c-pepperoni",
            ToppingAmount::Normal,
            Placement::Whole,
        )]);
        assert_eq!(canonical_key(&explicit), canonical_key(&literal));
    }

    #[test]
    fn test_canonical_key_distinguishes_amounts() {
        let normal = request(vec![selection(
            "c-pepperoni",
            ToppingAmount::Normal,
            Placement::Whole,
        )]);
        let extra = request(vec![selection(
            "c-pepperoni",
            ToppingAmount::Extra,
            Placement::Whole,
        )]);
        assert_ne!(canonical_key(&normal), canonical_key(&extra));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_calculation() {
        let backend = CountingBackend::new();
        let (handle, mut events) = QuoteCoalescer::spawn(backend.clone(), config());

        // Three rapid-fire submissions inside one debounce window
        handle.submit(request(vec![])).await.unwrap();
        handle
            .submit(request(vec![selection(
                "c-pepperoni",
                ToppingAmount::Normal,
                Placement::Whole,
            )]))
            .await
            .unwrap();
        handle
            .submit(request(vec![
                selection("c-pepperoni", ToppingAmount::Normal, Placement::Whole),
                selection("c-mushrooms", ToppingAmount::Light, Placement::Left),
            ]))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(400)).await;

        let event = events.recv().await.unwrap();
        assert_eq!(backend.calls(), 1);
        // Only the LAST submission was priced
        assert_eq!(event.result.unwrap().topping_cost_cents, 200);
        assert_eq!(event.generation, 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_request_suppressed() {
        let backend = CountingBackend::new();
        let (handle, mut events) = QuoteCoalescer::spawn(backend.clone(), config());

        let req = request(vec![selection(
            "c-pepperoni",
            ToppingAmount::Extra,
            Placement::Whole,
        )]);

        handle.submit(req.clone()).await.unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;
        let first = events.recv().await.unwrap();
        assert!(first.result.is_ok());

        // Same serialized request again: no second backend call, no event
        handle.submit(req).await.unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;

        assert_eq!(backend.calls(), 1);
        assert!(events.try_recv().is_err());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_requests_each_settle() {
        let backend = CountingBackend::new();
        let (handle, mut events) = QuoteCoalescer::spawn(backend.clone(), config());

        handle.submit(request(vec![])).await.unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;
        let first = events.recv().await.unwrap();

        handle
            .submit(request(vec![selection(
                "c-pepperoni",
                ToppingAmount::Normal,
                Placement::Whole,
            )]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;
        let second = events.recv().await.unwrap();

        assert_eq!(backend.calls(), 2);
        assert!(second.generation > first.generation);
        assert_ne!(first.key, second.key);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_equivalent_spelling_suppressed_after_settle() {
        let backend = CountingBackend::new();
        let (handle, mut events) = QuoteCoalescer::spawn(backend.clone(), config());

        handle
            .submit(request(vec![selection(
                "c-pepperoni",
                ToppingAmount::Normal,
                Placement::Whole,
            )]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;
        assert!(events.recv().await.is_some());

        // Same placement spelled as the full quarter set
        handle
            .submit(request(vec![selection(
                "c-pepperoni",
                ToppingAmount::Normal,
                Placement::Quarters(BTreeSet::from(Quarter::ALL)),
            )]))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;

        assert_eq!(backend.calls(), 1);
        assert!(events.try_recv().is_err());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_shutdown_fails() {
        let backend = CountingBackend::new();
        let (handle, _events) = QuoteCoalescer::spawn(backend, config());

        handle.shutdown().await;
        // Give the task a tick to observe the command
        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        let result = handle.submit(request(vec![])).await;
        assert!(matches!(result, Err(EngineError::ChannelClosed)));
    }
}

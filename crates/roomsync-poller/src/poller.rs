//! Availability poller: fetch a snapshot, reconcile it into the card surface.
//! Runs on a fixed period with a single-flight policy.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

use roomsync_core::{CardSurface, PollError, ReconcileReport, reconcile};
use roomsync_http::AvailabilityFetcher;

use crate::flight::SingleFlight;
use crate::stats::PollStats;

pub type PollResult = Result<ReconcileReport, PollError>;

/// Fetch one snapshot and reconcile it into `surface`.
///
/// The surface lock is taken only after the fetch completes, so a slow
/// endpoint never blocks readers of the board. On any error the surface is
/// not touched.
pub async fn poll_once<F, S>(fetcher: &F, surface: &Mutex<S>) -> PollResult
where
    F: AvailabilityFetcher + ?Sized,
    S: CardSurface + ?Sized,
{
    let snapshot = fetcher.fetch().await?;
    let mut surface = surface.lock().await;
    Ok(reconcile(&mut *surface, &snapshot))
}

/// Outcome of one scheduler tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A poll was started; the handle resolves to its result.
    Started(JoinHandle<PollResult>),
    /// The previous poll is still in flight; nothing was started.
    Skipped,
}

pub struct Poller<F, S: ?Sized> {
    fetcher: Arc<F>,
    surface: Arc<Mutex<S>>,
    stats: Arc<Mutex<PollStats>>,
    flight: SingleFlight,
}

impl<F, S: ?Sized> Clone for Poller<F, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            surface: Arc::clone(&self.surface),
            stats: Arc::clone(&self.stats),
            flight: self.flight.clone(),
        }
    }
}

impl<F, S> Poller<F, S>
where
    F: AvailabilityFetcher + 'static,
    S: CardSurface + Send + 'static,
{
    pub fn new(fetcher: F, surface: Arc<Mutex<S>>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            surface,
            stats: Arc::new(Mutex::new(PollStats::default())),
            flight: SingleFlight::new(),
        }
    }

    /// Shared counters; the daemon hands these to its status endpoint.
    pub fn stats(&self) -> Arc<Mutex<PollStats>> {
        Arc::clone(&self.stats)
    }

    /// Run one poll now, log its outcome and record it.
    /// Does not consult the single-flight guard.
    pub async fn poll(&self) -> PollResult {
        let result = poll_once(&*self.fetcher, &self.surface).await;

        match &result {
            Ok(report) => {
                tracing::debug!(
                    "availability poll ok: {} matched ({} updated), {} unmatched, {} malformed",
                    report.matched(),
                    report.updated.len(),
                    report.unmatched.len(),
                    report.malformed.len()
                );
                if !report.updated.is_empty() {
                    tracing::info!("room cards updated: {}", report.updated.join(", "));
                }
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "availability poll failed: {e}");
            }
        }

        self.stats.lock().await.record(&result, Utc::now());
        result
    }

    /// Start a poll in the background unless one is already in flight.
    pub async fn tick(&self) -> TickOutcome {
        let Some(guard) = self.flight.try_acquire() else {
            tracing::debug!("availability poll skipped: previous poll still in flight");
            self.stats.lock().await.record_skip();
            return TickOutcome::Skipped;
        };

        let this = self.clone();
        TickOutcome::Started(tokio::spawn(async move {
            let _guard = guard;
            this.poll().await
        }))
    }

    /// Tick every `period`, first tick one period from now. Never returns;
    /// the caller aborts the task on shutdown.
    pub async fn run(self, period: Duration) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("availability poller started (every {}s)", period.as_secs());

        loop {
            ticker.tick().await;
            let _ = self.tick().await;
        }
    }
}

//! Background refresh of the persisted dataset
//!
//! One [`Refresher`] exists per process. A single spawned loop polls dataset
//! freshness on a fixed interval and drives a bulk refresh when the data has
//! aged past the configured threshold. The manual trigger endpoint goes
//! through the same in-flight guard, so no matter how many triggers exist,
//! at most one bulk refresh runs at a time.
//!
//! A failed refresh never stops the loop: every attempt, success or failure,
//! lands in the audit log and the loop waits for its next tick. Readers keep
//! being served from the last successful dataset throughout.

use crate::freshness;
use crate::provider::MarketDataSource;
use alphastream_db::{RefreshLogParams, UpsertStockParams};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Store operations the refresh path needs
#[async_trait]
pub trait RefreshStore: Send + Sync {
    async fn upsert_stock(&self, p: &UpsertStockParams) -> Result<(), sqlx::Error>;
    async fn max_last_updated(&self) -> Result<Option<DateTime<Utc>>, sqlx::Error>;
    async fn append_log(&self, p: &RefreshLogParams) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed refresh store
pub struct PgRefreshStore {
    pool: PgPool,
}

impl PgRefreshStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshStore for PgRefreshStore {
    async fn upsert_stock(&self, p: &UpsertStockParams) -> Result<(), sqlx::Error> {
        alphastream_db::stocks::upsert(&self.pool, p).await
    }

    async fn max_last_updated(&self) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        alphastream_db::stocks::max_last_updated(&self.pool).await
    }

    async fn append_log(&self, p: &RefreshLogParams) -> Result<(), sqlx::Error> {
        alphastream_db::refresh_log::append(&self.pool, p).await
    }
}

/// Outcome of one bulk refresh attempt, mirrored into the audit log
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub stocks_updated: i32,
    pub attempted: usize,
    pub success: bool,
    pub error_message: Option<String>,
    pub duration_seconds: f64,
}

/// True for errors that mean the store itself is unreachable, as opposed to
/// one row being rejected.
fn store_unreachable(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
    )
}

/// Owns the in-flight guard and executes bulk refreshes.
///
/// Shared between the poll loop and the manual trigger endpoint; both funnel
/// through [`Refresher::try_run`], whose compare-and-swap on the guard is
/// what makes "at most one refresh in flight" hold.
pub struct Refresher {
    source: Arc<dyn MarketDataSource>,
    store: Arc<dyn RefreshStore>,
    max_data_age_minutes: f64,
    in_flight: AtomicBool,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        store: Arc<dyn RefreshStore>,
        max_data_age_minutes: f64,
    ) -> Self {
        Self {
            source,
            store,
            max_data_age_minutes,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Consult the freshness oracle against the store's global timestamp
    pub async fn needs_refresh(&self) -> bool {
        match self.store.max_last_updated().await {
            Ok(max) => {
                let age = freshness::dataset_age_minutes(max, Utc::now());
                freshness::needs_refresh(age, self.max_data_age_minutes)
            }
            Err(e) => {
                // Can't tell; don't refresh against a store we can't read
                warn!(error = %e, "Failed to read dataset age; skipping check");
                false
            }
        }
    }

    /// Refresh if the dataset is stale. Called by the poll loop every tick.
    pub async fn refresh_if_stale(&self) {
        if self.needs_refresh().await {
            self.try_run().await;
        }
    }

    /// Run one bulk refresh unless one is already in flight. Returns whether
    /// a run was started; the skip case is how concurrent triggers collapse
    /// into a single execution.
    pub async fn try_run(&self) -> bool {
        if !self.acquire() {
            return false;
        }
        self.run_acquired().await;
        true
    }

    /// Manual-trigger variant: start the refresh on a spawned task and report
    /// immediately whether it was started. Shares the same guard as the poll
    /// loop, so a trigger during an in-flight run is a no-op.
    pub fn start_background(self: &Arc<Self>) -> bool {
        if !self.acquire() {
            return false;
        }
        let refresher = self.clone();
        tokio::spawn(async move {
            refresher.run_acquired().await;
        });
        true
    }

    fn acquire(&self) -> bool {
        let acquired = self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !acquired {
            info!("Bulk refresh already in flight; skipping");
        }
        acquired
    }

    /// Runs with the guard held and releases it. Callers must have won
    /// [`Refresher::acquire`].
    async fn run_acquired(&self) {
        let outcome = self.execute().await;

        let log = RefreshLogParams {
            stocks_updated: outcome.stocks_updated,
            data_source: self.source.source_name().to_string(),
            success: outcome.success,
            error_message: outcome.error_message.clone(),
            duration_seconds: outcome.duration_seconds,
        };
        if let Err(e) = self.store.append_log(&log).await {
            error!(error = %e, "Failed to append refresh audit record");
        }

        self.in_flight.store(false, Ordering::SeqCst);

        if outcome.success {
            info!(
                updated = outcome.stocks_updated,
                attempted = outcome.attempted,
                duration_seconds = outcome.duration_seconds,
                "Bulk refresh completed"
            );
        } else {
            warn!(
                error = outcome.error_message.as_deref().unwrap_or("unknown"),
                duration_seconds = outcome.duration_seconds,
                "Bulk refresh failed"
            );
        }
    }

    /// The bulk refresh executor: fetch the full dataset, upsert row by row.
    /// One rejected row reduces the count; an unreachable provider or store
    /// aborts the run. Rows already written before an abort stay written.
    async fn execute(&self) -> RefreshOutcome {
        let started = Instant::now();

        let batch = match self.source.fetch_batch().await {
            Ok(batch) => batch,
            Err(e) => {
                let message = if e.is_rate_limited() {
                    "provider rate limit exceeded".to_string()
                } else {
                    e.to_string()
                };
                return RefreshOutcome {
                    stocks_updated: 0,
                    attempted: 0,
                    success: false,
                    error_message: Some(message),
                    duration_seconds: started.elapsed().as_secs_f64(),
                };
            }
        };

        let attempted = batch.len();
        let mut updated = 0;
        for params in &batch {
            match self.store.upsert_stock(params).await {
                Ok(()) => updated += 1,
                Err(e) if store_unreachable(&e) => {
                    return RefreshOutcome {
                        stocks_updated: updated,
                        attempted,
                        success: false,
                        error_message: Some(format!("store unavailable: {}", e)),
                        duration_seconds: started.elapsed().as_secs_f64(),
                    };
                }
                Err(e) => {
                    warn!(ticker = %params.ticker, error = %e, "Failed to upsert stock; continuing");
                }
            }
        }

        RefreshOutcome {
            stocks_updated: updated,
            attempted,
            success: true,
            error_message: None,
            duration_seconds: started.elapsed().as_secs_f64(),
        }
    }
}

/// Handle to the background poll loop; dropping it does not stop the loop,
/// call [`RefreshHandle::stop`] during shutdown.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal the loop to stop and wait for it to finish. A refresh that is
    /// mid-run completes (and is audited) before the task exits.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Refresh coordinator task panicked");
        }
    }
}

/// Start the refresh coordinator loop. The first tick fires immediately, so
/// an empty store is populated right after startup rather than one interval
/// later.
pub fn spawn_coordinator(refresher: Arc<Refresher>, poll_interval: Duration) -> RefreshHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            poll_interval_seconds = poll_interval.as_secs(),
            "Refresh coordinator started"
        );
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    refresher.refresh_if_stale().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("Refresh coordinator stopping");
                    break;
                }
            }
        }
    });

    RefreshHandle { shutdown, task }
}

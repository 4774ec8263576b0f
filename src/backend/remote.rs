//! Remote-collector backend.
//!
//! # Data Flow
//! ```text
//! accept(), called from the producer context, sync, never network-blocking
//!     → bounded queue (try_send; full queue drops + counts)
//!     → worker thread (own current-thread tokio runtime)
//!     → batches of events → JSON POST via reqwest
//!     → bounded retries with jittered backoff on transient failure
//! ```
//!
//! # States
//! - Normal: batches are shipped as they fill or on the flush tick
//! - Degraded: batches are dropped and counted until the cooldown elapses,
//!   then the next live send attempt doubles as the health re-check
//!
//! # State Transitions
//! ```text
//! Normal → Degraded: retry budget exhausted twice in a row, or the
//!                    collector rejects the request outright (4xx)
//! Degraded → Normal: a send attempt after the cooldown succeeds
//! ```
//!
//! # Design Decisions
//! - The worker owns its runtime so the library works from any thread and
//!   never competes with the embedder's executor
//! - Producer latency is decoupled from collector latency by the queue
//! - Shutdown drains within the grace period; whatever remains afterwards
//!   is dropped and counted

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::backend::{Backend, BackendError};
use crate::config::RemoteCollectorConfig;
use crate::event::LogEvent;
use crate::resilience::calculate_backoff;

/// Consecutive retry-budget exhaustions before the backend degrades.
const DEGRADE_AFTER_EXHAUSTIONS: u32 = 2;

/// Bound on how long `flush` waits for the worker's acknowledgement.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

enum Control {
    Flush(std::sync::mpsc::SyncSender<()>),
    Shutdown {
        grace: Duration,
        ack: std::sync::mpsc::SyncSender<()>,
    },
}

pub struct RemoteCollectorBackend {
    events: mpsc::Sender<LogEvent>,
    control: mpsc::UnboundedSender<Control>,
    dropped: Arc<AtomicU64>,
    closed: AtomicBool,
}

impl RemoteCollectorBackend {
    /// Spawn the worker thread and return the producer-side handle.
    pub fn new(config: RemoteCollectorConfig) -> std::io::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(config.queue_capacity);
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let dropped = Arc::new(AtomicU64::new(0));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let worker = Worker {
            config,
            events: event_rx,
            control: control_rx,
            buffer: Vec::new(),
            dropped: dropped.clone(),
            degraded_until: None,
            consecutive_exhaustions: 0,
        };

        std::thread::Builder::new()
            .name("logsink-remote".to_string())
            .spawn(move || runtime.block_on(worker.run()))?;

        Ok(Self {
            events: event_tx,
            control: control_tx,
            dropped,
            closed: AtomicBool::new(false),
        })
    }
}

impl Backend for RemoteCollectorBackend {
    fn name(&self) -> &'static str {
        "remote_collector"
    }

    fn accept(&self, event: &LogEvent) -> Result<(), BackendError> {
        if self.closed.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(BackendError::Permanent("backend closed".into()));
        }
        match self.events.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(BackendError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(BackendError::Permanent("worker stopped".into()))
            }
        }
    }

    fn flush(&self) -> Result<(), BackendError> {
        let (ack_tx, ack_rx) = std::sync::mpsc::sync_channel(1);
        self.control
            .send(Control::Flush(ack_tx))
            .map_err(|_| BackendError::Permanent("worker stopped".into()))?;
        ack_rx
            .recv_timeout(FLUSH_TIMEOUT)
            .map_err(|_| BackendError::Transient("flush timed out".into()))
    }

    fn close(&self, grace: Duration) -> Result<(), BackendError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let (ack_tx, ack_rx) = std::sync::mpsc::sync_channel(1);
        if self
            .control
            .send(Control::Shutdown {
                grace,
                ack: ack_tx,
            })
            .is_err()
        {
            // Worker already gone; nothing left to drain.
            return Ok(());
        }
        // Small margin on top of the grace period the worker bounds itself
        // to, so both sides agree on who gives up first.
        ack_rx
            .recv_timeout(grace + Duration::from_secs(1))
            .map_err(|_| BackendError::Transient("shutdown drain timed out".into()))
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

enum SendResult {
    Delivered,
    Exhausted,
    Rejected,
}

struct Worker {
    config: RemoteCollectorConfig,
    events: mpsc::Receiver<LogEvent>,
    control: mpsc::UnboundedReceiver<Control>,
    buffer: Vec<LogEvent>,
    dropped: Arc<AtomicU64>,
    degraded_until: Option<Instant>,
    consecutive_exhaustions: u32,
}

impl Worker {
    async fn run(mut self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        let mut tick =
            tokio::time::interval(Duration::from_millis(self.config.flush_interval_ms.max(1)));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                maybe = self.events.recv() => match maybe {
                    Some(event) => {
                        self.buffer.push(event);
                        if self.buffer.len() >= self.config.batch_size {
                            self.ship(&client).await;
                        }
                    }
                    // All producer handles dropped without close(); ship
                    // what is left and stop.
                    None => {
                        self.ship(&client).await;
                        break;
                    }
                },
                Some(ctrl) = self.control.recv() => match ctrl {
                    Control::Flush(ack) => {
                        self.ship(&client).await;
                        let _ = ack.try_send(());
                    }
                    Control::Shutdown { grace, ack } => {
                        let _ = tokio::time::timeout(grace, self.drain(&client)).await;
                        self.discard_remaining();
                        let _ = ack.try_send(());
                        break;
                    }
                },
                _ = tick.tick() => {
                    if !self.buffer.is_empty() {
                        self.ship(&client).await;
                    }
                }
            }
        }
    }

    /// Ship everything currently buffered as one or more batches.
    async fn ship(&mut self, client: &reqwest::Client) {
        while !self.buffer.is_empty() {
            let take = self.buffer.len().min(self.config.batch_size.max(1));
            let batch: Vec<LogEvent> = self.buffer.drain(..take).collect();
            self.ship_batch(client, batch).await;
        }
    }

    async fn ship_batch(&mut self, client: &reqwest::Client, batch: Vec<LogEvent>) {
        if let Some(until) = self.degraded_until {
            if Instant::now() < until {
                self.count_dropped(batch.len());
                return;
            }
            // Cooldown elapsed; this send attempt is the health re-check.
        }

        match self.send_with_retries(client, &batch).await {
            SendResult::Delivered => {
                self.degraded_until = None;
                self.consecutive_exhaustions = 0;
            }
            SendResult::Exhausted => {
                self.count_dropped(batch.len());
                self.consecutive_exhaustions += 1;
                if self.consecutive_exhaustions >= DEGRADE_AFTER_EXHAUSTIONS {
                    self.enter_degraded();
                }
            }
            SendResult::Rejected => {
                self.count_dropped(batch.len());
                self.enter_degraded();
            }
        }
    }

    async fn send_with_retries(
        &self,
        client: &reqwest::Client,
        batch: &[LogEvent],
    ) -> SendResult {
        let retry = &self.config.retry;
        for attempt in 1..=retry.max_attempts.max(1) {
            match client
                .post(self.config.endpoint.as_str())
                .json(batch)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return SendResult::Delivered;
                    }
                    if status.is_client_error() {
                        // The collector understood us and said no; retrying
                        // the same payload cannot help.
                        return SendResult::Rejected;
                    }
                }
                Err(_) => {}
            }
            if attempt < retry.max_attempts {
                tokio::time::sleep(calculate_backoff(
                    attempt,
                    retry.base_delay_ms,
                    retry.max_delay_ms,
                ))
                .await;
            }
        }
        SendResult::Exhausted
    }

    /// Pull the queue dry and ship in batches. Bounded externally by the
    /// shutdown grace period.
    async fn drain(&mut self, client: &reqwest::Client) {
        while let Ok(event) = self.events.try_recv() {
            self.buffer.push(event);
        }
        self.ship(client).await;
    }

    /// Count everything still held after the grace period as dropped.
    fn discard_remaining(&mut self) {
        let mut remaining = self.buffer.len() as u64;
        self.buffer.clear();
        while self.events.try_recv().is_ok() {
            remaining += 1;
        }
        if remaining > 0 {
            self.dropped.fetch_add(remaining, Ordering::Relaxed);
        }
    }

    fn count_dropped(&self, n: usize) {
        self.dropped.fetch_add(n as u64, Ordering::Relaxed);
    }

    fn enter_degraded(&mut self) {
        self.degraded_until =
            Some(Instant::now() + Duration::from_secs(self.config.degraded_cooldown_secs));
    }
}

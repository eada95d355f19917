// ── Poller ──
//
// Drives the Spoolman and Klipper clients on a fixed cadence and publishes
// each result as a `Snapshot` on a watch channel. A poll never fails: every
// query degrades to an "unknown" value so the loop keeps running through
// network outages.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use spoolwatch_api::transport::{TlsMode, TransportConfig};
use spoolwatch_api::{HealthStatus, KlipperClient, SpoolSelection, SpoolmanClient};

use crate::config::{TlsVerification, WatchConfig};
use crate::error::CoreError;
use crate::snapshot::{KlipperStatus, Snapshot, SpoolReport};
use crate::threshold::NotificationLevel;

/// Latest published snapshot; `None` until the first poll completes.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

/// Periodic poller for one Spoolman instance and optional printer.
///
/// Cheaply cloneable via `Arc<PollerInner>`. Create with [`Poller::new`],
/// then either call [`poll_once`](Self::poll_once) directly or
/// [`start`](Self::start) the background loop and [`subscribe`](Self::subscribe).
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    config: WatchConfig,
    spoolman: SpoolmanClient,
    klipper: Option<KlipperClient>,
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    /// Running poll loop and the token that stops it.
    task: Mutex<Option<(JoinHandle<()>, CancellationToken)>>,
}

impl Poller {
    /// Build the HTTP clients. Does NOT poll -- nothing touches the
    /// network until [`poll_once`](Self::poll_once) or [`start`](Self::start).
    pub fn new(config: WatchConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);

        let spoolman = SpoolmanClient::new(config.spoolman_url.as_str(), &transport)
            .map_err(|e| CoreError::from_api(&config.spoolman_url, e))?;

        let klipper = config
            .klipper_url
            .as_deref()
            .map(|url| {
                KlipperClient::new(url, &transport).map_err(|e| CoreError::from_api(url, e))
            })
            .transpose()?;

        let (snapshot, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(PollerInner {
                config,
                spoolman,
                klipper,
                snapshot,
                task: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &WatchConfig {
        &self.inner.config
    }

    // ── One-shot queries ─────────────────────────────────────────────

    /// Validate the Spoolman endpoint, surfacing the exact failure.
    pub async fn check_health(&self) -> Result<HealthStatus, CoreError> {
        let spoolman = &self.inner.spoolman;
        spoolman
            .check_health()
            .await
            .map_err(|e| CoreError::from_api(spoolman.endpoint().as_str(), e))
    }

    /// Query the printer, or `None` when no Klipper endpoint is configured.
    pub async fn klipper_status(&self) -> Option<KlipperStatus> {
        let klipper = self.inner.klipper.as_ref()?;
        let (active_spool, api_version) = tokio::join!(klipper.active_spool(), klipper.api_version());
        Some(KlipperStatus {
            active_spool,
            api_version,
        })
    }

    /// List spools and classify them against the configured thresholds.
    pub async fn spools(
        &self,
        include_archived: bool,
        active_id: Option<i64>,
    ) -> Result<Vec<SpoolReport>, CoreError> {
        let spoolman = &self.inner.spoolman;
        let thresholds = &self.inner.config.thresholds;
        let spools = spoolman
            .list_spools(include_archived)
            .await
            .map_err(|e| CoreError::from_api(spoolman.endpoint().as_str(), e))?;

        Ok(spools
            .into_iter()
            .map(|s| SpoolReport::new(s, thresholds, active_id))
            .collect())
    }

    /// Run one poll: printer status and spool inventory, concurrently.
    pub async fn poll_once(&self) -> Snapshot {
        let show_archived = self.inner.config.show_archived;
        let (klipper, spools) = tokio::join!(
            self.klipper_status(),
            self.inner.spoolman.list_spools(show_archived)
        );

        let active_id = klipper
            .as_ref()
            .and_then(|k| k.active_spool.spool_id());
        let thresholds = &self.inner.config.thresholds;

        let spools = match spools {
            Ok(spools) => Some(
                spools
                    .into_iter()
                    .map(|s| SpoolReport::new(s, thresholds, active_id))
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, url = %self.inner.spoolman.endpoint(), "spool listing failed");
                None
            }
        };

        if let Some(KlipperStatus {
            active_spool: SpoolSelection::FetchFailed,
            ..
        }) = &klipper
        {
            debug!("active spool unknown this round");
        }

        Snapshot {
            taken_at: Utc::now(),
            klipper,
            spools,
        }
    }

    // ── Background loop ──────────────────────────────────────────────

    /// Spawn the polling loop. Polls immediately, then every
    /// `update_interval`. Calling `start` while running is a no-op; after
    /// [`shutdown`](Self::shutdown) it starts a fresh loop.
    pub async fn start(&self) {
        let mut task = self.inner.task.lock().await;
        if task.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(self.clone(), cancel.clone()));
        *task = Some((handle, cancel));
        info!(
            interval_secs = self.inner.config.update_interval.as_secs(),
            "polling started"
        );
    }

    /// Stop the polling loop and wait for it to exit.
    pub async fn shutdown(&self) {
        let running = self.inner.task.lock().await.take();
        if let Some((handle, cancel)) = running {
            cancel.cancel();
            let _ = handle.await;
        }
        debug!("polling stopped");
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.inner.snapshot.subscribe()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.borrow().clone()
    }

    /// Publish a snapshot and log any spool that got more severe.
    fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let previous = self.inner.snapshot.send_replace(Some(Arc::clone(&snapshot)));
        log_escalations(previous.as_deref(), &snapshot);
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn poll_task(poller: Poller, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(poller.inner.config.update_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let snapshot = poller.poll_once().await;
                poller.publish(snapshot);
            }
        }
    }
}

fn log_escalations(previous: Option<&Snapshot>, current: &Snapshot) {
    for report in current.spools.iter().flatten() {
        if report.level == NotificationLevel::Ok {
            continue;
        }
        let before = previous
            .and_then(|p| p.level_of(report.spool.id))
            .unwrap_or(NotificationLevel::Ok);
        if report.level > before {
            warn!(
                spool_id = report.spool.id,
                spool = %report.spool.display_name(),
                level = %report.level,
                remaining_pct = report.remaining_pct,
                "spool running low"
            );
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &WatchConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };

    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

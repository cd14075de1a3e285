//! Background tasks driving rotation, grace enforcement, cleanup and snapshots

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::repositories::{RevocationSet, SnapshotRepository, TokenStore};

use super::config::SweeperConfig;
use super::manager::RotationManager;

/// Periodic maintenance for a [`RotationManager`]
pub struct Sweeper<S: TokenStore + 'static, R: RevocationSet + 'static> {
    manager: Arc<RotationManager<S, R>>,
    config: SweeperConfig,
    snapshots: Option<Arc<dyn SnapshotRepository>>,
}

impl<S: TokenStore + 'static, R: RevocationSet + 'static> Sweeper<S, R> {
    pub fn new(manager: Arc<RotationManager<S, R>>, config: SweeperConfig) -> Self {
        Self {
            manager,
            config,
            snapshots: None,
        }
    }

    /// Exports state to `repository` on every snapshot tick
    pub fn with_snapshot_repository(mut self, repository: Arc<dyn SnapshotRepository>) -> Self {
        self.snapshots = Some(repository);
        self
    }

    /// Spawns one task per job
    ///
    /// Each task runs its job once immediately, then on every tick. A job
    /// already in progress when shutdown is requested runs to completion.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        let manager = self.manager.clone();
        tasks.push(spawn_job(
            "rotation-sweep",
            self.config.rotation_sweep_interval,
            shutdown_rx.clone(),
            move || {
                let manager = manager.clone();
                async move {
                    match manager.run_rotation_sweep().await {
                        Ok(report) if !report.is_success() => {
                            warn!("Rotation sweep completed with errors: {:?}", report.errors);
                        }
                        Ok(_) => {}
                        Err(e) => error!("Rotation sweep failed: {}", e),
                    }
                }
            },
        ));

        if let Some(interval) = self.config.fine_sweep_interval {
            let manager = self.manager.clone();
            tasks.push(spawn_job("scheduled-rotation", interval, shutdown_rx.clone(), move || {
                let manager = manager.clone();
                async move {
                    match manager.run_scheduled_rotations().await {
                        Ok(report) if !report.is_success() => {
                            warn!("Scheduled rotations completed with errors: {:?}", report.errors);
                        }
                        Ok(_) => {}
                        Err(e) => error!("Scheduled rotations failed: {}", e),
                    }
                }
            }));
        }

        let manager = self.manager.clone();
        tasks.push(spawn_job(
            "grace-period-sweep",
            self.config.grace_sweep_interval,
            shutdown_rx.clone(),
            move || {
                let manager = manager.clone();
                async move {
                    match manager.run_grace_period_sweep().await {
                        Ok(report) if !report.is_success() => {
                            warn!("Grace period sweep completed with errors: {:?}", report.errors);
                        }
                        Ok(_) => {}
                        Err(e) => error!("Grace period sweep failed: {}", e),
                    }
                }
            },
        ));

        let manager = self.manager.clone();
        tasks.push(spawn_job(
            "cleanup",
            self.config.cleanup_interval,
            shutdown_rx.clone(),
            move || {
                let manager = manager.clone();
                async move {
                    if let Err(e) = manager.run_cleanup().await {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            },
        ));

        if let (Some(interval), Some(repository)) = (self.config.snapshot_interval, self.snapshots) {
            let manager = self.manager.clone();
            tasks.push(spawn_job("snapshot", interval, shutdown_rx, move || {
                let manager = manager.clone();
                let repository = repository.clone();
                async move {
                    let result = match manager.export_state().await {
                        Ok(snapshot) => repository.save(&snapshot).await,
                        Err(e) => Err(e),
                    };
                    if let Err(e) = result {
                        error!("Periodic snapshot failed: {}", e);
                    }
                }
            }));
        }

        info!("Sweeper started with {} background jobs", tasks.len());
        SweeperHandle { shutdown_tx, tasks }
    }
}

fn spawn_job<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut job: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        info!(job = name, "Background job started - will run every {:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => job().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(job = name, "Background job stopped");
    })
}

/// Handle to the running background jobs
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Number of running jobs
    pub fn job_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stops every job and waits for in-flight passes to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                error!("Background job ended abnormally: {}", e);
            }
        }
        info!("Sweeper stopped");
    }
}

use actix_web::{web, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};

use tr_api::{config::load_config, create_app, telemetry::init_tracing, AppState};
use tr_core::{
    Clock, CodecConfig, InMemoryRevocationSet, InMemoryTokenStore, RotationManager,
    RotationManagerConfig, SnapshotRepository, Sweeper, SweeperConfig, SystemClock, TokenCodec,
};
use tr_infra::FileSnapshotRepository;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting token rotation service");

    let codec = TokenCodec::new(CodecConfig::from_signing_config(&config.signing)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let manager = Arc::new(RotationManager::new(
        Arc::new(InMemoryTokenStore::new()),
        Arc::new(InMemoryRevocationSet::new()),
        codec,
        clock,
        RotationManagerConfig::from(&config.rotation),
    ));

    let snapshots = FileSnapshotRepository::from_config(&config.persistence).map(Arc::new);
    match &snapshots {
        Some(repository) => {
            if let Some(snapshot) = repository.load().await? {
                let summary = manager.import_state(snapshot).await?;
                info!(
                    records = summary.records_imported,
                    revocations = summary.revocations_imported,
                    overdue = summary.overdue_records,
                    "Restored state from snapshot"
                );
            }
        }
        None => warn!("Snapshot persistence disabled; state is lost on restart"),
    }

    let mut sweeper = Sweeper::new(
        manager.clone(),
        SweeperConfig::from_config(&config.rotation, &config.persistence),
    );
    if let Some(repository) = &snapshots {
        sweeper = sweeper.with_snapshot_repository(repository.clone());
    }
    let sweeper = sweeper.start();

    let app_state = web::Data::new(AppState::new(manager.clone()));
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.bind(&bind_address)?.run().await?;

    info!("HTTP server stopped, waiting for background jobs");
    sweeper.shutdown().await;

    if let Some(repository) = &snapshots {
        repository.save(&manager.export_state().await?).await?;
    }

    info!("Shutdown complete");
    Ok(())
}

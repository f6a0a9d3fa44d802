//! CoopSave Ledger Service
//!
//! Main entry point for the cooperative-savings ledger service.
//! This service provides:
//! - The authoritative savings-group ledger behind a snapshot-backed store
//! - A background snapshot flusher for durability
//! - An optional logical block ticker standing in for chain block production

use anyhow::Context;
use coopsave_ledger::config::AppConfig;
use coopsave_ledger::services::AuditTrailService;
use coopsave_ledger::store::LedgerStore;
use coopsave_ledger::AppState;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("coopsave_ledger={}", config.log_level).into()),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           CoopSave Ledger Service Starting                ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);

    // =========================================================================
    // LEDGER STORE SETUP
    // =========================================================================
    let store = match &config.snapshot_path {
        Some(path) => {
            info!("Opening ledger store at {:?}...", path);
            LedgerStore::open(path.clone()).context("Failed to open ledger store")?
        }
        None => {
            warn!("SNAPSHOT_PATH not configured - running with an in-memory ledger");
            LedgerStore::in_memory()
        }
    };
    let store = Arc::new(store);
    info!("Ledger store ready at block height {}", store.block_height().await);

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    info!("Initializing core services...");

    let audit = match &config.audit_log_dir {
        Some(dir) => {
            AuditTrailService::new(dir.clone()).context("Failed to initialize audit trail")?
        }
        None => {
            warn!("AUDIT_LOG_DIR not configured - audit trail disabled");
            AuditTrailService::disabled()
        }
    };

    let app_state = Arc::new(AppState::new(store.clone(), config.limits.clone(), audit));
    info!("✓ Application state initialized with repositories and services");
    info!(
        "Public groups in ledger: {}",
        app_state.registry_repo.count().await
    );

    // =========================================================================
    // BACKGROUND TASKS
    // =========================================================================
    info!("Starting background tasks...");

    // Snapshot flusher: periodically persists the ledger for durability
    let flusher_handle = {
        let store = store.clone();
        let interval = config.snapshot_interval();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                if let Err(e) = store.persist().await {
                    warn!("Snapshot flush failed: {}", e);
                }
            }
        })
    };
    info!(
        "✓ Snapshot flusher started ({}s interval)",
        config.snapshot_interval_secs
    );

    // Optional block ticker: advances the logical clock when no external
    // driver of block height exists
    let ticker_handle = config.block_interval().map(|interval| {
        let store = store.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let height = store.advance_blocks(1).await;
                debug!("Block height advanced to {}", height);
            }
        })
    });
    match config.block_interval_secs {
        Some(secs) => info!("✓ Block ticker started ({}s per block)", secs),
        None => info!("Block ticker disabled - embedder drives block height"),
    }

    // =========================================================================
    // READY
    // =========================================================================
    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           CoopSave Ledger Service Ready!                  ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = flusher_handle => {
            error!("Snapshot flusher exited unexpectedly");
        }
        _ = async {
            if let Some(handle) = ticker_handle {
                handle.await.ok();
            } else {
                // Never completes when the ticker is not running
                std::future::pending::<()>().await;
            }
        } => {
            error!("Block ticker exited unexpectedly");
        }
    }

    // Final flush so no committed state is lost on shutdown
    store.persist().await.context("Final snapshot flush failed")?;

    info!("CoopSave ledger service shutdown complete");
    Ok(())
}

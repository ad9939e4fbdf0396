mod clock;
mod config;
mod error;
mod handlers;
mod heat;
mod logging;
mod metrics;
mod models;
mod state;
mod store;
mod sweeper;
mod tracker;

use clap::Parser; // for cli
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing::{error, info};

use crate::clock::SystemClock;
use crate::config::Args;
use crate::state::AppState;
use crate::store::MemoryStore;
use crate::sweeper::idle_sweeper;
use crate::tracker::HeatTracker;

#[tokio::main]
async fn main() -> ExitCode {
    // parse cli arguments
    let args = Args::parse();
    logging::init(&args.log_level, args.log_json);

    let policy = match args.policy() {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // creating shared state
    let tracker = HeatTracker::new(
        Arc::new(MemoryStore::new()),
        Arc::new(SystemClock),
        policy,
    );
    let state = Arc::new(AppState::new(tracker));

    // spawn the idle sweeper
    match args.idle_ttl() {
        Some(idle_for) => {
            let sweep_state = Arc::clone(&state);
            let every = Duration::from_secs(args.sweep_interval.max(1));
            tokio::spawn(async move {
                idle_sweeper(sweep_state, every, idle_for).await;
            });
        }
        None => info!("idle eviction disabled"),
    }

    let app = handlers::router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    let policy = state.tracker.policy();
    info!(%addr, "heat gateway listening");
    info!(
        max_requests = policy.max_requests,
        cooldown_secs = policy.cooldown.num_seconds(),
        "heat policy"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    info!("heat gateway stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

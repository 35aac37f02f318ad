/*
 * Responsibility
 * - load Config, install tracing + panic hook
 * - build dependencies (stores, object service) and the Router
 * - apply HTTP-level middleware and start axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::objects::Unconfigured,
    state::AppState,
    stores::{MemoryStore, Stores},
};

fn init_tracing() {
    // RUST_LOG wins when set, ex:
    // RUST_LOG=info,lfs_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting LFS gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = middleware::http::apply(build_router(state), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let store = MemoryStore::load(&config.seed_path)
        .await
        .with_context(|| format!("loading seed from {}", config.seed_path.display()))?;
    tracing::info!(store = ?store, "store loaded");

    Ok(AppState::new(
        Stores::shared(Arc::new(store)),
        Arc::new(Unconfigured),
    ))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        .merge(api::lfs::routes(&state))
        .with_state(state)
}

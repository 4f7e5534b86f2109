//! Comforty Storefront - cart, wishlist and checkout service.
//!
//! Serves the storefront JSON API (default `127.0.0.1:3000`). Catalog
//! records come from Sanity or a local fixture; shopper contexts live in
//! memory, keyed by a session cookie; orders are simulated unless
//! `ORDER_SINK=sanity`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use comforty_storefront::config::{ConfigError, StorefrontConfig};
use comforty_storefront::state::{AppState, StateError};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to initialize application state: {0}")]
    State(#[from] StateError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() {
    // Config first: Sentry needs the DSN before tracing is wired up
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_with_config_error(&e),
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = serve(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn serve(config: StorefrontConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr();
    let state = AppState::new(config).await?;
    info!(
        catalog = ?state.config().catalog,
        order_sink = ?state.config().order_sink,
        notice_seconds = state.config().cart_notice.as_secs(),
        "Storefront state ready"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!("storefront listening on {addr}");

    axum::serve(listener, comforty_storefront::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

// Tracing is not initialized yet
#[allow(clippy::print_stderr)]
fn exit_with_config_error(e: &ConfigError) -> ! {
    eprintln!("configuration error: {e}");
    std::process::exit(2);
}

/// Initialize Sentry when a DSN is configured; the guard flushes on drop.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// `RUST_LOG` filter, fmt output and the Sentry bridge.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "comforty_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
            tracing::Level::INFO | tracing::Level::DEBUG => {
                sentry_tracing::EventFilter::Breadcrumb
            }
            tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
        }))
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

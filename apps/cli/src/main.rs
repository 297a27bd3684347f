mod args;
mod config;

use std::io;
use std::net::{IpAddr, SocketAddr};

use app_api::AppContext;
use clap::Parser;
use http_api::HttpState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use usage_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};

use args::{Cli, Command};
use config::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = config::load_or_create(cli.config.as_deref()).map_err(io::Error::other)?;
    let settings = Settings::resolve(loaded.config, &cli);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    if loaded.created {
        info!(file = %loaded.file.display(), "created default config");
    }

    let mut paths = AppPaths::new(config::default_data_dir().map_err(io::Error::other)?);
    if let Some(db_path) = settings.database_path.clone() {
        paths = paths.with_db_path(db_path);
    }
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::new(AppConfig {
        db_path: paths.db_path.clone(),
        busy_timeout: settings.busy_timeout,
        request_timeout: settings.request_timeout,
    });
    if let Err(err) = app_state.setup_db() {
        error!(error = %err, "failed to initialize database");
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }

    if cli.command == Some(Command::Migrate) {
        info!(db_path = %paths.db_path.display(), "migrations applied");
        return Ok(());
    }

    let context = AppContext { app_state };
    let router = http_api::router(HttpState::new(context));

    let ip: IpAddr = settings.bind_address.parse().map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {}", settings.bind_address, err),
        )
    })?;
    let addr = SocketAddr::new(ip, settings.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "phone usage service listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received ctrl-c, shutting down");
        },
        _ = terminate => {
            info!("received terminate signal, shutting down");
        },
    }
}

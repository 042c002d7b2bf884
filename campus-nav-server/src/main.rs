use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use campus_nav_core::create_campus;
use campus_nav_server::{ServerConfig, ServerError, app};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "campus-nav-server", version, about = "HTTP routing service for campus building maps")]
struct Args {
    /// TOML file listing the buildings to load
    #[arg(short, long, value_name = "PATH", default_value = "campus.toml")]
    config: PathBuf,

    /// Overrides `server.bind` from the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let config = ServerConfig::from_file(&args.config)?;
    let mut settings = config.server;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }

    let campus_config = config.campus;
    let campus = tokio::task::spawn_blocking(move || create_campus(&campus_config)).await??;
    info!(
        "Loaded {} buildings from {}",
        campus.buildings().len(),
        args.config.display()
    );

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(Arc::new(campus), &settings))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}

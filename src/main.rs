use clap::Parser;
use gitlab_webhook_receiver::config::load_config;
use gitlab_webhook_receiver::logging::init_logging;
use gitlab_webhook_receiver::{AppState, router};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

const DEFAULT_PORT: u16 = 8666;
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// GitLab webhook receiver: runs a configured command on project events
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address where it listens
    #[arg(long, env = "WEBHOOK_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    addr: IpAddr,

    /// Port where it listens
    #[arg(long, env = "WEBHOOK_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to the config file
    #[arg(long, env = "WEBHOOK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    cfg: PathBuf,

    /// Also write daily-rotated log files into this directory
    #[arg(long, env = "WEBHOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received, finishing in-flight requests");
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let _log_guard = match init_logging(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match load_config(&cli.cfg) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config file {} could not be loaded: {}", cli.cfg.display(), e);
            std::process::exit(1);
        }
    };
    if config.is_empty() {
        warn!("No projects configured in {}", cli.cfg.display());
    }
    for project in config.project_urls() {
        info!("Accepting hooks for {}", project);
    }

    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let bind_address = SocketAddr::new(cli.addr, cli.port);
    let listener = match tokio::net::TcpListener::bind(bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", cli.cfg);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

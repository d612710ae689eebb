use clap::Parser;
use responder_core::config;
use responder_core::storage::JsonFileStorage;
use responder_core::QuestionRepository;
use responder_server::api::create_router;
use responder_server::api::handlers::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "responder", about = "Question and answer store over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "RESPONDER_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// JSON document holding every question; created empty if missing
    #[arg(
        short,
        long,
        env = "RESPONDER_STORAGE_FILE",
        default_value = config::DEFAULT_STORAGE_FILE
    )]
    storage_file: PathBuf,

    /// Graceful shutdown timeout in seconds
    #[arg(
        long,
        env = "RESPONDER_SHUTDOWN_TIMEOUT",
        default_value_t = config::DEFAULT_SHUTDOWN_TIMEOUT_SECS
    )]
    shutdown_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("responder_server=info".parse()?)
                .add_directive("responder_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.storage_file.is_dir() {
        eprintln!(
            "Error: storage file '{}' is a directory",
            args.storage_file.display()
        );
        std::process::exit(1);
    }

    let storage = JsonFileStorage::new(&args.storage_file);
    if let Err(e) = storage.ensure_exists() {
        eprintln!(
            "Error: cannot initialize storage file '{}': {}",
            args.storage_file.display(),
            e
        );
        std::process::exit(1);
    }

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        repo: Arc::new(QuestionRepository::new(storage)),
        storage_path: args.storage_file.display().to_string(),
        prometheus_handle,
        start_time: Instant::now(),
    };

    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        storage_file = %args.storage_file.display(),
        "Responder app listening on port {}",
        args.port
    );

    let shutdown_timeout = args.shutdown_timeout;
    let storage_file = args.storage_file.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let signal = shutdown_signal().await;
            tracing::info!(signal, "Stopping, draining in-flight requests");
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(shutdown_timeout)).await;
                tracing::error!(
                    "Shutdown drain timeout ({}s) exceeded, exiting",
                    shutdown_timeout
                );
                std::process::exit(1);
            });
        })
        .await?;

    // Each write already replaced the file atomically; there is nothing to flush.
    tracing::info!(storage_file = %storage_file.display(), "Drained, document is up to date");
    Ok(())
}

/// Resolves with the name of the first shutdown signal received.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        },
        Err(e) => {
            tracing::error!("Failed to install SIGTERM handler: {}", e);
            ctrl_c_only().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c_only().await
}

async fn ctrl_c_only() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    "SIGINT"
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, error};
use spam_sms::{create_router, init_logger, AppState, Classifier, RuntimeConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the `spam-sms/` artifact folder
    #[arg(long, env = "SPAM_SMS_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "SPAM_SMS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SPAM_SMS_PORT", default_value_t = 8000)]
    port: u16,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, env = "SPAM_SMS_INTRA_THREADS", default_value_t = 0)]
    intra_threads: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    info!("=== Starting SMS spam classifier ===");
    info!("Loading artifacts from {:?}", args.models_dir);

    let start_time = Instant::now();
    let classifier = Classifier::builder()
        .with_models_dir(&args.models_dir)
        .with_runtime_config(RuntimeConfig::default().with_intra_threads(args.intra_threads))
        .build()
        .context("failed to load classifier artifacts")?;

    let info = classifier.info();
    info!("Classifier ready in {:.2?}", start_time.elapsed());
    info!("  Model: {} (sha256 {})", info.model_path, info.model_fingerprint);
    info!("  Tokenizer: {} ({} entries)", info.tokenizer_path, info.vocab_size);
    info!("  Labels: {:?}, max_sequence: {}", info.class_labels, info.max_sequence);

    let app = create_router(AppState::new(classifier));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
    warn!("Shutdown signal received, stopping server...");
}

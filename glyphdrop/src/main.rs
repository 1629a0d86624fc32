use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glyphdrop::api::{create_router, AppState};
use glyphdrop::config::Config;
use glyphdrop::ocr::{OcrProvider, TextRecognizer};
use glyphdrop::store::TransientStore;

#[derive(Parser)]
#[command(name = "glyphdrop")]
#[command(about = "Upload an image, read its text, download it as TXT, DOCX or PDF")]
struct Args {
    /// Address to bind (overrides GLYPHDROP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides GLYPHDROP_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Scratch directory for uploads and generated documents (overrides UPLOAD_DIR)
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glyphdrop=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(upload_dir) = args.upload_dir {
        config.storage.upload_dir = upload_dir;
    }

    let store = TransientStore::new(config.storage.upload_dir.clone());
    store.ensure().await?;
    tracing::info!("Upload directory: {}", store.root().display());

    tracing::info!("Initializing OCR provider...");
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - uploads will report the engine error inline");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, Arc::new(ocr));
    let app = create_router(state);

    tracing::info!("Glyphdrop starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}

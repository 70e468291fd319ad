use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palimpsest::api::{create_router, AppState};
use palimpsest::client::{
    NoticeKind, OcrClient, ResultPresenter, SystemClipboard, UploadController, UploadState,
};
use palimpsest::config::Config;
use palimpsest::models::UploadedImage;
use palimpsest::ocr::{OcrProvider, TesseractEngine};
use palimpsest::translation::PlaceholderTranslator;

#[derive(Parser)]
#[command(name = "palimpsest")]
#[command(about = "OCR service for classical Greek and Latin text images")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Send one image to a running server and print the result
    Read {
        /// Image file to recognize
        image: PathBuf,
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:8081")]
        server: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,
        /// Copy the translation to the clipboard
        #[arg(long)]
        copy: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palimpsest=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(Config::from_env()).await,
        Command::Read {
            image,
            server,
            timeout,
            copy,
        } => read(image, server, Duration::from_secs(timeout), copy).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<ExitCode> {
    let ocr = OcrProvider::new(config.ocr.clone());
    let state = AppState::new(config.clone(), ocr.clone(), Arc::new(PlaceholderTranslator));
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Palimpsest starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  API docs:     http://{}/api/docs", addr);
    tracing::info!("  References:   {}", config.reference.dir);

    let cancel_token = CancellationToken::new();
    let server = tokio::spawn({
        let token = cancel_token.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(token))
                .await
        }
    });

    // The listener is already accepting; /api/health reports "initializing"
    // until this completes.
    tracing::info!("Initializing recognition engine: {}...", config.ocr.languages);
    if let Err(e) = ocr.initialize(TesseractEngine::open).await {
        tracing::error!(error = %e, "Recognition engine failed to initialize, shutting down");
        cancel_token.cancel();
        server.await??;
        return Err(anyhow::anyhow!("cannot serve without a recognition engine: {e}"));
    }

    server.await??;
    Ok(ExitCode::SUCCESS)
}

async fn read(
    path: PathBuf,
    server: String,
    timeout: Duration,
    copy: bool,
) -> anyhow::Result<ExitCode> {
    let client = OcrClient::new(server, timeout)?;
    let image = UploadedImage::from_path(&path).await?;

    let mut controller = UploadController::new();
    controller.select(image)?;
    controller.submit(&client).await;

    match controller.state() {
        UploadState::Succeeded { result, .. } => {
            let presenter = ResultPresenter::new(Some(result));
            println!("{}", presenter.render());

            if copy {
                let notice = presenter.copy_translation(&mut SystemClipboard::new());
                match notice.kind {
                    NoticeKind::Info => eprintln!("{}: {}", notice.title, notice.description),
                    NoticeKind::Warning => {
                        eprintln!("warning: {}: {}", notice.title, notice.description)
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        UploadState::Failed { message, .. } => {
            eprintln!("error: {message}");
            Ok(ExitCode::FAILURE)
        }
        other => Err(anyhow::anyhow!("unexpected upload state: {other:?}")),
    }
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = cancel_token.cancelled() => {
            return;
        },
    }

    tracing::info!("Shutdown signal received, stopping server...");
    cancel_token.cancel();
}

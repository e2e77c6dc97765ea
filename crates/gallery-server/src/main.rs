// Gallery Server - entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gallery_catalog::IdGenerator;
use gallery_server::auth::AdminGuard;
use gallery_server::config::{Backend, Config};
use gallery_server::store::{CatalogStore, DocumentStore, FileStore};
use gallery_server::routes::with_request_timeout;
use gallery_server::{create_router, db, migrate, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Gallery catalog REST server
#[derive(Parser)]
#[command(name = "gallery-server")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API (default)
    Serve,
    /// Import a JSON catalog file into the configured store
    Migrate {
        /// Path to a JSON array of artworks
        file: PathBuf,

        /// Clear the store first if it already has records
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gallery_server=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli.command.unwrap_or(Commands::Serve)).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let ids: Arc<dyn IdGenerator> = Arc::from(config.id_strategy.build());

    match config.backend.clone() {
        Backend::Postgres { database_url } => {
            let pool = db::create_pool(&database_url, config.max_connections, config.connect_timeout)
                .await
                .context("Failed to connect to the database")?;
            let store = DocumentStore::new(pool, ids);
            store.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Using PostgreSQL document store");
            run(command, store, &config).await
        }
        Backend::File { path } => {
            let store = FileStore::open(&path, ids)
                .await
                .with_context(|| format!("Failed to open catalog file '{}'", path.display()))?;
            tracing::info!("Using catalog file {}", path.display());
            run(command, store, &config).await
        }
    }
}

async fn run<S: CatalogStore>(command: Commands, store: S, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve(Arc::new(store), config).await,
        Commands::Migrate { file, force } => {
            let outcome = async {
                let artworks = migrate::read_catalog_file(&file)?;
                tracing::info!("Read {} artworks from {}", artworks.len(), file.display());
                migrate::import_catalog(&store, artworks, force).await
            }
            .await;
            store.close().await;
            outcome.map(|report| {
                if report.skipped {
                    tracing::info!("Migration skipped");
                } else {
                    tracing::info!("Migration complete: {} artworks in store", report.total);
                }
            })
        }
    }
}

async fn serve<S: CatalogStore>(store: Arc<S>, config: &Config) -> anyhow::Result<()> {
    let admin = match &config.admin_token_sha256 {
        Some(digest) => AdminGuard::from_digest_hex(digest).context("Invalid admin token digest")?,
        None => {
            tracing::warn!(
                "GALLERY_ADMIN_TOKEN_SHA256 is not set; catalog mutations are open to any client"
            );
            AdminGuard::open()
        }
    };

    let state = AppState::new(Arc::clone(&store))
        .with_admin(admin)
        .with_whatsapp_number(&config.whatsapp_number);
    let app = with_request_timeout(create_router(state), config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Gallery server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down");
    store.close().await;
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}

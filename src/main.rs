use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blog_api::database::{BlogStore, MemoryStore, PgStore};
use blog_api::AppState;

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "Blog demo server - posts and categories over JSON, with HTML pages")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides BLOG_API_HOST)")]
    host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides BLOG_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Postgres connection string (overrides DATABASE_URL)")]
    database_url: Option<String>,

    #[arg(long, help = "Keep all data in memory instead of Postgres")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blog_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = blog_api::config::config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    tracing::info!("Starting blog API in {:?} mode", config.environment);

    let pg = if args.memory {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        None
    } else {
        let store = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        Some(store)
    };

    let store: Arc<dyn BlogStore> = match &pg {
        Some(store) => Arc::new(store.clone()) as Arc<dyn BlogStore>,
        None => Arc::new(MemoryStore::new()),
    };

    let app = blog_api::app(AppState::new(store), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Blog API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(store) = pg {
        store.close().await;
        tracing::info!("Closed database pool");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

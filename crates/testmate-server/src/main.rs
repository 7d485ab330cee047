use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use testmate_core::Settings;
use testmate_server::{router, AppState};

#[derive(Parser)]
#[command(name = "testmate-server")]
#[command(about = "Testmate HTTP endpoints for chat turns and history")]
#[command(version)]
struct Cli {
    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides [server].bind)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    let bind = cli.bind.unwrap_or_else(|| settings.server.bind.clone());

    let state = Arc::new(AppState::from_settings(&settings)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, persistence = ?settings.persistence, "testmate-server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

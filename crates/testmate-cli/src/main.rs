use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use testmate_cli::app::{self, App};
use testmate_core::constants::defaults;
use testmate_core::{EnvIdentity, FixedIdentity, IdentitySource, Settings};

#[derive(Parser)]
#[command(name = "testmate")]
#[command(about = "Testmate - QA test-case assistant")]
#[command(version)]
struct Cli {
    /// Send a single prompt and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Print your chat history and exit
    #[arg(long)]
    history: bool,

    /// Use case id (see /use-cases)
    #[arg(short, long, default_value = defaults::DEFAULT_USE_CASE)]
    use_case: String,

    /// Identity to act as (defaults to $TESTMATE_USER)
    #[arg(long)]
    user: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    let source: Box<dyn IdentitySource> = match cli.user {
        Some(user) => Box::new(FixedIdentity::new(user)),
        None => Box::new(EnvIdentity::default()),
    };
    let identity = app::resolve_identity(source.as_ref()).await;

    let mut app = App::from_settings(&settings, identity, &cli.use_case)?;

    if cli.history {
        app::print_history(&mut app).await?;
    } else if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&mut app, &prompt).await?;
    } else {
        app::run_repl(app).await?;
    }

    Ok(())
}

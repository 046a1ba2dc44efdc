use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{init_logging, load_settings_from, ServerOverrides};
use database::{connect, run_migrations, InMemoryRepository, PoolOptions, PropertyStore};
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the realty listings analytics backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = load_settings_from(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    let _log_guard = init_logging(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => {
            settings.apply_overrides(&args.overrides);
            if args.in_memory {
                tracing::warn!("Serving from an in-memory store; data is lost on exit.");
                let store: Arc<dyn PropertyStore> = Arc::new(InMemoryRepository::new());
                web_server::serve(store, &settings.server).await?;
            } else {
                web_server::run_server(&settings).await?;
            }
        }
        Commands::Migrate => {
            let pool = connect(PoolOptions {
                max_connections: 1,
                acquire_timeout: settings.database.acquire_timeout(),
            })
            .await?;
            run_migrations(&pool).await?;
            tracing::info!("Migrations complete.");
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Real-estate listings analytics backend.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file. A missing file means defaults plus environment.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ServeArgs {
    #[command(flatten)]
    overrides: ServerOverrides,

    /// Keep properties in process memory instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

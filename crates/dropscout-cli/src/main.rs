use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod alerts;
mod competitors;
mod report;
mod scan;
mod settings;

#[derive(Debug, Parser)]
#[command(name = "dropscout")]
#[command(about = "Product research and competitor monitoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a discovery scan: collect signals, score, and persist results.
    Scan {
        /// User whose filter settings drive classification.
        #[arg(long)]
        user: Uuid,
    },
    /// Manage and scan monitored competitor stores.
    Competitors {
        #[command(subcommand)]
        command: CompetitorCommands,
    },
    /// View and acknowledge competitor alerts.
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },
    /// Build and store today's daily report.
    Report {
        #[arg(long)]
        user: Uuid,
    },
    /// View or update filter thresholds.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Apply pending database migrations.
    Migrate,
}

#[derive(Debug, Subcommand)]
enum CompetitorCommands {
    /// Start monitoring a storefront.
    Add {
        #[arg(long)]
        user: Uuid,
        /// Storefront URL (collection paths are tolerated).
        url: String,
        /// Display name; defaults to the store's hostname.
        #[arg(long)]
        name: Option<String>,
    },
    /// List monitored stores.
    List {
        #[arg(long)]
        user: Uuid,
    },
    /// Scan one store, or all of a user's stores.
    Scan {
        #[arg(long)]
        user: Uuid,
        /// Scan only this store.
        #[arg(long)]
        id: Option<Uuid>,
    },
    /// Stop monitoring a store. Its alerts are removed with it.
    Remove {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCommands {
    /// Show the current thresholds (defaults if never set).
    Show {
        #[arg(long)]
        user: Uuid,
    },
    /// Update thresholds; unspecified flags keep their current values.
    Set {
        #[arg(long)]
        user: Uuid,
        #[command(flatten)]
        overrides: settings::Overrides,
    },
}

#[derive(Debug, Subcommand)]
enum AlertCommands {
    /// List alerts, newest first.
    List {
        #[arg(long)]
        user: Uuid,
        /// Include alerts already marked read.
        #[arg(long)]
        all: bool,
    },
    /// Mark an alert as read.
    Read {
        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = dropscout_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool = dropscout_db::connect_pool(
        &config.database_url,
        dropscout_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Scan { user } => scan::run(&pool, &config, user).await,
        Commands::Competitors { command } => match command {
            CompetitorCommands::Add { user, url, name } => {
                competitors::add(&pool, user, &url, name).await
            }
            CompetitorCommands::List { user } => competitors::list(&pool, user).await,
            CompetitorCommands::Scan { user, id } => {
                competitors::scan(&pool, &config, user, id).await
            }
            CompetitorCommands::Remove { id } => competitors::remove(&pool, id).await,
        },
        Commands::Alerts { command } => match command {
            AlertCommands::List { user, all } => alerts::list(&pool, user, all).await,
            AlertCommands::Read { id } => alerts::read(&pool, id).await,
        },
        Commands::Report { user } => report::run(&pool, user).await,
        Commands::Settings { command } => match command {
            SettingsCommands::Show { user } => settings::show(&pool, user).await,
            SettingsCommands::Set { user, overrides } => {
                settings::set(&pool, user, overrides).await
            }
        },
        Commands::Migrate => {
            let applied = dropscout_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}

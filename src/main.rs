use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presence_analyzer::api::routes::users::user_entries;
use presence_analyzer::api::state::AppState;
use presence_analyzer::cache::TimedCache;
use presence_analyzer::calculate;
use presence_analyzer::config::AppConfig;
use presence_analyzer::storage::CsvSource;
use presence_analyzer::UserId;

#[derive(Parser)]
#[command(name = "presence-analyzer")]
#[command(about = "Weekday presence statistics from a time-attendance log")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./presence-analyzer.toml")]
    config: PathBuf,

    /// Presence log path (overrides the config file)
    #[arg(long)]
    data_csv: Option<PathBuf>,

    /// Cache time-to-live (e.g., "10m", "90s"; 0 disables caching)
    #[arg(long, allow_hyphen_values = true)]
    cache_ttl: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the users found in the presence log
    Users,

    /// Print a weekday report for one user
    Report {
        /// User id as it appears in the log
        user_id: UserId,

        /// Which report to compute
        #[arg(long, value_enum, default_value_t = ReportKind::MeanTime)]
        kind: ReportKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportKind {
    /// Mean presence time per weekday
    MeanTime,
    /// Total presence time per weekday
    Presence,
    /// Mean start and end time per weekday
    StartEnd,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config {:?}", cli.config))?
    } else {
        AppConfig::default()
    };

    if let Some(path) = &cli.data_csv {
        config.data_csv = path.clone();
    }
    if let Some(ttl) = &cli.cache_ttl {
        let ttl = presence_analyzer::parse_ttl(ttl)
            .with_context(|| format!("Invalid --cache-ttl: {}", ttl))?;
        config.cache.ttl_seconds = ttl.num_seconds();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    Ok(config)
}

fn build_cache(config: &AppConfig) -> Arc<TimedCache> {
    let source = Arc::new(CsvSource::new(&config.data_csv));
    Arc::new(TimedCache::with_system_clock(
        config.cache.key.clone(),
        config.cache.ttl(),
        source,
    ))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting presence-analyzer v{}", env!("CARGO_PKG_VERSION"));
    if !cli.config.exists() {
        tracing::info!("No config file at {:?}, using defaults", cli.config);
    }

    let cache = build_cache(&config);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(cache);
            let app = presence_analyzer::api::build_router(state)
                .layer(presence_analyzer::api::cors_layer(&config.server.cors_origin));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(
                "Serving {:?} on http://{} (cache ttl {}s)",
                config.data_csv,
                addr,
                config.cache.ttl_seconds
            );
            axum::serve(listener, app).await?;
        }
        Commands::Users => {
            let dataset = cache.get().await?;
            print_json(&user_entries(&dataset))?;
        }
        Commands::Report { user_id, kind } => {
            let dataset = cache.get().await?;
            if !dataset.contains_user(user_id) {
                tracing::warn!("User {} not found in {:?}", user_id, config.data_csv);
            }
            match kind {
                ReportKind::MeanTime => {
                    print_json(&calculate::mean_time_weekday(&dataset, user_id))?
                }
                ReportKind::Presence => {
                    print_json(&calculate::presence_weekday(&dataset, user_id))?
                }
                ReportKind::StartEnd => {
                    print_json(&calculate::presence_start_end(&dataset, user_id))?
                }
            }
        }
    }

    Ok(())
}

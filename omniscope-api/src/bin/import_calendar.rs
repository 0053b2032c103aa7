use anyhow::Context;
use clap::Parser;
use omniscope_api::config::ApiConfig;
use omniscope_api::database::calendar_events;
use omniscope_api::helpers;
use omniscope_api::integrations::google_calendar::CalendarFeed;
use std::path::PathBuf;

/// Import a Google Calendar events export into the omniscope database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON export shaped like `{"result": [event, ...]}`
    events_file: PathBuf,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let raw = std::fs::read_to_string(&args.events_file)
        .with_context(|| format!("Failed to read {:?}", args.events_file))?;
    let feed: CalendarFeed = serde_json::from_str(&raw)
        .with_context(|| format!("{:?} is not a calendar events export", args.events_file))?;

    let config = match ApiConfig::load(args.config) {
        Ok((config, _)) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            ApiConfig::default()
        }
    };

    let (db, db_path) = helpers::database::initialize_database(config.database_path())?;
    tracing::info!("Importing {} events into {:?}", feed.result.len(), db_path);

    let summary = calendar_events::import_calendar_feed(db.async_connection.clone(), feed).await?;
    println!("Synced: {}, errors: {}", summary.synced, summary.errors);

    Ok(())
}

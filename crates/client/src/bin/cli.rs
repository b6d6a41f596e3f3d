//! Trip CLI - command-line front end for the trip duration service

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client::{load_batch, ClientConfig, TripClient, API_URL_ENV};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use trip_types::TripInput;

#[derive(Parser)]
#[command(name = "trip-cli")]
#[command(author, version, about = "Query the NYC taxi trip duration service", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service base URL
    #[arg(long, env = API_URL_ENV)]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the duration of one trip
    #[command(allow_negative_numbers = true)]
    Predict(TripArgs),

    /// Predict a batch from a JSON file or a JSON string
    Batch {
        /// Path to a JSON array of trips, or the array itself
        input: String,
    },

    /// Check a trip without predicting
    #[command(allow_negative_numbers = true)]
    Validate(TripArgs),

    /// Describe the accepted input fields
    Features,

    /// Print an example request body
    Sample,

    /// About the project
    About,

    /// Model and training details
    Version,

    /// List the available endpoints
    Help,

    /// Service health
    Health,
}

#[derive(Args)]
struct TripArgs {
    /// Vendor ID (1 or 2)
    vendor_id: i64,
    /// Number of passengers (1-6)
    passenger_count: i64,
    pickup_longitude: f64,
    pickup_latitude: f64,
    dropoff_longitude: f64,
    dropoff_latitude: f64,
    /// YYYY-MM-DD
    pickup_date: String,
    /// HH:MM, 24-hour clock
    pickup_time: String,
    /// Y or N
    store_and_fwd_flag: String,
}

impl From<TripArgs> for TripInput {
    fn from(args: TripArgs) -> Self {
        TripInput {
            vendor_id: args.vendor_id,
            passenger_count: args.passenger_count,
            pickup_longitude: args.pickup_longitude,
            pickup_latitude: args.pickup_latitude,
            dropoff_longitude: args.dropoff_longitude,
            dropoff_latitude: args.dropoff_latitude,
            pickup_date: args.pickup_date,
            pickup_time: args.pickup_time,
            store_and_fwd_flag: args.store_and_fwd_flag,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig {
        timeout_secs: cli.timeout,
        ..ClientConfig::from_env(cli.url.as_deref())
    };
    let client = TripClient::new(config)?;
    let target = client.base_url().to_string();

    match cli.command {
        Commands::Predict(args) => {
            let trip = TripInput::from(args);
            let response = client
                .predict(&trip)
                .await
                .with_context(|| format!("Prediction request to {} failed", target))?;
            print_json(&response)?;
        }
        Commands::Batch { input } => {
            let trips = load_batch(&input).context("Failed to load batch input")?;
            let response = client
                .predict_batch(&trips)
                .await
                .with_context(|| format!("Batch request to {} failed", target))?;
            print_json(&response)?;
        }
        Commands::Validate(args) => {
            let trip = TripInput::from(args);
            print_json(&client.validate(&trip).await?)?;
        }
        Commands::Features => print_json(&client.features().await?)?,
        Commands::Sample => print_json(&client.sample_features().await?)?,
        Commands::About => println!("{}", client.about().await?),
        Commands::Version => print_json(&client.version().await?)?,
        Commands::Help => print_json(&client.help().await?)?,
        Commands::Health => print_json(&client.health().await?)?,
    }

    Ok(())
}

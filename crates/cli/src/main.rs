//! Parcel CLI - command-line host for the parcel console.
//!
//! # Usage
//!
//! ```bash
//! # List parcels, optionally filtered by tracking number
//! parcel-cli parcels list --search tn1
//!
//! # Create a parcel owned by an existing user
//! parcel-cli parcels create --tracking-number TN9 --destination Lyon --owner-email ops@depot.io
//!
//! # Move a parcel along its lifecycle
//! parcel-cli parcels status 9 --done
//!
//! # Record where a parcel is
//! parcel-cli locations add 9 --description "Sorting hub"
//!
//! # Obtain a bearer token
//! parcel-cli login -u ops -p hunter22
//! ```
//!
//! # Commands
//!
//! - `parcels` - List, look up, create, delete and update parcels
//! - `locations` - Inspect and edit a parcel's location history
//! - `login` / `register` - Authentication
//!
//! Every command performs one console action and logs the resulting
//! notification. Error notifications exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use parcel_console::{
    ApiError, ConfigError, Console, ConsoleConfig, ConsoleError, Notification, ParcelApiClient,
};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "parcel-cli")]
#[command(author, version, about = "Parcel tracking console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// One variant per console view.
#[derive(Subcommand)]
enum Commands {
    /// Work with the parcel collection
    Parcels {
        #[command(subcommand)]
        action: ParcelAction,
    },
    /// Work with a parcel's location history
    Locations {
        #[command(subcommand)]
        action: LocationAction,
    },
    /// Authenticate and print a bearer token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Register a new user
    Register {
        #[arg(long)]
        firstname: String,

        #[arg(long)]
        lastname: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum ParcelAction {
    /// List all parcels
    List {
        /// Only show tracking numbers containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Look a parcel up by its exact tracking number
    Lookup { tracking_number: String },
    /// Create a parcel
    Create {
        #[arg(long)]
        tracking_number: String,

        #[arg(long, default_value = "")]
        destination: String,

        #[arg(long, default_value = "Pending")]
        status: String,

        /// Email of the owning user, as listed in the user directory
        #[arg(long)]
        owner_email: String,
    },
    /// Delete a parcel
    Delete { id: i64 },
    /// Change a parcel's status
    Status {
        id: i64,

        /// New status (any text unless --lifecycle is given)
        #[arg(required_unless_present_any = ["in_progress", "done"])]
        status: Option<String>,

        #[arg(long, conflicts_with_all = ["status", "done"])]
        in_progress: bool,

        #[arg(long, conflicts_with = "status")]
        done: bool,

        /// Only allow forward moves between Pending, In Progress and Done
        #[arg(long)]
        lifecycle: bool,
    },
}

#[derive(Subcommand)]
enum LocationAction {
    /// Show a parcel's location history
    List { parcel_id: i64 },
    /// Record a location for a parcel
    Add {
        parcel_id: i64,

        #[arg(short, long)]
        description: String,

        /// RFC 3339 timestamp (default: now)
        #[arg(short, long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Delete a location entry
    Remove { parcel_id: i64, location_id: i64 },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ApiError),

    #[error(transparent)]
    Console(#[from] ConsoleError),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "parcel_console=info,parcel_cli=info".into());

    let json = std::env::var_os("PARCEL_LOG_JSON").is_some();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Another provider may already be installed; either one will do.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let sentry_guard = init_sentry(&config);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let notification = match run(cli, &config).await {
        Ok(notification) => notification,
        Err(CliError::Console(e)) => e.report(),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    };

    if notification.is_error() {
        tracing::error!(%notification);
        std::process::exit(1);
    }
    tracing::info!(%notification);
}

async fn run(cli: Cli, config: &ConsoleConfig) -> Result<Notification, CliError> {
    let client = ParcelApiClient::new(config)?;

    let notification = match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, &username, password).await?
        }
        Commands::Register {
            firstname,
            lastname,
            email,
            username,
            password,
        } => {
            let form = commands::auth::form(firstname, lastname, email, username, password);
            commands::auth::register(&client, &form).await?
        }
        Commands::Parcels { action } => {
            let console = Console::new(client);
            console.parcels().load_all().await?;
            run_parcels(&console, action).await?
        }
        Commands::Locations { action } => {
            let console = Console::new(client);
            console.parcels().load_all().await?;
            run_locations(&console, action).await?
        }
    };

    Ok(notification)
}

async fn run_parcels(
    console: &Console,
    action: ParcelAction,
) -> Result<Notification, ConsoleError> {
    match action {
        ParcelAction::List { search } => commands::parcels::list(console, search.as_deref()).await,
        ParcelAction::Lookup { tracking_number } => {
            commands::parcels::lookup(console, &tracking_number).await
        }
        ParcelAction::Create {
            tracking_number,
            destination,
            status,
            owner_email,
        } => {
            commands::parcels::create(console, tracking_number, destination, status, owner_email)
                .await
        }
        ParcelAction::Delete { id } => commands::parcels::delete(console, id.into()).await,
        ParcelAction::Status {
            id,
            status,
            in_progress,
            done,
            lifecycle,
        } => {
            let target = if in_progress {
                commands::parcels::Target::InProgress
            } else if done {
                commands::parcels::Target::Done
            } else {
                commands::parcels::Target::Status(status.unwrap_or_default())
            };
            commands::parcels::set_status(console, id.into(), target, lifecycle).await
        }
    }
}

async fn run_locations(
    console: &Console,
    action: LocationAction,
) -> Result<Notification, ConsoleError> {
    match action {
        LocationAction::List { parcel_id } => {
            commands::locations::list(console, parcel_id.into()).await
        }
        LocationAction::Add {
            parcel_id,
            description,
            timestamp,
        } => {
            let timestamp = timestamp.unwrap_or_else(Utc::now);
            commands::locations::add(console, parcel_id.into(), &description, timestamp).await
        }
        LocationAction::Remove {
            parcel_id,
            location_id,
        } => {
            commands::locations::remove(console, parcel_id.into(), location_id.into()).await
        }
    }
}

//! Cohort Homes CLI - drive the client core from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Shortlist properties for comparison
//! cohort compare add --id 12 --title "Palm Grove" --price "₹ 70 L"
//! cohort compare list
//!
//! # Sign in with a token issued by the OTP flow
//! cohort auth login --token abc --user-id 7 --phone 9998887777 --country-code 91
//!
//! # Talk to the API
//! cohort property show 12
//! cohort dashboard visits
//! ```
//!
//! `compare` and `auth` only touch the local store (`COHORT_STORE_PATH`).
//! `property` and `dashboard` also need `COHORT_API_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

use commands::{AuthAction, CompareAction, DashboardAction, PropertyAction};
use error::CliError;

#[derive(Parser)]
#[command(name = "cohort")]
#[command(author, version, about = "Cohort Homes client tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the comparison list
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
    /// Sign in, sign out, or show the session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse and act on properties
    Property {
        #[command(subcommand)]
        action: PropertyAction,
    },
    /// Show the signed-in user's dashboard
    Dashboard {
        #[command(subcommand)]
        action: DashboardAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|d| !d.trim().is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        // Reportable errors are captured explicitly by `ClientError::report`
        tracing::Level::ERROR | tracing::Level::WARN | tracing::Level::INFO => {
            sentry_tracing::EventFilter::Breadcrumb
        }
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before Sentry reads its DSN
    let _ = dotenvy::dotenv();
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cohort_client=info,cohort_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Compare { action } => commands::compare::run(action, &mut out)?,
        Commands::Auth { action } => commands::auth::run(action, &mut out)?,
        Commands::Property { action } => commands::property::run(action, &mut out).await?,
        Commands::Dashboard { action } => commands::dashboard::run(action, &mut out).await?,
    }
    Ok(())
}

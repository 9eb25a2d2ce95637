//! Wild Senses - registration server and admin command line.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::{search, Registration, RegistrationStats};
use gateway_lib::views::export;
use sync_client::{SyncClient, SyncOutcome};

#[derive(Parser)]
#[command(name = "wild-senses")]
#[command(about = "Wild Senses program registrations: server and admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registration HTTP server
    Serve {
        #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        port: u16,
    },
    /// Print registrations held by a running server
    List {
        #[arg(long, env = "REGISTRATIONS_URL", default_value = "http://localhost:3000")]
        url: String,
        /// Only show registrations matching this term
        #[arg(long)]
        search: Option<String>,
    },
    /// Print check-in counters
    Stats {
        #[arg(long, env = "REGISTRATIONS_URL", default_value = "http://localhost:3000")]
        url: String,
    },
    /// Write registrations to a CSV file
    Export {
        #[arg(long, env = "REGISTRATIONS_URL", default_value = "http://localhost:3000")]
        url: String,
        /// Defaults to wild-senses-registrations-<date>.csv
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            info!("Starting Wild Senses registration server");
            info!("  Gateway: http://{}:{}", host, port);
            info!("  Docs:    http://{}:{}/swagger-ui", host, port);

            if let Err(e) = gateway_lib::run_embedded(&host, port).await {
                error!("Gateway failed: {}", e);
                return Err(e);
            }
        }
        Commands::List { url, search: term } => {
            let outcome = fetch(&url).await?;
            let registrations = search(outcome.registrations, term.as_deref().unwrap_or_default());
            print_registrations(&registrations);
        }
        Commands::Stats { url } => {
            let outcome = fetch(&url).await?;
            let stats = RegistrationStats::from_registrations(&outcome.registrations);
            println!("Total registrations: {}", stats.total);
            println!("Checked in:          {}", stats.checked_in);
            println!("Remaining:           {}", stats.remaining);
        }
        Commands::Export { url, output } => {
            let outcome = fetch(&url).await?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(export::export_filename(Utc::now().date_naive())));
            let csv = export::registrations_csv(&outcome.registrations)?;
            tokio::fs::write(&path, csv).await?;
            info!(
                "Exported {} registrations to {}",
                outcome.registrations.len(),
                path.display()
            );
        }
    }

    Ok(())
}

/// Lenient fetch; the failure message is logged and the (empty) list used.
async fn fetch(url: &str) -> Result<SyncOutcome, Box<dyn std::error::Error>> {
    let client = SyncClient::new(url)?;
    let outcome = client.fetch().await;
    if let Some(message) = &outcome.error {
        error!("Registrations from {} may be incomplete: {}", client.base_url(), message);
    }
    Ok(outcome)
}

fn print_registrations(registrations: &[Registration]) {
    if registrations.is_empty() {
        println!("No registrations found");
        return;
    }

    for registration in registrations {
        let status = if registration.checked_in { "checked in" } else { "waiting" };
        println!(
            "{:<15} {:<30} {:<8} {} <{}> {} [{}]",
            registration.id,
            registration.child_names,
            registration.child_ages,
            registration.parent_name,
            registration.parent_email,
            registration.parent_phone,
            status
        );
        if registration.has_notes() {
            if !registration.allergies.is_empty() {
                println!("{:<15} Allergies: {}", "", registration.allergies);
            }
            if !registration.neurodivergencies.is_empty() {
                println!("{:<15} Special needs: {}", "", registration.neurodivergencies);
            }
        }
    }
}

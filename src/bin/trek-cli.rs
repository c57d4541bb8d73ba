use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use trek_backoffice::config::load_or_default;
use trek_backoffice::credentials::{generate_batch, generate_credentials};
use trek_backoffice::observability::logging;
use trek_backoffice::settings::{FileStore, SettingsService};

#[derive(Parser)]
#[command(name = "trek-cli")]
#[command(about = "Back office tooling for the trekking site", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print branding settings (cached for the configured TTL)
    Settings {
        /// Ignore the cached entry and refetch
        #[arg(long)]
        refresh: bool,
    },
    /// Generate admin credentials
    Credentials {
        /// Account email; omit to generate a numbered batch
        #[arg(short, long)]
        email: Option<String>,

        /// Password length (defaults to the config value)
        #[arg(short, long)]
        length: Option<usize>,

        /// Batch size when no email is given
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Settings { refresh } => {
            let store = FileStore::new(&config.settings_cache.dir);
            let service = SettingsService::from_config(&config, store)?;
            let settings = if refresh {
                service.refresh().await?
            } else {
                service.branding().await?
            };
            print_json(&settings)?;
        }
        Commands::Credentials { email, length, count } => {
            let length = length.unwrap_or(config.credentials.password_length);
            match email {
                Some(email) => print_json(&generate_credentials(&email, length)?)?,
                None => print_json(&generate_batch("admin", &config.credentials.email_domain, count, length)?)?,
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ledgerview_etl::{EtlApi, EtlClient, load_snapshot};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;
mod export;
mod integration;
mod render;
mod state;

use config::{Config, config_path, init_config, load_config};
use integration::{Mode, Outcome};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEDGERVIEW_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "ledgerview",
    version = VERSION,
    about = "Profit & loss dashboard for the multi-company ETL service"
)]
struct Cli {
    /// ETL service base URL (overrides config)
    #[arg(long, global = true, env = "LEDGERVIEW_API_URL")]
    api_url: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the ETL service is up
    Health,

    /// Print the current integration status once
    Status,

    /// Start an integration run and follow it until it finishes
    Integrate {
        /// Return as soon as the run is accepted
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },

    /// Follow integration status changes until completion or Ctrl-C
    Watch,

    /// Fetch profit & loss data and print the dashboard
    Report {
        /// Max account rows printed
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Drill down into one account code
        #[arg(long)]
        account: Option<String>,

        /// Include the per-section statement
        #[arg(long, default_value_t = false)]
        statement: bool,

        /// Print the snapshot as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the account table to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Manage ~/.ledgerview/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

struct ReportOptions {
    limit: usize,
    account: Option<String>,
    statement: bool,
    json: bool,
    csv: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            account: None,
            statement: false,
            json: false,
            csv: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = load_config()?.with_api_url(cli.api_url);

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => show_config(&cfg)?,
        },
        Command::Health => health(&connect(&cfg)?).await?,
        Command::Status => status(&connect(&cfg)?).await?,
        Command::Integrate { no_wait } => {
            let mode = Mode::Trigger { wait: !no_wait };
            follow_and_report(&cfg, connect(&cfg)?, mode).await?;
        }
        Command::Watch => follow_and_report(&cfg, connect(&cfg)?, Mode::Watch).await?,
        Command::Report {
            limit,
            account,
            statement,
            json,
            csv,
        } => {
            let opts = ReportOptions {
                limit,
                account,
                statement,
                json,
                csv,
            };
            report(&connect(&cfg)?, &opts).await?;
        }
    }

    Ok(())
}

fn connect(cfg: &Config) -> Result<EtlClient> {
    let client = EtlClient::with_timeout(&cfg.api.base_url, cfg.request_timeout())
        .with_context(|| format!("ETL client for {}", cfg.api.base_url))?;
    tracing::debug!("Using ETL service at {}", client.base_url());
    Ok(client)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "ledgerview=debug"
    } else {
        "ledgerview=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn show_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("# {}", p.display());
    } else {
        println!("# {} (not found, defaults)", p.display());
    }
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}

async fn health(client: &EtlClient) -> Result<()> {
    let envelope = client.health_check().await?;
    match envelope.into_payload() {
        Ok(health) => {
            println!("{}: {}", client.base_url(), health.status);
            Ok(())
        }
        Err(message) => bail!("health check failed: {}", message),
    }
}

async fn status(client: &EtlClient) -> Result<()> {
    let envelope = client.integration_status().await?;
    let status = match envelope.into_payload() {
        Ok(status) => status,
        Err(message) if message.is_empty() => bail!("Failed to get status"),
        Err(message) => bail!(message),
    };

    let mut out = String::new();
    render::status(&mut out, &status)?;
    print!("{out}");
    Ok(())
}

async fn follow_and_report(cfg: &Config, client: EtlClient, mode: Mode) -> Result<()> {
    match integration::follow(client.clone(), cfg.poll_interval(), mode).await? {
        Outcome::Completed(status) => {
            println!(
                "\nIntegration completed: {} records processed\n",
                status.records_processed
            );
            report(&client, &ReportOptions::default()).await
        }
        Outcome::Failed(status) => bail!("integration failed: {}", status.message),
        Outcome::TriggerFailed(message) => bail!(message),
        Outcome::Started => {
            println!("Follow with: ledgerview watch");
            Ok(())
        }
        Outcome::AlreadyRunning => {
            println!("Integration already running. Follow with: ledgerview watch");
            Ok(())
        }
        Outcome::NotRunning(status) => {
            println!(
                "No integration running (last run {}: {})",
                status.last_run_label(),
                status.phase_label()
            );
            Ok(())
        }
        Outcome::Unavailable(message) => bail!("could not read integration status: {}", message),
        Outcome::Interrupted => {
            println!("Stopped.");
            Ok(())
        }
    }
}

async fn report(client: &EtlClient, opts: &ReportOptions) -> Result<()> {
    let snapshot = load_snapshot(client).await;

    if let Some(path) = &opts.csv {
        export::export_rows(&snapshot.table, path)?;
    }

    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?
        );
        return Ok(());
    }

    let mut out = String::new();
    render::report(&mut out, &snapshot, opts.limit)?;

    if let Some(code) = &opts.account {
        out.push('\n');
        match snapshot.table.find(code) {
            Some(row) => render::breakdown(&mut out, row)?,
            None if snapshot.has_data() => bail!("no account with code {}", code),
            None => {}
        }
    }

    if opts.statement && snapshot.has_data() {
        out.push('\n');
        render::statement(&mut out, &snapshot.table.periods, &snapshot.statement)?;
    }

    print!("{out}");

    if let Some(path) = &opts.csv {
        println!("\nWrote {}", path.display());
    }
    Ok(())
}

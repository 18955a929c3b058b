use std::fmt::Display;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use waktu::app::{AppContext, Result};
use waktu::cli::alfred::{AlfredResponse, Severity};
use waktu::cli::{commands, Cli, Commands};
use waktu::config::{self, Config, OutputMode};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Known before the config file is read, so a bad file still reaches Alfred as JSON
    let requested = cli
        .output
        .or_else(|| config::output_from_env(|key| std::env::var(key).ok()));

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) if requested == Some(OutputMode::Alfred) => return alfred_failure(e),
        Err(e) => return Err(e.into()),
    };
    cli.apply(&mut config);

    init_tracing(&config);

    let alfred = config.is_alfred();
    let result = match AppContext::new(config) {
        Ok(ctx) => dispatch(&ctx, cli.command()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if alfred => alfred_failure(e),
        Err(e) => Err(e.into()),
    }
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Get { zone, mode } => {
            commands::show_prayer_times(ctx, zone.as_deref(), mode).await
        }
        Commands::Zone => commands::list_zones(ctx).await,
        Commands::SetZone { zone_id } => commands::set_zone(ctx, zone_id.as_deref()).await,
        Commands::Update { zone } => commands::update_schedule(ctx, zone.as_deref()).await,
    }
}

fn alfred_failure(e: impl Display) -> anyhow::Result<ExitCode> {
    tracing::error!("{}", e);
    AlfredResponse::notice(Severity::Error, &e.to_string(), None)
        .write_to(&mut io::stdout().lock())?;
    Ok(ExitCode::FAILURE)
}

fn init_tracing(config: &Config) {
    // Alfred reads stdout as JSON; keep it quiet unless asked
    let filter = if config.debug {
        EnvFilter::new("warn,waktu=debug")
    } else if config.is_alfred() {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

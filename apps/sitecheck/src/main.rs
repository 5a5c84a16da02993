#![warn(clippy::all, clippy::pedantic)]

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::{error, info};

use sitecheck::AppError;
use sitecheck::config::{Credentials, Profile, ProfileName};
use sitecheck::monitoring::Prober;
use sitecheck::notify::ResendNotifier;
use sitecheck::runner;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Built-in profile used when no config file is found
    #[arg(long, value_enum, default_value_t = ProfileName::Retrying)]
    profile: ProfileName,

    /// TOML profile with targets and probe settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective profile and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective profile as TOML and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.verbose {
        logger::init_tracing_verbose();
    } else {
        logger::init_tracing();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", anyhow::Error::from(err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if cli.print_config || cli.write_config.is_some() {
        let profile = Profile::resolve(cli.config.as_deref(), cli.profile)?;
        if cli.print_config {
            print!("{profile}");
        }
        if let Some(path) = &cli.write_config {
            let written = profile.write_config(path)?;
            info!("Wrote profile to {}", written.display());
        }
        return Ok(());
    }

    let (credentials, profile) =
        runner::preflight(Credentials::from_env, cli.config.as_deref(), cli.profile)?;

    let prober = Prober::http(&profile).map_err(AppError::Client)?;
    let notifier =
        ResendNotifier::from_env(credentials.api_key.clone()).map_err(AppError::Client)?;

    runner::run(&credentials, &profile, &prober, &notifier).await?;
    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use injection_db::config::{self, Settings};
use injection_db::database::downloaders::HttpFileDownloader;
use injection_db::database::file_systems::OsFileSystem;
use injection_db::database::json;
use injection_db::database::layout::DatabaseLayout;
use injection_db::database::service::{InjectionDatabaseService, UpdateOutcome};
use injection_db::logging::init_logging;

#[derive(Parser)]
#[command(name = "injection-db")]
#[command(version, about = "Updates and queries the executable injection profile database")]
struct Cli {
    /// Release host base URL (overrides the settings file)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Application directory holding InjectionDatabase/ (defaults to the executable's directory)
    #[arg(long, global = true)]
    app_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to injection-db.log in the application directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the active database version
    Status,
    /// Check the release host for a compatible newer database
    Check,
    /// Check for and install a newer database
    Update,
    /// Find the injection profile for an executable
    Find {
        /// Path to the executable
        exe: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_dir = cli.app_dir.clone().unwrap_or_else(config::app_dir);
    let log_file = cli.log_file.then(|| config::log_path(&app_dir));
    let _guard = init_logging(&cli.log_level, log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, app_dir))
}

async fn run(cli: Cli, app_dir: PathBuf) -> anyhow::Result<()> {
    let mut settings = Settings::load(&config::settings_path(&app_dir))?;
    if let Some(source) = cli.source {
        settings.source_server_db_path = source;
    }

    let layout = DatabaseLayout::new(config::database_root(&app_dir));
    info!(
        "Using database root {:?} and source {}",
        layout.root(),
        settings.source_server_db_path
    );

    let service = InjectionDatabaseService::new(
        Arc::new(HttpFileDownloader::new()?),
        Arc::new(OsFileSystem),
        layout,
        &settings,
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            ctrl_c_cancel.cancel();
        }
    });

    match cli.command {
        Command::Status => match service.current_version(Some(&cancel)).await? {
            Some(current) => println!("Installed: {current}"),
            None => println!("No injection database installed"),
        },
        Command::Check => match service.check_for_update(Some(&cancel)).await? {
            Some(latest) => println!("Update available: {latest}"),
            None => println!("No update available"),
        },
        Command::Update => {
            let Some(latest) = service.check_for_update(Some(&cancel)).await? else {
                println!("No update available");
                return Ok(());
            };
            match service.update_database(&latest, Some(&cancel)).await? {
                UpdateOutcome::Installed(installed) => println!("Installed: {installed}"),
                UpdateOutcome::DownloadFailed => {
                    anyhow::bail!("Failed to download injection database {latest}")
                }
            }
        }
        Command::Find { exe } => {
            let profile = service
                .find_exe_profile_for_file(&exe, Some(&cancel))
                .await
                .with_context(|| format!("Failed to look up profile for {}", exe.display()))?;
            match profile {
                Some(profile) => println!("{}", json::to_string_pretty(&profile)?),
                None => println!("No profile found for {}", exe.display()),
            }
        }
    }

    Ok(())
}

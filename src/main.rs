//! ReelShelf HTTP server.
//!
//! `reelshelf serve` (the default) runs the JSON API; `reelshelf migrate`
//! only brings the database schema up to date.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use reelshelf::app::{App, AppState};
use reelshelf::database::Database;
use reelshelf::services::settings_engine::{SettingsEngine, SettingsEngineTrait, DATABASE_PATH_VAR};
use reelshelf::types::settings::ServerSettings;

#[derive(Debug, Parser)]
#[command(name = "reelshelf", version, about = "Personal video and link bookmarks")]
struct Cli {
    /// Path to a JSON settings file (overrides REELSHELF_CONFIG).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Listen address, e.g. 127.0.0.1:8787.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Apply schema migrations and seed default categories, then exit.
    Migrate,
}

fn load_settings(config: Option<String>) -> Result<ServerSettings, String> {
    let mut engine = match config {
        Some(path) => SettingsEngine::new(Some(path)),
        None => SettingsEngine::from_env(),
    };
    engine.load().map_err(|e| e.to_string())
}

fn migrate(settings: &ServerSettings) -> Result<(), String> {
    let path = settings
        .database_path
        .as_deref()
        .ok_or_else(|| format!("{} not configured", DATABASE_PATH_VAR))?;
    let db = Database::open(path).map_err(|e| e.to_string())?;
    tracing::info!(path, schema_version = db.schema_version(), "migrations applied");
    Ok(())
}

async fn serve(mut settings: ServerSettings, bind: Option<String>) -> Result<(), String> {
    if let Some(bind) = bind {
        settings.bind_address = bind;
    }
    let addr = settings.bind_address.clone();
    let app = App::new(settings).map_err(|e| e.to_string())?;
    let state = AppState::new(app).map_err(|e| e.to_string())?;
    reelshelf::server::serve(state, &addr)
        .await
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    reelshelf::init_tracing();
    let cli = Cli::parse();

    let settings = match load_settings(cli.config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => serve(settings, bind).await,
        Command::Migrate => migrate(&settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "reelshelf exited with an error");
            ExitCode::FAILURE
        }
    }
}

use clap::{Parser, Subcommand};
use heritage_explorer::config::Config;
use heritage_explorer::helper::media_helpers::MediaStore;
use heritage_explorer::helper::storage_helpers::Storage;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for initial application setup.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a .env configuration file.
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Contributions {
        #[command(subcommand)]
        action: ContributionsAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Creates the contributions table and the upload directory.
    Setup,
}

#[derive(Subcommand, Debug)]
enum ContributionsAction {
    /// Prints every stored contribution.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env(cli.env_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Db { action: DbAction::Setup } => setup_database(&config),
        Commands::Contributions { action: ContributionsAction::List } => list_contributions(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("❌ {}", message);
            ExitCode::FAILURE
        }
    }
}

fn setup_database(config: &Config) -> Result<(), String> {
    let db_path = config.database_file();
    println!("Setting up contributions database at '{}'...", db_path.display());
    let storage = Storage::open(&db_path).map_err(|e| e.to_string())?;
    storage.initialize().map_err(|e| format!("Error setting up database: {}", e))?;
    println!("✅ Contributions table is ready.");

    let store = MediaStore::open(&config.upload_path()).map_err(|e| e.to_string())?;
    println!("✅ Upload directory is ready at '{}'.", store.root().display());
    Ok(())
}

fn list_contributions(config: &Config) -> Result<(), String> {
    let storage = Storage::open(&config.database_file()).map_err(|e| e.to_string())?;
    let rows = storage.list_all().map_err(|e| format!("Error reading contributions: {}", e))?;
    let total = storage.count().map_err(|e| e.to_string())?;

    println!("--- {} contribution(s) ---", total);
    for c in rows {
        println!(
            "#{} [{}] {} ({}, {:.6}, {:.6}) by {} at {}{}",
            c.id,
            c.category,
            c.title,
            c.language,
            c.latitude,
            c.longitude,
            c.username.as_deref().unwrap_or("anonymous"),
            c.timestamp,
            c.media_url.map(|m| format!(" media: {}", m)).unwrap_or_default(),
        );
    }
    Ok(())
}

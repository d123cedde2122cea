/// Main entry point for the Habit Analytics MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_analytics_mcp::HabitAnalyticsServer;

const DATA_DIR_NAME: &str = "habit_analytics";
const DATABASE_FILE: &str = "habits.db";

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|p| p.join(format!(".{}", DATA_DIR_NAME))),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|p| p.join(DATA_DIR_NAME)),
        // 3. User's config directory
        dirs::config_dir().map(|p| p.join(DATA_DIR_NAME)),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|p| p.join(format!(".{}", DATA_DIR_NAME))),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if is_writable_dir(potential_path) {
            return Ok(potential_path.join(DATABASE_FILE));
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_path = std::env::temp_dir().join(DATA_DIR_NAME);
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join(DATABASE_FILE))
}

/// Create the directory if needed and check a file can be written in it
fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let test_file = dir.join(".test_write");
    if std::fs::write(&test_file, "test").is_ok() {
        let _ = std::fs::remove_file(&test_file);
        true
    } else {
        false
    }
}

/// Command line arguments for the Habit Analytics MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, conflicts_with = "memory")]
    database: Option<PathBuf>,

    /// Keep habits in memory only; nothing is written to disk
    #[arg(long)]
    memory: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags; RUST_LOG wins when set
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_analytics_mcp={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting Habit Analytics MCP server");

    let server = if args.memory {
        info!("Using in-memory storage");
        HabitAnalyticsServer::in_memory()
    } else {
        let db_path = match args.database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            None => get_default_database_path()?,
        };

        info!("Using database at: {}", db_path.display());
        HabitAnalyticsServer::new(db_path).await?
    };

    // Run the MCP server - this will handle JSON-RPC communication over stdin/stdout
    server.run().await?;

    info!("Habit Analytics MCP server shutdown complete");
    Ok(())
}

/// Public library interface for the Habit Analytics MCP server
///
/// This module exports the analytics engine, the record sources it reads
/// from, the tool functions and the server that ties them together.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{
    AnalyticsEngine, BestHour, Calendar, CalendarView, ColorTier, HabitMetrics, NormalizedFrequency,
    PeriodProgress, PeriodWindow,
};
pub use domain::*;
pub use storage::{HabitStorage, InMemoryStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit analytics server that implements the MCP protocol
///
/// Holds a record source and the analytics engine; every tool call reads
/// records from the former and hands them to the latter.
pub struct HabitAnalyticsServer {
    storage: Box<dyn HabitStorage>,
    analytics: AnalyticsEngine,
}

impl HabitAnalyticsServer {
    /// Create a server backed by the SQLite database at `db_path`
    ///
    /// This will initialize the schema if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Analytics server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(Box::new(storage)))
    }

    /// Create a server backed by the in-memory mock store
    pub fn in_memory() -> Self {
        tracing::info!("Initializing Habit Analytics server with in-memory storage");
        Self::with_storage(Box::new(InMemoryStorage::new()))
    }

    /// Create a server over any record source
    pub fn with_storage(storage: Box<dyn HabitStorage>) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns when stdin closes or an I/O error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test storage connectivity
        let habits = self.storage.list_habits(None)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &dyn HabitStorage {
        self.storage.as_ref()
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}

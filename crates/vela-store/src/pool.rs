//! # Store Handle & Configuration
//!
//! Connection pool creation and lifecycle for the document store.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Lifecycle                                    │
//! │                                                                         │
//! │  Host application startup                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← configure pool settings                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config).await ← create pool + run migrations              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store handle cloned into every repository (no ambient global)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::close() on shutdown  —or—  Store::destroy() for a full reset   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no ambient process-wide handle: the store is constructed
//! explicitly, injected where needed, and closed explicitly.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::audit::AuditLog;
use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::expense::ExpenseRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::loan::LoanLedger;
use crate::repository::partner::PartnerRepository;
use crate::repository::receipt::ReceiptRepository;
use crate::repository::report::ReportRepository;
use crate::repository::sale::SaleRepository;
use vela_core::HolderKind;

// =============================================================================
// Configuration
// =============================================================================

/// Document store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/vela.db").max_connections(5);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-process POS)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a new configuration with the given database path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// In-memory SQLite lives and dies with its single connection, so the
    /// pool is pinned to one.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the document store.
///
/// Cheap to clone (wraps a connection pool); constructed once at process
/// start and passed to every repository.
#[derive(Debug, Clone)]
pub struct Store {
    /// The SQLite connection pool.
    pub(crate) pool: SqlitePool,

    /// Database file path; `None` for in-memory stores.
    file_path: Option<PathBuf>,
}

impl Store {
    /// Opens the document store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL journal, NORMAL synchronous)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening document store"
        );

        // sqlite://path?mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block the single writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Store pool created"
        );

        let file_path = if config.is_in_memory() {
            None
        } else {
            Some(config.database_path.clone())
        };

        let store = Store { pool, file_path };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs pending migrations. Idempotent; called by `open` by default.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running store migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool.
    ///
    /// After calling close, every store operation fails. Call once on
    /// application shutdown.
    pub async fn close(&self) {
        info!("Closing document store");
        self.pool.close().await;
    }

    /// Destroys the store: closes the pool and removes the database files.
    ///
    /// IRREVERSIBLE. Used only for full resets; there is no undo and no
    /// backup taken here.
    pub async fn destroy(self) -> StoreResult<()> {
        warn!("Destroying document store");
        self.pool.close().await;

        if let Some(path) = self.file_path {
            for suffix in ["", "-wal", "-shm"] {
                let mut candidate = path.clone().into_os_string();
                candidate.push(suffix);
                let candidate = PathBuf::from(candidate);
                if candidate.exists() {
                    std::fs::remove_file(&candidate)
                        .map_err(|e| StoreError::Storage(e.to_string()))?;
                }
            }
        }

        info!("Store destroyed");
        Ok(())
    }

    // =========================================================================
    // Repository Accessors
    // =========================================================================

    /// Returns the activity logger.
    pub fn audit(&self) -> AuditLog {
        AuditLog::new(self.clone())
    }

    /// Returns the inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.clone())
    }

    /// Returns the sales repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    /// Returns the receipts repository.
    pub fn receipts(&self) -> ReceiptRepository {
        ReceiptRepository::new(self.clone())
    }

    /// Returns the expenditures repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }

    /// Returns the supplier repository.
    pub fn suppliers(&self) -> PartnerRepository {
        PartnerRepository::new(self.clone(), HolderKind::Supplier)
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> PartnerRepository {
        PartnerRepository::new(self.clone(), HolderKind::Customer)
    }

    /// Returns the loan ledger for supplier balances.
    pub fn supplier_ledger(&self) -> LoanLedger {
        LoanLedger::new(self.clone(), HolderKind::Supplier)
    }

    /// Returns the loan ledger for customer balances.
    pub fn customer_ledger(&self) -> LoanLedger {
        LoanLedger::new(self.clone(), HolderKind::Customer)
    }

    /// Returns the cross-kind report reader.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/vela-test.db").max_connections(10);
        assert_eq!(config.max_connections, 10);
        assert!(!config.is_in_memory());
        assert!(StoreConfig::in_memory().is_in_memory());
    }
}

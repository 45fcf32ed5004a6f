//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use signage_common::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    let manager = manager.with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
    });

    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Initialize a new database pool with the given file path.
///
/// Creates the SQLite file if needed, enables foreign keys on every
/// connection and runs pending migrations.
///
/// # Example
///
/// ```no_run
/// use signage_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/signage/signage.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    build_pool(SqliteConnectionManager::file(db_path))
}

/// Initialize an in-memory database pool for testing.
///
/// Every pooled connection attaches to the same named shared-cache database,
/// so rows written through one connection are visible through the others.
/// The database is dropped with the pool.
///
/// # Example
///
/// ```
/// use signage_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let uri = format!(
        "file:signage-{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    build_pool(SqliteConnectionManager::file(uri))
}

/// Get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

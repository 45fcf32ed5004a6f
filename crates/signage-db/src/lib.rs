//! Signage-DB: Database schema, migrations, and query operations
//!
//! This crate provides the persistence side of signage using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use signage_db::pool::{init_pool, get_conn};
//! use signage_db::queries::playlists;
//!
//! let pool = init_pool("/var/lib/signage/signage.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let playlist = playlists::create_playlist(&conn, "Lobby", false).unwrap();
//! println!("Created playlist: {}", playlist.name);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - assets: Asset records and their encoded payloads
//! - playlists: Playlists and their ordered items
//! - screens: Registered screens and token lookup

pub mod assets;
pub mod playlists;
pub mod screens;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use signage_common::Error;

/// Parse an RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(value: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Convert a rusqlite error, reporting constraint violations as conflicts.
pub(crate) fn map_db_err(e: rusqlite::Error) -> Error {
    if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
        Error::conflict(e.to_string())
    } else {
        Error::database(e.to_string())
    }
}

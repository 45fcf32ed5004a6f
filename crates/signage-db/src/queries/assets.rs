//! Asset database queries.
//!
//! Assets are always selected under the table alias `a` so the same column
//! list and row parser serve both direct lookups and playlist joins.

use chrono::Utc;
use rusqlite::{named_params, types::Type, Connection, OptionalExtension};
use signage_common::{AssetId, AssetKind, Error, Result};

use super::{map_db_err, parse_timestamp};
use crate::models::{Asset, EncodedPayload, NewAsset};

/// Asset columns in the order expected by [`parse_asset_row`].
pub(crate) const ASSET_COLUMNS: &str = "a.id, a.name, a.kind, a.filename, a.mime_type, a.url, \
     a.template_key, a.duration, a.cache_content, a.active, \
     (a.payload IS NOT NULL AND a.payload <> '') AS has_payload, a.created_at, a.updated_at";

/// Number of columns in [`ASSET_COLUMNS`].
pub(crate) const ASSET_COLUMN_COUNT: usize = 13;

/// Parse an asset whose columns start at `offset`.
pub(crate) fn parse_asset_row(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Asset> {
    let kind: String = row.get(offset + 2)?;
    let kind = kind.parse::<AssetKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(offset + 2, Type::Text, e.into())
    })?;

    Ok(Asset {
        id: AssetId::from(row.get::<_, i64>(offset)?),
        name: row.get(offset + 1)?,
        kind,
        filename: row.get(offset + 3)?,
        mime_type: row.get(offset + 4)?,
        url: row.get(offset + 5)?,
        template_key: row.get(offset + 6)?,
        duration: row.get(offset + 7)?,
        cache_content: row.get(offset + 8)?,
        active: row.get(offset + 9)?,
        has_payload: row.get(offset + 10)?,
        created_at: parse_timestamp(&row.get::<_, String>(offset + 11)?, offset + 11)?,
        updated_at: parse_timestamp(&row.get::<_, String>(offset + 12)?, offset + 12)?,
    })
}

/// Insert a new asset.
///
/// The payload, when present, is stored base64 encoded.
pub fn insert_asset(conn: &Connection, asset: &NewAsset) -> Result<Asset> {
    if asset.name.trim().is_empty() {
        return Err(Error::invalid_input("asset name must not be empty"));
    }

    let now = Utc::now().to_rfc3339();
    let payload = asset
        .payload
        .as_deref()
        .map(|data| EncodedPayload::encode(data).as_str().to_string());

    conn.execute(
        "INSERT INTO assets (name, kind, payload, filename, mime_type, url, template_key,
                             duration, cache_content, created_at, updated_at)
         VALUES (:name, :kind, :payload, :filename, :mime_type, :url, :template_key,
                 :duration, :cache_content, :now, :now)",
        named_params! {
            ":name": &asset.name,
            ":kind": asset.kind.as_str(),
            ":payload": payload,
            ":filename": &asset.filename,
            ":mime_type": &asset.mime_type,
            ":url": &asset.url,
            ":template_key": &asset.template_key,
            ":duration": asset.duration,
            ":cache_content": asset.cache_content,
            ":now": &now,
        },
    )
    .map_err(map_db_err)?;

    let id = AssetId::from(conn.last_insert_rowid());
    get_asset(conn, id)?.ok_or_else(|| Error::internal(format!("asset {} vanished after insert", id)))
}

/// Get an asset by ID.
///
/// # Returns
///
/// * `Ok(Some(Asset))` - The asset if found
/// * `Ok(None)` - If the asset does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_asset(conn: &Connection, id: AssetId) -> Result<Option<Asset>> {
    conn.query_row(
        &format!("SELECT {ASSET_COLUMNS} FROM assets a WHERE a.id = :id"),
        named_params! { ":id": id.get() },
        |row| parse_asset_row(row, 0),
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Check whether an asset exists.
pub fn asset_exists(conn: &Connection, id: AssetId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM assets WHERE id = :id)",
        named_params! { ":id": id.get() },
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get the encoded payload of an asset.
///
/// Returns `Ok(None)` both for a missing asset and for an asset without a
/// payload.
pub fn get_asset_payload(conn: &Connection, id: AssetId) -> Result<Option<EncodedPayload>> {
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT payload FROM assets WHERE id = :id",
            named_params! { ":id": id.get() },
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(stored
        .flatten()
        .map(EncodedPayload::from_stored)
        .filter(|payload| !payload.is_empty()))
}

/// Replace the payload of an asset and bump its modification time.
pub fn set_asset_payload(
    conn: &Connection,
    id: AssetId,
    data: &[u8],
    filename: Option<&str>,
    mime_type: Option<&str>,
) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE assets
             SET payload = :payload, filename = :filename, mime_type = :mime_type,
                 updated_at = :now
             WHERE id = :id",
            named_params! {
                ":payload": EncodedPayload::encode(data).as_str(),
                ":filename": filename,
                ":mime_type": mime_type,
                ":now": Utc::now().to_rfc3339(),
                ":id": id.get(),
            },
        )
        .map_err(map_db_err)?;

    if updated == 0 {
        return Err(Error::not_found(format!("asset {}", id)));
    }
    Ok(())
}

/// Delete an asset.
///
/// Fails with [`Error::Conflict`] while any playlist item references it.
///
/// # Returns
///
/// * `Ok(true)` - If the asset was deleted
/// * `Ok(false)` - If no such asset existed
pub fn delete_asset(conn: &Connection, id: AssetId) -> Result<bool> {
    let deleted = conn
        .execute(
            "DELETE FROM assets WHERE id = :id",
            named_params! { ":id": id.get() },
        )
        .map_err(map_db_err)?;
    Ok(deleted > 0)
}

//! Screen queries.
//!
//! Screens are looked up publicly by their opaque token; only active screens
//! are ever returned by token.

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension};
use signage_common::{AssetId, Error, PlaylistId, Result, ScreenId};

use super::{map_db_err, parse_timestamp};
use crate::models::{NewScreen, Screen};

const SCREEN_COLUMNS: &str = "id, name, token, playlist_id, preloader_asset_id, \
     show_fullscreen_button, cache_slides, preload_next_slide, is_public, active, note, created_at";

fn parse_screen_row(row: &rusqlite::Row) -> rusqlite::Result<Screen> {
    Ok(Screen {
        id: ScreenId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        token: row.get(2)?,
        playlist_id: row.get::<_, Option<i64>>(3)?.map(PlaylistId::from),
        preloader_asset_id: row.get::<_, Option<i64>>(4)?.map(AssetId::from),
        show_fullscreen_button: row.get(5)?,
        cache_slides: row.get(6)?,
        preload_next_slide: row.get(7)?,
        is_public: row.get(8)?,
        active: row.get(9)?,
        note: row.get(10)?,
        created_at: parse_timestamp(&row.get::<_, String>(11)?, 11)?,
    })
}

/// Generate a fresh unguessable screen token.
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Register a new screen.
///
/// Fails with [`Error::Conflict`] if the token is already taken.
pub fn create_screen(conn: &Connection, screen: &NewScreen) -> Result<Screen> {
    let token = screen.token.clone().unwrap_or_else(generate_token);
    if token.trim().is_empty() {
        return Err(Error::invalid_input("screen token must not be empty"));
    }

    conn.execute(
        "INSERT INTO screens (name, token, playlist_id, preloader_asset_id, show_fullscreen_button,
                              cache_slides, preload_next_slide, active, note, created_at)
         VALUES (:name, :token, :playlist_id, :preloader_asset_id, :show_fullscreen_button,
                 :cache_slides, :preload_next_slide, :active, :note, :created_at)",
        named_params! {
            ":name": &screen.name,
            ":token": &token,
            ":playlist_id": screen.playlist_id.map(PlaylistId::get),
            ":preloader_asset_id": screen.preloader_asset_id.map(AssetId::get),
            ":show_fullscreen_button": screen.show_fullscreen_button,
            ":cache_slides": screen.cache_slides,
            ":preload_next_slide": screen.preload_next_slide,
            ":active": screen.active,
            ":note": &screen.note,
            ":created_at": Utc::now().to_rfc3339(),
        },
    )
    .map_err(map_db_err)?;

    let id = ScreenId::from(conn.last_insert_rowid());
    get_screen(conn, id)?.ok_or_else(|| Error::internal(format!("screen {} vanished after insert", id)))
}

/// Get a screen by ID, active or not.
pub fn get_screen(conn: &Connection, id: ScreenId) -> Result<Option<Screen>> {
    conn.query_row(
        &format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE id = :id"),
        named_params! { ":id": id.get() },
        parse_screen_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Find an active screen by its token.
pub fn get_active_screen_by_token(conn: &Connection, token: &str) -> Result<Option<Screen>> {
    conn.query_row(
        &format!("SELECT {SCREEN_COLUMNS} FROM screens WHERE token = :token AND active = 1"),
        named_params! { ":token": token },
        parse_screen_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Activate or deactivate a screen.
pub fn set_screen_active(conn: &Connection, id: ScreenId, active: bool) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE screens SET active = :active WHERE id = :id",
            named_params! { ":active": active, ":id": id.get() },
        )
        .map_err(map_db_err)?;

    if updated == 0 {
        return Err(Error::not_found(format!("screen {}", id)));
    }
    Ok(())
}

//! Playlist and playlist item queries.

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension};
use signage_common::{AssetId, Error, PlaylistId, PlaylistItemId, Result};

use super::assets::{parse_asset_row, ASSET_COLUMNS};
use super::{map_db_err, parse_timestamp};
use crate::models::{Playlist, PlaylistEntry, PlaylistItem};

fn parse_playlist_row(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
    Ok(Playlist {
        id: PlaylistId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        auto_unmute: row.get(2)?,
        active: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?, 4)?,
    })
}

fn parse_item_row(row: &rusqlite::Row) -> rusqlite::Result<PlaylistItem> {
    Ok(PlaylistItem {
        id: PlaylistItemId::from(row.get::<_, i64>(0)?),
        playlist_id: PlaylistId::from(row.get::<_, i64>(1)?),
        asset_id: AssetId::from(row.get::<_, i64>(2)?),
        sequence: row.get(3)?,
        duration_override: row.get(4)?,
    })
}

/// Create a new playlist.
pub fn create_playlist(conn: &Connection, name: &str, auto_unmute: bool) -> Result<Playlist> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("playlist name must not be empty"));
    }

    conn.execute(
        "INSERT INTO playlists (name, auto_unmute, created_at)
         VALUES (:name, :auto_unmute, :created_at)",
        named_params! {
            ":name": name,
            ":auto_unmute": auto_unmute,
            ":created_at": Utc::now().to_rfc3339(),
        },
    )
    .map_err(map_db_err)?;

    let id = PlaylistId::from(conn.last_insert_rowid());
    get_playlist(conn, id)?
        .ok_or_else(|| Error::internal(format!("playlist {} vanished after insert", id)))
}

/// Get a playlist by ID.
pub fn get_playlist(conn: &Connection, id: PlaylistId) -> Result<Option<Playlist>> {
    conn.query_row(
        "SELECT id, name, auto_unmute, active, created_at FROM playlists WHERE id = :id",
        named_params! { ":id": id.get() },
        parse_playlist_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Delete a playlist.
///
/// Its items are removed with it and screens showing it are detached.
pub fn delete_playlist(conn: &Connection, id: PlaylistId) -> Result<bool> {
    let deleted = conn
        .execute(
            "DELETE FROM playlists WHERE id = :id",
            named_params! { ":id": id.get() },
        )
        .map_err(map_db_err)?;
    Ok(deleted > 0)
}

/// Append an item to a playlist.
pub fn add_item(
    conn: &Connection,
    playlist_id: PlaylistId,
    asset_id: AssetId,
    sequence: i64,
    duration_override: Option<u32>,
) -> Result<PlaylistItem> {
    conn.execute(
        "INSERT INTO playlist_items (playlist_id, asset_id, sequence, duration_override)
         VALUES (:playlist_id, :asset_id, :sequence, :duration_override)",
        named_params! {
            ":playlist_id": playlist_id.get(),
            ":asset_id": asset_id.get(),
            ":sequence": sequence,
            ":duration_override": duration_override,
        },
    )
    .map_err(map_db_err)?;

    Ok(PlaylistItem {
        id: PlaylistItemId::from(conn.last_insert_rowid()),
        playlist_id,
        asset_id,
        sequence,
        duration_override,
    })
}

/// List the items of a playlist, each joined with its asset.
///
/// Rows come back ordered by `(sequence, id)`.
pub fn list_entries(conn: &Connection, playlist_id: PlaylistId) -> Result<Vec<PlaylistEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT i.id, i.playlist_id, i.asset_id, i.sequence, i.duration_override, {ASSET_COLUMNS}
             FROM playlist_items i
             JOIN assets a ON a.id = i.asset_id
             WHERE i.playlist_id = :playlist_id
             ORDER BY i.sequence, i.id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let entries = stmt
        .query_map(named_params! { ":playlist_id": playlist_id.get() }, |row| {
            Ok(PlaylistEntry {
                item: parse_item_row(row)?,
                asset: parse_asset_row(row, 5)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAsset, NewScreen};
    use crate::pool::init_memory_pool;
    use crate::queries::{assets, screens};
    use signage_common::AssetKind;

    #[test]
    fn test_create_and_get_playlist() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let playlist = create_playlist(&conn, "Lobby", true).unwrap();
        assert_eq!(playlist.name, "Lobby");
        assert!(playlist.auto_unmute);
        assert!(playlist.active);

        let fetched = get_playlist(&conn, playlist.id).unwrap().unwrap();
        assert_eq!(fetched, playlist);
        assert!(get_playlist(&conn, PlaylistId::from(77)).unwrap().is_none());
    }

    #[test]
    fn test_list_entries_orders_by_sequence_then_id() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let playlist = create_playlist(&conn, "Lobby", false).unwrap();
        let a = assets::insert_asset(&conn, &NewAsset::new("A", AssetKind::Image)).unwrap();
        let b = assets::insert_asset(&conn, &NewAsset::new("B", AssetKind::Image)).unwrap();
        let c = assets::insert_asset(&conn, &NewAsset::new("C", AssetKind::Image)).unwrap();

        add_item(&conn, playlist.id, a.id, 20, None).unwrap();
        add_item(&conn, playlist.id, b.id, 10, Some(5)).unwrap();
        add_item(&conn, playlist.id, c.id, 10, None).unwrap();

        let entries = list_entries(&conn, playlist.id).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.asset.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(entries[0].item.duration_override, Some(5));
        assert_eq!(entries[0].asset.id, b.id);
    }

    #[test]
    fn test_negative_durations_rejected_by_schema() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let playlist = create_playlist(&conn, "Lobby", false).unwrap();
        let asset = assets::insert_asset(&conn, &NewAsset::new("A", AssetKind::Webpage)).unwrap();
        add_item(&conn, playlist.id, asset.id, 10, Some(4)).unwrap();

        assert!(conn
            .execute("UPDATE assets SET duration = -5 WHERE id = ?1", [asset.id.get()])
            .is_err());
        assert!(conn
            .execute(
                "UPDATE playlist_items SET duration_override = -1 WHERE playlist_id = ?1",
                [playlist.id.get()],
            )
            .is_err());

        let entries = list_entries(&conn, playlist.id).unwrap();
        assert_eq!(entries[0].item.duration_override, Some(4));
    }

    #[test]
    fn test_add_item_to_missing_asset_fails() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let playlist = create_playlist(&conn, "Lobby", false).unwrap();
        let err = add_item(&conn, playlist.id, AssetId::from(12345), 10, None).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_delete_playlist_cascades_and_detaches_screens() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let playlist = create_playlist(&conn, "Lobby", false).unwrap();
        let asset = assets::insert_asset(&conn, &NewAsset::new("A", AssetKind::Image)).unwrap();
        add_item(&conn, playlist.id, asset.id, 10, None).unwrap();
        let screen =
            screens::create_screen(&conn, &NewScreen::new("TV").with_playlist(playlist.id))
                .unwrap();

        assert!(delete_playlist(&conn, playlist.id).unwrap());

        assert!(list_entries(&conn, playlist.id).unwrap().is_empty());
        let screen = screens::get_screen(&conn, screen.id).unwrap().unwrap();
        assert_eq!(screen.playlist_id, None);
    }
}

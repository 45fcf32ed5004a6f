//! Read-side persistence interfaces used by the resolver and content server.
//!
//! Both components only see these traits; [`SqliteStore`] backs them with the
//! pooled SQLite database.

use signage_common::{AssetId, PlaylistId, Result};
use signage_db::models::{Asset, EncodedPayload, Playlist, PlaylistEntry, Screen};
use signage_db::pool::{get_conn, DbPool};
use signage_db::queries::{assets, playlists, screens};

/// Asset lookup and binary payload access.
pub trait AssetStore: Send + Sync {
    fn get_asset(&self, id: AssetId) -> Result<Option<Asset>>;

    fn asset_exists(&self, id: AssetId) -> Result<bool>;

    /// Encoded payload of an asset; `None` when the asset or its payload is absent.
    fn asset_payload(&self, id: AssetId) -> Result<Option<EncodedPayload>>;
}

/// Screen and playlist lookup.
pub trait PlaylistStore: Send + Sync {
    /// Find an active screen by its public token.
    fn active_screen_by_token(&self, token: &str) -> Result<Option<Screen>>;

    fn playlist(&self, id: PlaylistId) -> Result<Option<Playlist>>;

    /// Items of a playlist joined with their assets, in no particular order.
    fn playlist_entries(&self, id: PlaylistId) -> Result<Vec<PlaylistEntry>>;
}

/// Everything the HTTP layer needs from storage.
pub trait SignageStore: AssetStore + PlaylistStore {}

impl<T: AssetStore + PlaylistStore> SignageStore for T {}

/// Store backed by the SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl AssetStore for SqliteStore {
    fn get_asset(&self, id: AssetId) -> Result<Option<Asset>> {
        let conn = get_conn(&self.pool)?;
        assets::get_asset(&conn, id)
    }

    fn asset_exists(&self, id: AssetId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        assets::asset_exists(&conn, id)
    }

    fn asset_payload(&self, id: AssetId) -> Result<Option<EncodedPayload>> {
        let conn = get_conn(&self.pool)?;
        assets::get_asset_payload(&conn, id)
    }
}

impl PlaylistStore for SqliteStore {
    fn active_screen_by_token(&self, token: &str) -> Result<Option<Screen>> {
        let conn = get_conn(&self.pool)?;
        screens::get_active_screen_by_token(&conn, token)
    }

    fn playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        let conn = get_conn(&self.pool)?;
        playlists::get_playlist(&conn, id)
    }

    fn playlist_entries(&self, id: PlaylistId) -> Result<Vec<PlaylistEntry>> {
        let conn = get_conn(&self.pool)?;
        playlists::list_entries(&conn, id)
    }
}

//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config, an
//! in-memory template renderer and the full [`AppContext`], plus helpers to
//! seed records and issue requests through the router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use signage::config::Config;
use signage::server::{create_router, AppContext};
use signage::store::SqliteStore;
use signage::templates::MemoryTemplateRenderer;
use signage_common::{AssetKind, PlaylistId};
use signage_db::models::{Asset, NewAsset, NewScreen, Playlist, Screen};
use signage_db::pool::{init_memory_pool, DbPool};
use signage_db::queries::{assets, playlists, screens};

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let renderer = MemoryTemplateRenderer::new().with_template(
            "signage.welcome",
            "<h1>Welcome to {playlist.name}</h1><p>{screen.name}</p>",
        );
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: Config, renderer: MemoryTemplateRenderer) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(
            config,
            Arc::new(SqliteStore::new(db.clone())),
            Arc::new(renderer),
        );
        Self { ctx, db }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn insert_asset(&self, asset: NewAsset) -> Asset {
        let conn = self.db.get().unwrap();
        assets::insert_asset(&conn, &asset).unwrap()
    }

    pub fn image(&self, name: &str, data: &[u8], filename: Option<&str>) -> Asset {
        self.insert_asset(NewAsset::new(name, AssetKind::Image).with_payload(data.to_vec(), filename))
    }

    pub fn video(&self, name: &str, data: &[u8], filename: Option<&str>) -> Asset {
        self.insert_asset(NewAsset::new(name, AssetKind::Video).with_payload(data.to_vec(), filename))
    }

    pub fn playlist(&self, name: &str, auto_unmute: bool) -> Playlist {
        let conn = self.db.get().unwrap();
        playlists::create_playlist(&conn, name, auto_unmute).unwrap()
    }

    pub fn add_item(&self, playlist: PlaylistId, asset: &Asset, sequence: i64, duration: Option<u32>) {
        let conn = self.db.get().unwrap();
        playlists::add_item(&conn, playlist, asset.id, sequence, duration).unwrap();
    }

    pub fn screen(&self, screen: NewScreen) -> Screen {
        let conn = self.db.get().unwrap();
        screens::create_screen(&conn, &screen).unwrap()
    }

    /// Issue a GET request through a fresh router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// Issue a GET request with a `Range` header.
    pub async fn get_range(&self, uri: &str, range: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header("Range", range)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Read a response header as a string.
pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Minimal PNG signature padded past the sniffing threshold.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Deterministic fake video payload.
pub fn video_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

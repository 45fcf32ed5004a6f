//! Internal Rust models matching the database schema.
//!
//! This module provides strongly-typed Rust structures that map to database tables.
//! All models use types from signage-common where appropriate.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signage_common::{AssetId, AssetKind, PlaylistId, PlaylistItemId, ScreenId};

/// Signage asset model.
///
/// The binary payload is not part of this struct; it is fetched separately
/// through [`crate::queries::assets::get_asset_payload`] so that building a
/// manifest never loads media bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub kind: AssetKind,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub template_key: Option<String>,
    /// Default display time in seconds.
    pub duration: u32,
    pub cache_content: bool,
    pub active: bool,
    pub has_payload: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create an asset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub kind: AssetKind,
    pub payload: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub template_key: Option<String>,
    pub duration: u32,
    pub cache_content: bool,
}

impl NewAsset {
    /// Start a new asset of the given kind with default settings.
    pub fn new(name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            payload: None,
            filename: None,
            mime_type: None,
            url: None,
            template_key: None,
            duration: 10,
            cache_content: true,
        }
    }

    pub fn with_payload(mut self, payload: Vec<u8>, filename: Option<&str>) -> Self {
        self.payload = Some(payload);
        self.filename = filename.map(str::to_string);
        self
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_template_key(mut self, key: &str) -> Self {
        self.template_key = Some(key.to_string());
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }
}

/// Stored, still-encoded binary payload of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    /// Encode raw bytes into the storage representation.
    pub fn encode(data: &[u8]) -> Self {
        Self(STANDARD.encode(data))
    }

    /// Wrap a value read back from the database.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    /// Decode into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Playlist model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub auto_unmute: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Playlist item model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistItem {
    pub id: PlaylistItemId,
    pub playlist_id: PlaylistId,
    pub asset_id: AssetId,
    pub sequence: i64,
    /// Display time in seconds that supersedes the asset's own duration.
    pub duration_override: Option<u32>,
}

/// A playlist item joined with the asset it references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistEntry {
    pub item: PlaylistItem,
    pub asset: Asset,
}

/// Registered screen model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,
    pub token: String,
    pub playlist_id: Option<PlaylistId>,
    pub preloader_asset_id: Option<AssetId>,
    pub show_fullscreen_button: bool,
    pub cache_slides: bool,
    pub preload_next_slide: bool,
    pub is_public: bool,
    pub active: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to register a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScreen {
    pub name: String,
    /// Explicit token; a random UUID is generated when absent.
    pub token: Option<String>,
    pub playlist_id: Option<PlaylistId>,
    pub preloader_asset_id: Option<AssetId>,
    pub show_fullscreen_button: bool,
    pub cache_slides: bool,
    pub preload_next_slide: bool,
    pub active: bool,
    pub note: Option<String>,
}

impl NewScreen {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: None,
            playlist_id: None,
            preloader_asset_id: None,
            show_fullscreen_button: true,
            cache_slides: false,
            preload_next_slide: false,
            active: true,
            note: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_playlist(mut self, playlist_id: PlaylistId) -> Self {
        self.playlist_id = Some(playlist_id);
        self
    }

    pub fn with_preloader(mut self, asset_id: AssetId) -> Self {
        self.preloader_asset_id = Some(asset_id);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_payload_round_trip() {
        let payload = EncodedPayload::encode(&[0, 1, 2, 250, 255]);
        assert_eq!(payload.decode().unwrap(), vec![0, 1, 2, 250, 255]);
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_encoded_payload_rejects_garbage() {
        let payload = EncodedPayload::from_stored("not base64 at all!".to_string());
        assert!(payload.decode().is_err());
    }

    #[test]
    fn test_encoded_payload_tolerates_trailing_newline() {
        let payload = EncodedPayload::from_stored("aGVsbG8=\n".to_string());
        assert_eq!(payload.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_new_asset_defaults() {
        let asset = NewAsset::new("Welcome", AssetKind::Image);
        assert_eq!(asset.duration, 10);
        assert!(asset.cache_content);
        assert!(asset.payload.is_none());
    }

    #[test]
    fn test_new_screen_defaults() {
        let screen = NewScreen::new("Lobby TV");
        assert!(screen.active);
        assert!(screen.show_fullscreen_button);
        assert!(!screen.cache_slides);
        assert!(screen.token.is_none());
    }
}

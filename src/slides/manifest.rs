//! Serializable manifest handed to the player.

use serde::{Deserialize, Serialize};
use signage_common::{AssetId, AssetKind, PlaylistId};
use signage_db::models::{Playlist, Screen};

/// One entry of the player's rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Seconds on screen.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Whether the client may keep the slide's content in its own cache.
    pub cache: bool,
}

/// Asset shown between slides while the next one loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preloader {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub src: String,
}

/// Metadata envelope accompanying the slides.
///
/// Screen-specific fields are absent when a playlist is played without a
/// screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub title: String,
    pub playlist_id: PlaylistId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_token: Option<String>,
    pub auto_unmute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preloader: Option<Preloader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_fullscreen_button: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_slides: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload_next_slide: Option<bool>,
}

impl PlayerMeta {
    /// Envelope for a playlist played without a screen.
    pub fn for_playlist(playlist_id: PlaylistId, playlist_name: &str, auto_unmute: bool) -> Self {
        Self {
            title: page_title(playlist_name),
            playlist_id,
            screen_token: None,
            auto_unmute,
            preloader: None,
            show_fullscreen_button: None,
            cache_slides: None,
            preload_next_slide: None,
        }
    }

    /// Envelope for a registered screen showing `playlist`.
    pub fn for_screen(playlist: &Playlist, screen: &Screen, preloader: Option<Preloader>) -> Self {
        Self {
            screen_token: Some(screen.token.clone()),
            preloader,
            show_fullscreen_button: Some(screen.show_fullscreen_button),
            cache_slides: Some(screen.cache_slides),
            preload_next_slide: Some(screen.preload_next_slide),
            ..Self::for_playlist(playlist.id, &playlist.name, playlist.auto_unmute)
        }
    }
}

/// Slides plus metadata, the full contract with the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub meta: PlayerMeta,
    pub slides: Vec<Slide>,
}

/// Browser title for a playlist.
pub fn page_title(playlist_name: &str) -> String {
    format!("{playlist_name} — Digital Signage")
}

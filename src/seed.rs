//! Importing assets, playlists and screens from a TOML seed file.
//!
//! Records reference each other through local `key`s rather than database
//! ids. File payloads are read relative to the seed file. Everything is
//! written in one transaction.
//!
//! ```toml
//! [[assets]]
//! key = "logo"
//! name = "Logo"
//! file = "media/logo.png"
//!
//! [[assets]]
//! key = "welcome"
//! name = "Welcome"
//! kind = "qweb"
//! template = "signage.welcome"
//!
//! [[playlists]]
//! key = "lobby"
//! name = "Lobby"
//! items = [
//!     { asset = "logo", sequence = 10, duration = 5 },
//!     { asset = "welcome", sequence = 20 },
//! ]
//!
//! [[screens]]
//! name = "Lobby TV"
//! playlist = "lobby"
//! preloader = "logo"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use signage_common::mime::{detect_mime, kind_for_mime};
use signage_common::{AssetId, AssetKind, PlaylistId};
use signage_db::models::{NewAsset, NewScreen, Screen};
use signage_db::queries::{assets, playlists, screens};

use crate::slides::youtube;

/// Parsed seed file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub assets: Vec<SeedAsset>,
    #[serde(default)]
    pub playlists: Vec<SeedPlaylist>,
    #[serde(default)]
    pub screens: Vec<SeedScreen>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAsset {
    pub key: String,
    pub name: String,
    /// Inferred from the payload, URL or template when omitted.
    pub kind: Option<AssetKind>,
    /// Payload path, relative to the seed file.
    pub file: Option<PathBuf>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub template: Option<String>,
    pub duration: Option<u32>,
    pub cache: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedPlaylist {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub auto_unmute: bool,
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedItem {
    pub asset: String,
    #[serde(default = "default_sequence")]
    pub sequence: i64,
    pub duration: Option<u32>,
}

fn default_sequence() -> i64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedScreen {
    pub name: String,
    pub token: Option<String>,
    pub playlist: Option<String>,
    pub preloader: Option<String>,
    #[serde(default = "default_true")]
    pub show_fullscreen_button: bool,
    #[serde(default)]
    pub cache_slides: bool,
    #[serde(default)]
    pub preload_next_slide: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    pub note: Option<String>,
}

fn default_true() -> bool {
    true
}

/// What an import created.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub assets: usize,
    pub playlists: usize,
    pub items: usize,
    pub screens: Vec<Screen>,
}

/// Read and parse a seed file.
pub fn load_seed(path: &Path) -> Result<SeedFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse seed file: {:?}", path))
}

/// Import a seed file into the database.
pub fn import_file(conn: &mut Connection, path: &Path) -> Result<ImportSummary> {
    let seed = load_seed(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    import_seed(conn, &seed, base)
}

/// Import parsed seed records; payload paths resolve against `base`.
pub fn import_seed(conn: &mut Connection, seed: &SeedFile, base: &Path) -> Result<ImportSummary> {
    let tx = conn.transaction().context("Failed to start import transaction")?;
    let mut summary = ImportSummary::default();

    let mut asset_ids: HashMap<&str, AssetId> = HashMap::new();
    for seed_asset in &seed.assets {
        if asset_ids.contains_key(seed_asset.key.as_str()) {
            bail!("Duplicate asset key '{}'", seed_asset.key);
        }
        let new_asset = build_asset(seed_asset, base)?;
        let asset = assets::insert_asset(&tx, &new_asset)
            .with_context(|| format!("Failed to import asset '{}'", seed_asset.key))?;
        tracing::debug!(key = %seed_asset.key, id = %asset.id, kind = %asset.kind, "Imported asset");
        asset_ids.insert(&seed_asset.key, asset.id);
        summary.assets += 1;
    }

    let lookup_asset = |key: &str| {
        asset_ids
            .get(key)
            .copied()
            .with_context(|| format!("Unknown asset key '{}'", key))
    };

    let mut playlist_ids: HashMap<&str, PlaylistId> = HashMap::new();
    for seed_playlist in &seed.playlists {
        if playlist_ids.contains_key(seed_playlist.key.as_str()) {
            bail!("Duplicate playlist key '{}'", seed_playlist.key);
        }
        let playlist =
            playlists::create_playlist(&tx, &seed_playlist.name, seed_playlist.auto_unmute)
                .with_context(|| format!("Failed to import playlist '{}'", seed_playlist.key))?;

        for item in &seed_playlist.items {
            let asset_id = lookup_asset(&item.asset)?;
            playlists::add_item(&tx, playlist.id, asset_id, item.sequence, item.duration)
                .with_context(|| format!("Failed to add '{}' to '{}'", item.asset, seed_playlist.key))?;
            summary.items += 1;
        }

        playlist_ids.insert(&seed_playlist.key, playlist.id);
        summary.playlists += 1;
    }

    for seed_screen in &seed.screens {
        let mut new_screen = NewScreen::new(seed_screen.name.clone());
        new_screen.token = seed_screen.token.clone();
        new_screen.playlist_id = match &seed_screen.playlist {
            Some(key) => Some(
                playlist_ids
                    .get(key.as_str())
                    .copied()
                    .with_context(|| format!("Unknown playlist key '{}'", key))?,
            ),
            None => None,
        };
        new_screen.preloader_asset_id = seed_screen.preloader.as_deref().map(lookup_asset).transpose()?;
        new_screen.show_fullscreen_button = seed_screen.show_fullscreen_button;
        new_screen.cache_slides = seed_screen.cache_slides;
        new_screen.preload_next_slide = seed_screen.preload_next_slide;
        new_screen.active = seed_screen.active;
        new_screen.note = seed_screen.note.clone();

        let screen = screens::create_screen(&tx, &new_screen)
            .with_context(|| format!("Failed to import screen '{}'", seed_screen.name))?;
        summary.screens.push(screen);
    }

    tx.commit().context("Failed to commit import")?;
    Ok(summary)
}

fn build_asset(seed: &SeedAsset, base: &Path) -> Result<NewAsset> {
    let payload = match &seed.file {
        Some(file) => {
            let path = base.join(file);
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read payload for '{}': {:?}", seed.key, path))?;
            let filename = file.file_name().map(|name| name.to_string_lossy().into_owned());
            Some((data, filename))
        }
        None => None,
    };

    let detected = payload
        .as_ref()
        .and_then(|(data, filename)| detect_mime(data, filename.as_deref(), Some(&seed.name)));

    let kind = match seed.kind {
        Some(kind) => kind,
        None => infer_kind(seed, detected)
            .with_context(|| format!("Cannot infer kind of asset '{}'", seed.key))?,
    };

    let mut asset = NewAsset::new(seed.name.clone(), kind);
    if let Some((data, filename)) = payload {
        asset = asset.with_payload(data, filename.as_deref());
    }
    if let Some(mime) = seed.mime_type.as_deref().or(detected) {
        asset = asset.with_mime_type(mime);
    }
    if let Some(url) = &seed.url {
        asset = asset.with_url(url);
    }
    if let Some(template) = &seed.template {
        asset = asset.with_template_key(template);
    }
    if let Some(duration) = seed.duration {
        asset = asset.with_duration(duration);
    }
    if let Some(cache) = seed.cache {
        asset.cache_content = cache;
    }

    warn_if_incomplete(seed, &asset);
    Ok(asset)
}

fn infer_kind(seed: &SeedAsset, detected: Option<&str>) -> Option<AssetKind> {
    if seed.file.is_some() {
        return detected.and_then(kind_for_mime);
    }
    if let Some(url) = &seed.url {
        return Some(if youtube::video_id(url).is_some() {
            AssetKind::Youtube
        } else {
            AssetKind::Webpage
        });
    }
    seed.template.as_ref().map(|_| AssetKind::Qweb)
}

fn warn_if_incomplete(seed: &SeedAsset, asset: &NewAsset) {
    let missing = if asset.kind.has_payload() && asset.payload.is_none() {
        Some("file")
    } else if asset.kind.is_url_based() && asset.url.is_none() {
        Some("url")
    } else if asset.kind == AssetKind::Qweb && asset.template_key.is_none() {
        Some("template")
    } else {
        None
    };

    if let Some(field) = missing {
        tracing::warn!(key = %seed.key, kind = %asset.kind, "Asset has no {} set", field);
    }
}

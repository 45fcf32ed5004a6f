//! Slide manifest construction.
//!
//! [`SlideResolver`] turns a playlist's items into the ordered slide list the
//! player cycles through. Resolution never fails because of a single slide: a
//! broken template becomes a visible error fragment and a malformed YouTube
//! link is passed through as is.

mod context;
mod manifest;
mod source;
pub mod youtube;

pub use context::ScreenContext;
pub use manifest::{page_title, Manifest, PlayerMeta, Preloader, Slide};
pub use source::{version_tag, SlideSource};

use std::sync::Arc;

use signage_common::{AssetId, Error, PlaylistId, Result};
use signage_db::models::{Asset, Playlist, PlaylistEntry, Screen};
use tracing::Span;

use crate::config::PlayerConfig;
use crate::store::SignageStore;
use crate::templates::{escape_html, TemplateContext, TemplateRenderer};

/// Builds slide manifests for screens and playlists.
#[derive(Clone)]
pub struct SlideResolver {
    renderer: Arc<dyn TemplateRenderer>,
    asset_path: String,
    default_duration: u32,
    span: Span,
}

impl SlideResolver {
    /// Create a resolver.
    ///
    /// `asset_path` is the prefix of the content route, e.g. `/ds/a`.
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        asset_path: impl Into<String>,
        default_duration: u32,
    ) -> Self {
        Self {
            renderer,
            asset_path: asset_path.into(),
            default_duration,
            span: tracing::info_span!("slide_resolver"),
        }
    }

    pub fn from_config(renderer: Arc<dyn TemplateRenderer>, player: &PlayerConfig) -> Self {
        Self::new(renderer, &player.asset_path, player.default_duration_secs)
    }

    /// Log under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Build the manifest for the active screen holding `token`.
    ///
    /// Unknown or inactive tokens and screens without a playlist are
    /// [`Error::NotFound`].
    pub fn for_screen_token(&self, store: &dyn SignageStore, token: &str) -> Result<Manifest> {
        let _enter = self.span.enter();

        let screen = store
            .active_screen_by_token(token)?
            .ok_or_else(|| Error::not_found("screen"))?;
        let playlist_id = screen
            .playlist_id
            .ok_or_else(|| Error::not_found(format!("playlist for screen {}", screen.id)))?;
        let playlist = store
            .playlist(playlist_id)?
            .ok_or_else(|| Error::not_found(format!("playlist {}", playlist_id)))?;

        let entries = store.playlist_entries(playlist.id)?;
        let context = ScreenContext::from(&screen);
        let slides = self.resolve_slides(&playlist, entries, &context);
        let preloader = self.preloader(store, &screen)?;

        tracing::debug!(
            screen_id = %screen.id,
            playlist_id = %playlist.id,
            slides = slides.len(),
            "Resolved screen manifest"
        );

        Ok(Manifest {
            meta: PlayerMeta::for_screen(&playlist, &screen, preloader),
            slides,
        })
    }

    /// Build the manifest for a playlist played without a screen.
    pub fn for_playlist(&self, store: &dyn SignageStore, id: PlaylistId) -> Result<Manifest> {
        let _enter = self.span.enter();

        let playlist = store
            .playlist(id)?
            .ok_or_else(|| Error::not_found(format!("playlist {}", id)))?;

        let entries = store.playlist_entries(playlist.id)?;
        let context = ScreenContext::anonymous(playlist.id);
        let slides = self.resolve_slides(&playlist, entries, &context);

        tracing::debug!(playlist_id = %playlist.id, slides = slides.len(), "Resolved playlist manifest");

        Ok(Manifest {
            meta: PlayerMeta::for_playlist(playlist.id, &playlist.name, playlist.auto_unmute),
            slides,
        })
    }

    /// Order entries by `(sequence, item id)` and resolve each into a slide.
    ///
    /// Content URLs carry a cache-buster only for registered screens.
    pub fn resolve_slides(
        &self,
        playlist: &Playlist,
        mut entries: Vec<PlaylistEntry>,
        screen: &ScreenContext,
    ) -> Vec<Slide> {
        entries.sort_by_key(|entry| (entry.item.sequence, entry.item.id));

        entries
            .iter()
            .map(|entry| self.resolve_entry(entry, playlist, screen))
            .collect()
    }

    fn resolve_entry(&self, entry: &PlaylistEntry, playlist: &Playlist, screen: &ScreenContext) -> Slide {
        let asset = &entry.asset;
        let mut slide = Slide {
            id: asset.id,
            name: asset.name.clone(),
            kind: asset.kind,
            duration: self.effective_duration(entry),
            src: None,
            html: None,
            cache: asset.cache_content,
        };

        match SlideSource::from_asset(asset) {
            SlideSource::Image { id, version } | SlideSource::Video { id, version } => {
                let version = screen.is_registered().then(|| version_tag(&version));
                slide.src = Some(self.content_url(id, version.as_deref()));
            }
            SlideSource::VideoUrl { url }
            | SlideSource::Webpage { url }
            | SlideSource::Calendar { url } => {
                slide.src = url.map(str::to_string);
            }
            SlideSource::Youtube { url } => {
                slide.src = Some(youtube::embed_url(url.unwrap_or_default()));
            }
            SlideSource::Qweb { template_key } => {
                slide.html = Some(match template_key.filter(|key| !key.is_empty()) {
                    Some(key) => self.render_template(key, asset, playlist, screen),
                    None => String::new(),
                });
            }
        }

        slide
    }

    /// Item override, then asset duration, then the configured default.
    fn effective_duration(&self, entry: &PlaylistEntry) -> u32 {
        entry
            .item
            .duration_override
            .filter(|secs| *secs > 0)
            .or_else(|| Some(entry.asset.duration).filter(|secs| *secs > 0))
            .unwrap_or(self.default_duration)
    }

    /// URL of an asset's binary content, optionally cache-busted.
    pub fn content_url(&self, id: AssetId, version: Option<&str>) -> String {
        match version {
            Some(version) => format!("{}/{}/content?v={}", self.asset_path, id, version),
            None => format!("{}/{}/content", self.asset_path, id),
        }
    }

    fn render_template(
        &self,
        key: &str,
        asset: &Asset,
        playlist: &Playlist,
        screen: &ScreenContext,
    ) -> String {
        let ctx = TemplateContext::new()
            .with_var("asset.id", &asset.id.to_string())
            .with_var("asset.name", &asset.name)
            .with_var("asset.url", asset.url.as_deref().unwrap_or_default())
            .with_var("asset.duration", &asset.duration.to_string())
            .with_var("playlist.id", &playlist.id.to_string())
            .with_var("playlist.name", &playlist.name)
            .with_var("screen.name", &screen.name())
            .with_var("screen.token", screen.token());

        match self.renderer.render(key, &ctx) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(asset_id = %asset.id, key, error = %e, "Failed to render slide template");
                error_fragment(key)
            }
        }
    }

    /// Preloader of a screen, if it points at an image or video with content.
    fn preloader(&self, store: &dyn SignageStore, screen: &Screen) -> Result<Option<Preloader>> {
        let Some(asset_id) = screen.preloader_asset_id else {
            return Ok(None);
        };
        let Some(asset) = store.get_asset(asset_id)? else {
            return Ok(None);
        };

        let preloader = match SlideSource::from_asset(&asset) {
            SlideSource::Image { id, version } | SlideSource::Video { id, version }
                if asset.has_payload =>
            {
                Some(Preloader {
                    kind: asset.kind,
                    src: self.content_url(id, Some(&version_tag(&version))),
                })
            }
            _ => None,
        };
        Ok(preloader)
    }
}

/// Inline markup shown in place of a slide whose template failed.
pub fn error_fragment(key: &str) -> String {
    format!(
        "<div class=\"ds-error\">QWeb template '{}' not found</div>",
        escape_html(key)
    )
}

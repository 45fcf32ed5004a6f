//! The HTML page that boots the client-side player.

use super::TemplateContext;
use crate::config::PlayerConfig;
use crate::slides::Manifest;

const PLAYER_TEMPLATE: &str = include_str!("player.html");

/// Values embedded into the player page.
#[derive(Debug, Clone)]
pub struct PlayerPage<'a> {
    pub manifest: &'a Manifest,
    pub script: &'a str,
    pub stylesheet: &'a str,
}

impl<'a> PlayerPage<'a> {
    pub fn new(manifest: &'a Manifest, player: &'a PlayerConfig) -> Self {
        Self {
            manifest,
            script: &player.player_script,
            stylesheet: &player.player_stylesheet,
        }
    }

    /// Render the page, embedding slides and metadata as JSON script blocks.
    pub fn render(&self) -> serde_json::Result<String> {
        let slides_json = script_json(&self.manifest.slides)?;
        let meta_json = script_json(&self.manifest.meta)?;

        let ctx = TemplateContext::new()
            .with_var("title", &self.manifest.meta.title)
            .with_var("stylesheet", self.stylesheet)
            .with_var("script", self.script)
            .with_raw("slides_json", &slides_json)
            .with_raw("meta_json", &meta_json);

        Ok(ctx.substitute(PLAYER_TEMPLATE))
    }
}

/// Render the player page for a manifest.
pub fn render_player_page(manifest: &Manifest, player: &PlayerConfig) -> serde_json::Result<String> {
    PlayerPage::new(manifest, player).render()
}

/// Serialize to JSON that is safe inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

//! Public player routes.
//!
//! Each player entry point comes in two shapes: the HTML page that boots the
//! client player, and a `/manifest` JSON view of the same data.

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Json, Router,
};
use signage_common::{Error, PlaylistId};

use super::{AppContext, AppError};
use crate::slides::Manifest;
use crate::templates::render_player_page;

/// Create player routes under the configured prefixes.
pub fn player_routes(ctx: &AppContext) -> Router<AppContext> {
    let player = &ctx.config.player;
    Router::new()
        .route(&format!("{}/:token", player.screen_path), get(screen_page))
        .route(
            &format!("{}/:token/manifest", player.screen_path),
            get(screen_manifest),
        )
        .route(
            &format!("{}/:playlist_id", player.playlist_path),
            get(playlist_page),
        )
        .route(
            &format!("{}/:playlist_id/manifest", player.playlist_path),
            get(playlist_manifest),
        )
}

async fn screen_page(
    State(ctx): State<AppContext>,
    Path(token): Path<String>,
) -> Result<Html<String>, AppError> {
    let manifest = resolve_screen(&ctx, token).await?;
    render_page(&ctx, &manifest)
}

async fn screen_manifest(
    State(ctx): State<AppContext>,
    Path(token): Path<String>,
) -> Result<Json<Manifest>, AppError> {
    resolve_screen(&ctx, token).await.map(Json)
}

async fn playlist_page(
    State(ctx): State<AppContext>,
    Path(playlist_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let manifest = resolve_playlist(&ctx, &playlist_id).await?;
    render_page(&ctx, &manifest)
}

async fn playlist_manifest(
    State(ctx): State<AppContext>,
    Path(playlist_id): Path<String>,
) -> Result<Json<Manifest>, AppError> {
    resolve_playlist(&ctx, &playlist_id).await.map(Json)
}

async fn resolve_screen(ctx: &AppContext, token: String) -> Result<Manifest, AppError> {
    let store = ctx.store.clone();
    let resolver = ctx.resolver.clone();
    let manifest =
        tokio::task::spawn_blocking(move || resolver.for_screen_token(&*store, &token))
            .await??;
    Ok(manifest)
}

async fn resolve_playlist(ctx: &AppContext, raw_id: &str) -> Result<Manifest, AppError> {
    // Non-numeric ids cannot name a playlist.
    let id: PlaylistId = raw_id.parse().map_err(|_| AppError::not_found())?;

    let store = ctx.store.clone();
    let resolver = ctx.resolver.clone();
    let manifest =
        tokio::task::spawn_blocking(move || resolver.for_playlist(&*store, id)).await??;
    Ok(manifest)
}

fn render_page(ctx: &AppContext, manifest: &Manifest) -> Result<Html<String>, AppError> {
    let page = render_player_page(manifest, &ctx.config.player)
        .map_err(|e| Error::internal(format!("failed to serialize manifest: {}", e)))?;
    Ok(Html(page))
}

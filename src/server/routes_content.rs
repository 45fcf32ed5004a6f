//! Asset content route.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    routing::get,
    Router,
};
use signage_common::AssetId;

use super::{AppContext, AppError};
use crate::content::AssetResponse;

/// Create the content route under the configured asset prefix.
///
/// The `v` query parameter on content URLs only varies the URL for caches
/// and is not read.
pub fn content_routes(ctx: &AppContext) -> Router<AppContext> {
    Router::new().route(
        &format!("{}/:asset_id/content", ctx.config.player.asset_path),
        get(asset_content),
    )
}

async fn asset_content(
    State(ctx): State<AppContext>,
    Path(asset_id): Path<String>,
    headers: HeaderMap,
) -> Result<AssetResponse, AppError> {
    let id: AssetId = asset_id.parse().map_err(|_| AppError::not_found())?;
    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let store = ctx.store.clone();
    let content = ctx.content.clone();
    let response =
        tokio::task::spawn_blocking(move || content.serve(&*store, id, range.as_deref()))
            .await??;
    Ok(response)
}

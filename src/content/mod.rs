//! Asset content delivery.
//!
//! Serves an asset's decoded payload with a resolved MIME type. Video content
//! honours single `Range` requests with `206 Partial Content`; any range that
//! cannot be satisfied falls back to the full body.

pub mod mime;
pub mod range;

pub use mime::resolve_mime;
pub use range::{parse_range, ByteRange};

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use signage_common::mime::{is_video, OCTET_STREAM};
use signage_common::{AssetId, Error, Result};
use tracing::Span;

use crate::config::PlayerConfig;
use crate::store::AssetStore;

const EXPOSE_FULL: &str = "Content-Type, Content-Length";
const EXPOSE_PARTIAL: &str = "Content-Type, Content-Length, Accept-Ranges, Content-Range";

/// A fully built content response.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Serves asset payloads from an [`AssetStore`].
#[derive(Debug, Clone)]
pub struct AssetContentServer {
    cache_max_age: u32,
    span: Span,
}

impl AssetContentServer {
    pub fn new(cache_max_age: u32) -> Self {
        Self {
            cache_max_age,
            span: tracing::info_span!("asset_content"),
        }
    }

    pub fn from_config(player: &PlayerConfig) -> Self {
        Self::new(player.cache_max_age_secs)
    }

    /// Log under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Build the response for an asset's content.
    ///
    /// Missing assets, assets without a payload and payloads that fail to
    /// decode are all [`Error::NotFound`].
    pub fn serve<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        id: AssetId,
        range_header: Option<&str>,
    ) -> Result<AssetResponse> {
        let _enter = self.span.enter();

        let asset = store.get_asset(id)?.ok_or_else(|| {
            tracing::debug!(asset_id = %id, "Asset not found");
            Error::not_found(format!("asset {}", id))
        })?;
        let payload = store.asset_payload(id)?.ok_or_else(|| {
            tracing::debug!(asset_id = %id, "Asset has no content");
            Error::not_found(format!("content of asset {}", id))
        })?;
        let data = payload.decode().map_err(|e| {
            tracing::warn!(asset_id = %id, error = %e, "Failed to decode asset content");
            Error::not_found(format!("content of asset {}", id))
        })?;
        drop(payload);

        let hint = asset.filename.as_deref().unwrap_or(&asset.name);
        let mime = resolve_mime(asset.kind, asset.mime_type.as_deref(), hint, &data);
        let total = data.len() as u64;
        let video = is_video(&mime);

        tracing::debug!(
            asset_id = %id,
            kind = %asset.kind,
            mime = %mime,
            bytes = total,
            "Serving asset content"
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&mime).unwrap_or(HeaderValue::from_static(OCTET_STREAM)),
        );
        headers.insert(
            header::CACHE_CONTROL,
            header_value(&format!("public, max-age={}", self.cache_max_age))?,
        );
        headers.insert(
            header::CONTENT_DISPOSITION,
            header_value(&content_disposition(asset.filename.as_deref(), id))?,
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        );
        if video {
            headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        }

        let body = Bytes::from(data);

        if let Some(raw) = range_header.filter(|_| video) {
            match parse_range(raw, total) {
                Some(range) => {
                    tracing::debug!(asset_id = %id, start = range.start, end = range.end, "Serving byte range");
                    headers.insert(header::CONTENT_RANGE, header_value(&range.content_range(total))?);
                    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.len()));
                    headers.insert(
                        header::ACCESS_CONTROL_EXPOSE_HEADERS,
                        HeaderValue::from_static(EXPOSE_PARTIAL),
                    );
                    return Ok(AssetResponse {
                        status: StatusCode::PARTIAL_CONTENT,
                        headers,
                        body: body.slice(range.start as usize..=range.end as usize),
                    });
                }
                None => {
                    tracing::debug!(asset_id = %id, range = raw, total, "Ignoring unsatisfiable range");
                }
            }
        }

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(total));
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSE_FULL),
        );
        Ok(AssetResponse {
            status: StatusCode::OK,
            headers,
            body,
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::internal(format!("invalid header value: {}", e)))
}

/// Inline `Content-Disposition` naming the asset's file, or `asset_<id>`.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
pub fn content_disposition(filename: Option<&str>, id: AssetId) -> String {
    let name = match filename.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("asset_{}", id),
    };

    let fallback: String = name
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();

    if name.is_ascii() && fallback == name {
        format!("inline; filename=\"{}\"", name)
    } else {
        format!(
            "inline; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            percent_encode(&name)
        )
    }
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use signage_common::AssetKind;
    use signage_db::models::NewAsset;
    use signage_db::pool::init_memory_pool;
    use signage_db::queries::assets;

    fn video_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn store_with(asset: NewAsset) -> (SqliteStore, AssetId) {
        let store = SqliteStore::new(init_memory_pool().unwrap());
        let conn = store.pool().get().unwrap();
        let id = assets::insert_asset(&conn, &asset).unwrap().id;
        (store, id)
    }

    fn header_str<'a>(response: &'a AssetResponse, name: header::HeaderName) -> Option<&'a str> {
        response.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_full_video_response_advertises_ranges() {
        let (store, id) = store_with(
            NewAsset::new("clip", AssetKind::Video).with_payload(video_bytes(100), Some("clip.mp4")),
        );
        let response = AssetContentServer::new(3600).serve(&store, id, None).unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.len(), 100);
        assert_eq!(response.content_type(), Some("video/mp4"));
        assert_eq!(header_str(&response, header::CONTENT_LENGTH), Some("100"));
        assert_eq!(header_str(&response, header::ACCEPT_RANGES), Some("bytes"));
        assert_eq!(header_str(&response, header::CACHE_CONTROL), Some("public, max-age=3600"));
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            Some("inline; filename=\"clip.mp4\"")
        );
        assert_eq!(header_str(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert_eq!(
            header_str(&response, header::ACCESS_CONTROL_EXPOSE_HEADERS),
            Some(EXPOSE_FULL)
        );
    }

    #[test]
    fn test_range_request_returns_slice() {
        let data = video_bytes(100);
        let (store, id) = store_with(
            NewAsset::new("clip", AssetKind::Video).with_payload(data.clone(), Some("clip.webm")),
        );
        let server = AssetContentServer::new(60);

        let response = server.serve(&store, id, Some("bytes=10-19")).unwrap();
        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.body.as_ref(), &data[10..20]);
        assert_eq!(header_str(&response, header::CONTENT_RANGE), Some("bytes 10-19/100"));
        assert_eq!(header_str(&response, header::CONTENT_LENGTH), Some("10"));
        assert_eq!(header_str(&response, header::CACHE_CONTROL), Some("public, max-age=60"));
        assert_eq!(
            header_str(&response, header::ACCESS_CONTROL_EXPOSE_HEADERS),
            Some(EXPOSE_PARTIAL)
        );

        let response = server.serve(&store, id, Some("bytes=0-")).unwrap();
        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(header_str(&response, header::CONTENT_RANGE), Some("bytes 0-99/100"));
        assert_eq!(response.body.len(), 100);

        let response = server.serve(&store, id, Some("bytes=-500")).unwrap();
        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(header_str(&response, header::CONTENT_RANGE), Some("bytes 0-99/100"));
    }

    #[test]
    fn test_bad_range_falls_back_to_full_content() {
        let (store, id) = store_with(
            NewAsset::new("clip", AssetKind::Video).with_payload(video_bytes(100), Some("clip.mp4")),
        );
        let server = AssetContentServer::new(3600);

        for range in ["bytes=100-", "bytes=50-10", "items=0-1", "bytes=0-1,4-5"] {
            let response = server.serve(&store, id, Some(range)).unwrap();
            assert_eq!(response.status, StatusCode::OK, "{range}");
            assert_eq!(response.body.len(), 100);
            assert!(response.headers.get(header::CONTENT_RANGE).is_none());
        }
    }

    #[test]
    fn test_images_ignore_ranges() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        let (store, id) = store_with(NewAsset::new("logo", AssetKind::Image).with_payload(png, None));
        let response = AssetContentServer::new(3600)
            .serve(&store, id, Some("bytes=0-3"))
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type(), Some("image/png"));
        assert!(response.headers.get(header::ACCEPT_RANGES).is_none());
        assert_eq!(
            header_str(&response, header::CONTENT_DISPOSITION),
            Some(format!("inline; filename=\"asset_{}\"", id).as_str())
        );
    }

    #[test]
    fn test_missing_content_is_not_found() {
        let (store, id) = store_with(NewAsset::new("page", AssetKind::Webpage).with_url("https://example.com"));
        let server = AssetContentServer::new(3600);

        assert!(server.serve(&store, id, None).unwrap_err().is_not_found());
        assert!(server
            .serve(&store, AssetId::from(999), None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_undecodable_payload_is_not_found() {
        let (store, id) = store_with(NewAsset::new("clip", AssetKind::Video));
        let conn = store.pool().get().unwrap();
        conn.execute(
            "UPDATE assets SET payload = '%%% not base64' WHERE id = ?1",
            [id.get()],
        )
        .unwrap();

        let err = AssetContentServer::new(3600).serve(&store, id, None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_content_disposition() {
        let id = AssetId::from(3);
        assert_eq!(content_disposition(Some("a.mp4"), id), "inline; filename=\"a.mp4\"");
        assert_eq!(content_disposition(None, id), "inline; filename=\"asset_3\"");
        assert_eq!(content_disposition(Some("  "), id), "inline; filename=\"asset_3\"");
        assert_eq!(
            content_disposition(Some("say \"hi\".png"), id),
            "inline; filename=\"say _hi_.png\"; filename*=UTF-8''say%20%22hi%22.png"
        );
        assert_eq!(
            content_disposition(Some("café.jpg"), id),
            "inline; filename=\"caf_.jpg\"; filename*=UTF-8''caf%C3%A9.jpg"
        );
    }
}

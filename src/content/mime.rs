//! MIME resolution for served asset content.

use signage_common::mime::{mime_from_filename, sniff_image, OCTET_STREAM};
use signage_common::AssetKind;

/// Pick the `Content-Type` for an asset payload.
///
/// In order:
/// 1. the stored MIME, when it matches the kind's category (`image/*` for
///    images, `video/*` for videos);
/// 2. the serving extension table applied to `filename`;
/// 3. for other kinds, the stored MIME as is, else `application/octet-stream`;
/// 4. for images still not `image/*`, the payload's image signature;
/// 5. for images and videos, the category default (`image/jpeg`, `video/mp4`).
pub fn resolve_mime(kind: AssetKind, stored: Option<&str>, filename: &str, data: &[u8]) -> String {
    let stored = stored
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| !mime.is_empty());
    let from_extension = mime_from_filename(filename);

    let Some(category) = kind.mime_category() else {
        return stored
            .or_else(|| from_extension.map(str::to_string))
            .unwrap_or_else(|| OCTET_STREAM.to_string());
    };

    if let Some(stored) = stored.filter(|mime| mime.starts_with(category)) {
        return stored;
    }

    let resolved = from_extension;
    if kind == AssetKind::Image && !resolved.is_some_and(|mime| mime.starts_with(category)) {
        if let Some(sniffed) = sniff_image(data) {
            tracing::debug!(sniffed, "Using image signature for MIME type");
            return sniffed.to_string();
        }
    }

    resolved
        .unwrap_or_else(|| category_default(kind))
        .to_string()
}

fn category_default(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Image => "image/jpeg",
        AssetKind::Video => "video/mp4",
        _ => OCTET_STREAM,
    }
}

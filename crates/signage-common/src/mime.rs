//! MIME type detection by file extension and by content signature.
//!
//! Two extension tables exist: the fixed serving table used when answering
//! content requests, and a wider upload table used to pre-fill the stored MIME
//! of newly imported assets. Signature sniffing looks at the first bytes of a
//! payload and needs at least [`SNIFF_MIN_LEN`] bytes to say anything.

use crate::AssetKind;

/// Fallback MIME for payloads nothing else could classify.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Minimum payload length before signatures are inspected.
pub const SNIFF_MIN_LEN: usize = 12;

/// Extension table consulted when serving content.
const SERVING_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
];

/// Additional extensions recognised when importing assets.
const UPLOAD_EXTENSIONS: &[(&str, &str)] = &[
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("pdf", "application/pdf"),
];

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() && !filename.starts_with('.') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn lookup(table: &[(&str, &'static str)], ext: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
}

/// Look up a MIME type in the serving extension table.
///
/// # Examples
///
/// ```
/// use signage_common::mime::mime_from_filename;
///
/// assert_eq!(mime_from_filename("poster.JPG"), Some("image/jpeg"));
/// assert_eq!(mime_from_filename("clip.m4v"), Some("video/mp4"));
/// assert_eq!(mime_from_filename("notes.txt"), None);
/// ```
pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let ext = extension_of(filename)?;
    lookup(SERVING_EXTENSIONS, &ext)
}

/// Look up a MIME type in the serving table, then the wider upload table.
pub fn guess_mime_from_filename(filename: &str) -> Option<&'static str> {
    let ext = extension_of(filename)?;
    lookup(SERVING_EXTENSIONS, &ext).or_else(|| lookup(UPLOAD_EXTENSIONS, &ext))
}

/// Identify an image payload from its leading bytes.
///
/// Recognises JPEG, PNG, GIF (87a and 89a) and WebP.
pub fn sniff_image(data: &[u8]) -> Option<&'static str> {
    if data.len() < SNIFF_MIN_LEN {
        return None;
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(PNG_MAGIC) {
        return Some("image/png");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// Identify an image or video payload from its leading bytes.
pub fn sniff_media(data: &[u8]) -> Option<&'static str> {
    if let Some(mime) = sniff_image(data) {
        return Some(mime);
    }
    if data.len() < SNIFF_MIN_LEN {
        return None;
    }
    if &data[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    let head = &data[..data.len().min(32)];
    if contains(head, b"moov") || contains(head, b"mdat") {
        return Some("video/quicktime");
    }
    None
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Best-effort MIME for a newly imported payload.
///
/// Content signatures win, then the original filename, then the asset name.
pub fn detect_mime(data: &[u8], filename: Option<&str>, name: Option<&str>) -> Option<&'static str> {
    sniff_media(data)
        .or_else(|| filename.and_then(guess_mime_from_filename))
        .or_else(|| name.and_then(guess_mime_from_filename))
}

/// Whether a MIME string is in the `image/*` family.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether a MIME string is in the `video/*` family.
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}

/// Asset kind implied by a payload MIME, if it is an image or a video.
pub fn kind_for_mime(mime: &str) -> Option<AssetKind> {
    if is_image(mime) {
        Some(AssetKind::Image)
    } else if is_video(mime) {
        Some(AssetKind::Video)
    } else {
        None
    }
}

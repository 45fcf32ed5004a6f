//! YouTube link normalization.

use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const EMBED_PARAMS: &str = "autoplay=1&mute=1&controls=0&rel=0";

/// Turn a YouTube link into an autoplaying, muted embed URL.
///
/// Accepts `youtu.be/<id>`, `youtube.com/watch?v=<id>` and
/// `youtube.com/embed/<id>` links. Anything else is returned unchanged.
///
/// # Example
///
/// ```
/// use signage::slides::youtube::embed_url;
///
/// assert_eq!(
///     embed_url("https://youtu.be/dQw4w9WgXcQ"),
///     "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&mute=1&controls=0&rel=0"
/// );
/// assert_eq!(embed_url("not a link"), "not a link");
/// ```
pub fn embed_url(raw: &str) -> String {
    match video_id(raw) {
        Some(id) => format!("{EMBED_BASE}{id}?{EMBED_PARAMS}"),
        None => raw.to_string(),
    }
}

/// Extract the video id from a YouTube link.
pub fn video_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Links are often pasted without a scheme.
    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let id = if is_host(&host, "youtu.be") {
        url.path_segments()?.next().map(str::to_string)
    } else if is_host(&host, "youtube.com") {
        let mut segments = url.path_segments()?;
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    id.filter(|id| is_valid_id(id))
}

fn is_host(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Ids are spliced into the embed URL unescaped, so only the YouTube alphabet is accepted.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str =
        "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&mute=1&controls=0&rel=0";

    #[test]
    fn test_all_link_shapes_agree() {
        assert_eq!(embed_url("https://youtu.be/dQw4w9WgXcQ"), EXPECTED);
        assert_eq!(embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), EXPECTED);
        assert_eq!(embed_url("https://www.youtube.com/embed/dQw4w9WgXcQ"), EXPECTED);
    }

    #[test]
    fn test_embed_normalization_is_idempotent() {
        assert_eq!(embed_url(EXPECTED), EXPECTED);
        assert_eq!(embed_url(&embed_url(EXPECTED)), EXPECTED);
    }

    #[test]
    fn test_variants() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42"),
            EXPECTED
        );
        assert_eq!(embed_url("http://m.youtube.com/watch?v=dQw4w9WgXcQ"), EXPECTED);
        assert_eq!(embed_url("https://YOUTU.BE/dQw4w9WgXcQ?si=abc"), EXPECTED);
        assert_eq!(embed_url("youtu.be/dQw4w9WgXcQ"), EXPECTED);
        assert_eq!(embed_url("  https://youtube.com/embed/dQw4w9WgXcQ/  "), EXPECTED);
    }

    #[test]
    fn test_unparseable_links_pass_through() {
        for raw in [
            "",
            "not a link",
            "https://vimeo.com/12345",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/channel/UC123",
            "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/",
            "https://youtu.be/bad%20id",
        ] {
            assert_eq!(embed_url(raw), raw, "{raw:?} should pass through");
        }
    }

    #[test]
    fn test_ids_outside_youtube_alphabet_pass_through() {
        for raw in [
            "https://youtu.be/abc.def",
            "https://youtu.be/abc\"onload=x",
            "https://www.youtube.com/watch?v=abc%26autoplay%3D0",
            "https://www.youtube.com/embed/abc+def",
        ] {
            assert_eq!(embed_url(raw), raw, "{raw:?} should pass through");
        }
    }
}

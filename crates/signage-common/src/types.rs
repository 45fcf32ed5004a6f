//! Core type definitions for signage content.
//!
//! All enums are serialized in snake_case so the values written to the
//! database and to the player manifest are identical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of signage asset.
///
/// Each kind has exactly one authoritative content representation: a binary
/// payload (`Image`, `Video`), a URL (`VideoUrl`, `Youtube`, `Webpage`,
/// `Calendar`) or a template key (`Qweb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Uploaded image.
    Image,
    /// Uploaded video.
    Video,
    /// Externally hosted video file.
    VideoUrl,
    /// YouTube video, played through the embed player.
    Youtube,
    /// Arbitrary web page shown in a frame.
    Webpage,
    /// Calendar feed URL shown in a frame.
    Calendar,
    /// Server-rendered template.
    Qweb,
}

impl AssetKind {
    /// All kinds, in declaration order.
    pub const ALL: [AssetKind; 7] = [
        Self::Image,
        Self::Video,
        Self::VideoUrl,
        Self::Youtube,
        Self::Webpage,
        Self::Calendar,
        Self::Qweb,
    ];

    /// Whether the content of this kind lives in the binary payload.
    pub fn has_payload(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }

    /// Whether the content of this kind is an external URL.
    pub fn is_url_based(self) -> bool {
        matches!(
            self,
            Self::VideoUrl | Self::Youtube | Self::Webpage | Self::Calendar
        )
    }

    /// MIME top-level category a payload of this kind must belong to.
    pub fn mime_category(self) -> Option<&'static str> {
        match self {
            Self::Image => Some("image/"),
            Self::Video => Some("video/"),
            _ => None,
        }
    }

    /// Stable lowercase name, as stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::VideoUrl => "video_url",
            Self::Youtube => "youtube",
            Self::Webpage => "webpage",
            Self::Calendar => "calendar",
            Self::Qweb => "qweb",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Invalid asset kind: {}", s))
    }
}

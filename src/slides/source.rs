use chrono::{DateTime, Utc};
use signage_common::{AssetId, AssetKind};
use signage_db::models::Asset;

/// Where a slide's content comes from, one variant per asset kind.
///
/// Each variant carries only the fields its kind is resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideSource<'a> {
    Image { id: AssetId, version: DateTime<Utc> },
    Video { id: AssetId, version: DateTime<Utc> },
    VideoUrl { url: Option<&'a str> },
    Youtube { url: Option<&'a str> },
    Webpage { url: Option<&'a str> },
    Calendar { url: Option<&'a str> },
    Qweb { template_key: Option<&'a str> },
}

impl<'a> SlideSource<'a> {
    pub fn from_asset(asset: &'a Asset) -> Self {
        let url = asset.url.as_deref();
        match asset.kind {
            AssetKind::Image => Self::Image {
                id: asset.id,
                version: asset.updated_at,
            },
            AssetKind::Video => Self::Video {
                id: asset.id,
                version: asset.updated_at,
            },
            AssetKind::VideoUrl => Self::VideoUrl { url },
            AssetKind::Youtube => Self::Youtube { url },
            AssetKind::Webpage => Self::Webpage { url },
            AssetKind::Calendar => Self::Calendar { url },
            AssetKind::Qweb => Self::Qweb {
                template_key: asset.template_key.as_deref(),
            },
        }
    }
}

/// Compact, sortable cache-buster for a modification time.
pub fn version_tag(version: &DateTime<Utc>) -> String {
    version.format("%Y%m%d%H%M%S").to_string()
}

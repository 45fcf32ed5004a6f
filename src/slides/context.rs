use signage_common::{PlaylistId, ScreenId};
use signage_db::models::Screen;

/// The screen a manifest is being built for.
///
/// Playlists opened directly, without a registered screen, get an anonymous
/// context so templates always see the same variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenContext {
    Screen {
        id: ScreenId,
        name: String,
        token: String,
    },
    Anonymous {
        playlist_id: PlaylistId,
    },
}

impl ScreenContext {
    pub fn anonymous(playlist_id: PlaylistId) -> Self {
        Self::Anonymous { playlist_id }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Screen { name, .. } => name.clone(),
            Self::Anonymous { playlist_id } => format!("Playlist #{playlist_id}"),
        }
    }

    /// Public token; empty for anonymous playback.
    pub fn token(&self) -> &str {
        match self {
            Self::Screen { token, .. } => token,
            Self::Anonymous { .. } => "",
        }
    }

    /// Registered screens get cache-busted content URLs.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Screen { .. })
    }
}

impl From<&Screen> for ScreenContext {
    fn from(screen: &Screen) -> Self {
        Self::Screen {
            id: screen.id,
            name: screen.name.clone(),
            token: screen.token.clone(),
        }
    }
}

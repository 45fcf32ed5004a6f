use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file (relative paths resolve against the config file)
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory served as a fallback, typically the player script and stylesheet
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_database() -> PathBuf {
    PathBuf::from("signage.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            static_dir: None,
        }
    }
}

/// Public player routes and slide defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Prefix of the screen player route (`<screen_path>/<token>`)
    #[serde(default = "default_screen_path")]
    pub screen_path: String,

    /// Prefix of the token-less playlist player route (`<playlist_path>/<id>`)
    #[serde(default = "default_playlist_path")]
    pub playlist_path: String,

    /// Prefix of the asset content route (`<asset_path>/<id>/content`)
    #[serde(default = "default_asset_path")]
    pub asset_path: String,

    /// Seconds a slide is shown when neither item nor asset set a duration
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u32,

    /// `max-age` advertised on asset content responses
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u32,

    /// Script URL referenced by the player page
    #[serde(default = "default_player_script")]
    pub player_script: String,

    /// Stylesheet URL referenced by the player page
    #[serde(default = "default_player_stylesheet")]
    pub player_stylesheet: String,
}

fn default_screen_path() -> String {
    "/ds/s".to_string()
}
fn default_playlist_path() -> String {
    "/ds/p".to_string()
}
fn default_asset_path() -> String {
    "/ds/a".to_string()
}
fn default_duration_secs() -> u32 {
    10
}
fn default_cache_max_age_secs() -> u32 {
    3600
}
fn default_player_script() -> String {
    "/static/player.js".to_string()
}
fn default_player_stylesheet() -> String {
    "/static/player.css".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            screen_path: default_screen_path(),
            playlist_path: default_playlist_path(),
            asset_path: default_asset_path(),
            default_duration_secs: default_duration_secs(),
            cache_max_age_secs: default_cache_max_age_secs(),
            player_script: default_player_script(),
            player_stylesheet: default_player_stylesheet(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TemplatesConfig {
    /// Directory holding `<key>.html` slide templates
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

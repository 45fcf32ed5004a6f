mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(base) = path.parent() {
        resolve_relative_paths(&mut config, base);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./signage.toml",
        "~/.config/signage/config.toml",
        "/etc/signage/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Make database, static and template paths relative to the config file.
fn resolve_relative_paths(config: &mut Config, base: &Path) {
    if config.server.database.is_relative() {
        config.server.database = base.join(&config.server.database);
    }
    if let Some(dir) = config.server.static_dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
    if let Some(dir) = config.templates.dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let player = &config.player;
    let routes = [
        ("screen_path", &player.screen_path),
        ("playlist_path", &player.playlist_path),
        ("asset_path", &player.asset_path),
    ];
    for (name, route) in routes {
        if !route.starts_with('/') || route.len() < 2 || route.ends_with('/') {
            anyhow::bail!(
                "player.{} must start with '/' and not end with '/': {:?}",
                name,
                route
            );
        }
        if route.contains(':') || route.contains('*') {
            anyhow::bail!("player.{} must not contain route captures: {:?}", name, route);
        }
    }
    if player.screen_path == player.playlist_path
        || player.screen_path == player.asset_path
        || player.playlist_path == player.asset_path
    {
        anyhow::bail!("player route prefixes must be distinct");
    }

    if player.default_duration_secs == 0 {
        anyhow::bail!("player.default_duration_secs must be greater than 0");
    }
    if player.cache_max_age_secs == 0 {
        anyhow::bail!("player.cache_max_age_secs must be greater than 0");
    }

    if let Some(dir) = missing_template_dir(config) {
        tracing::warn!("Template directory does not exist: {:?}", dir);
    }

    Ok(())
}

/// The configured template directory, if it is set but absent on disk.
pub fn missing_template_dir(config: &Config) -> Option<&Path> {
    config
        .templates
        .dir
        .as_deref()
        .filter(|dir| !dir.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.player.screen_path, "/ds/s");
        assert_eq!(config.player.playlist_path, "/ds/p");
        assert_eq!(config.player.asset_path, "/ds/a");
        assert_eq!(config.player.default_duration_secs, 10);
        assert_eq!(config.player.cache_max_age_secs, 3600);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signage.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090
database = "data/signage.db"

[player]
screen_path = "/screens"

[templates]
dir = "templates"
"#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.database, dir.path().join("data/signage.db"));
        assert_eq!(config.player.screen_path, "/screens");
        assert_eq!(config.player.playlist_path, "/ds/p");
        assert_eq!(config.templates.dir, Some(dir.path().join("templates")));
    }

    #[test]
    fn test_template_dir_checked_next_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("slide_templates")).unwrap();
        let path = dir.path().join("signage.toml");
        std::fs::write(&path, "[templates]\ndir = \"slide_templates\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(missing_template_dir(&config), None);

        std::fs::write(&path, "[templates]\ndir = \"gone\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(missing_template_dir(&config), Some(dir.path().join("gone").as_path()));
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_route_prefixes() {
        let mut config = Config::default();
        config.player.asset_path = "assets".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.player.asset_path = "/ds/a/".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.player.playlist_path = config.player.screen_path.clone();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.player.screen_path = "/ds/:x".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_durations() {
        let mut config = Config::default();
        config.player.default_duration_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.player.cache_max_age_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_config(Path::new("/nonexistent/signage.toml"));
        assert!(result.is_err());
    }
}

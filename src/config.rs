use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub media: MediaConfig,
}

/// Server configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Preferred port. The server falls back to an OS-assigned port when
    /// this one cannot be bound.
    pub port: u16,
    /// Name shown on the networks page and in logs.
    pub name: String,
    /// Open the networks page in the default browser on startup.
    pub open_browser: bool,
}

/// Media configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory tree served over HTTP.
    pub root: PathBuf,
}

fn default_server_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "WatchDir".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 80,
            name: default_server_name(),
            open_browser: true,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Platform default location of the configuration file.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("watchdir").join("config.toml"))
    }

    /// Load configuration from an explicit file, from the platform default
    /// location, or fall back to built-in defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        match candidate {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate the served root and replace it with its canonical form, the
    /// anchor all request paths are contained under.
    pub fn canonicalize_root(&mut self) -> Result<()> {
        let root = self.media.root.canonicalize().with_context(|| {
            format!("media root {} is not accessible", self.media.root.display())
        })?;
        if !root.is_dir() {
            bail!("media root {} is not a directory", root.display());
        }
        self.media.root = root;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 80);
        assert!(config.server.open_browser);
        assert_eq!(config.media.root, PathBuf::from("."));
        assert!(!config.server.name.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080
            open_browser = false

            [media]
            root = "/srv/media"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.open_browser);
        assert_eq!(config.media.root, PathBuf::from("/srv/media"));
        // Name was not given, so the default applies.
        assert!(!config.server.name.is_empty());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, AppConfig::default().server.port);
    }

    #[test]
    fn canonicalize_rejects_missing_root() {
        let mut config = AppConfig::default();
        config.media.root = PathBuf::from("/definitely/not/a/real/dir");
        assert!(config.canonicalize_root().is_err());
    }

    #[test]
    fn canonicalize_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        let mut config = AppConfig::default();
        config.media.root = file;
        assert!(config.canonicalize_root().is_err());
    }
}

//! Configuration for the store, the favicon fetcher, and logging.
//!
//! Three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Config file (~/.config/linkdeck/config.toml)
//! 3. Environment variables (LINKDECK_* prefix)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared prefix of the override variables
const ENV_PREFIX: &str = "LINKDECK";

/// Settings persisted in config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (the bookmarks snapshot)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whether to fetch favicons for new and edited bookmarks
    #[serde(default = "default_fetch_favicons")]
    pub fetch_favicons: bool,

    /// Log file used when logging is enabled (defaults to data_dir/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            fetch_favicons: default_fetch_favicons(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location and environment
    ///
    /// Precedence, highest first: environment variables (LINKDECK_DATA_DIR,
    /// LINKDECK_FETCH_FAVICONS, LINKDECK_LOG_FILE), then the config file
    /// (~/.config/linkdeck/config.toml or LINKDECK_CONFIG), then defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from an explicit file path
    ///
    /// A missing file means defaults; env overrides apply either way.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration, honoring a `--config` path from the CLI when given
    pub fn load_with_cli_override(config_path: Option<&PathBuf>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Parse configuration from a TOML string, mainly for tests
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Fold LINKDECK_* variables over whatever the file provided
    fn apply_env_overrides(&mut self) {
        // LINKDECK_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // LINKDECK_FETCH_FAVICONS
        if let Ok(val) = std::env::var(format!("{}_FETCH_FAVICONS", ENV_PREFIX)) {
            self.fetch_favicons = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // LINKDECK_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Create the data directory when missing
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Path of the config file; LINKDECK_CONFIG overrides the location
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkdeck")
            .join("config.toml")
    }

    /// Get the path to the bookmarks snapshot file
    pub fn bookmarks_path(&self) -> PathBuf {
        self.data_dir.join("bookmarks.json")
    }

    /// Get the log file path, falling back to data_dir/debug.log
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

/// Platform data dir, with a cwd fallback
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkdeck")
}

fn default_fetch_favicons() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global, so tests touching them run one at a time
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Holds the env lock, starts from cleared vars, restores them on drop
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LINKDECK_DATA_DIR",
        "LINKDECK_FETCH_FAVICONS",
        "LINKDECK_LOG_FILE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.fetch_favicons);
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("linkdeck"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();

        let snapshot_path = config.bookmarks_path();
        assert!(snapshot_path.ends_with("bookmarks.json"));

        let log_path = config.log_file_path();
        assert!(log_path.ends_with("debug.log"));
    }

    #[test]
    fn test_explicit_log_file() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/linkdeck.log")),
            ..Config::default()
        };
        assert_eq!(config.log_file_path(), PathBuf::from("/tmp/linkdeck.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKDECK_DATA_DIR", "/tmp/linkdeck-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/linkdeck-test"));
    }

    #[test]
    fn test_env_override_fetch_favicons() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert!(config.fetch_favicons);

        env::set_var("LINKDECK_FETCH_FAVICONS", "false");
        config.apply_env_overrides();
        assert!(!config.fetch_favicons);

        env::set_var("LINKDECK_FETCH_FAVICONS", "1");
        config.apply_env_overrides();
        assert!(config.fetch_favicons);

        env::set_var("LINKDECK_FETCH_FAVICONS", "TRUE");
        config.fetch_favicons = false;
        config.apply_env_overrides();
        assert!(config.fetch_favicons);
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert!(config.log_file.is_none());

        env::set_var("LINKDECK_LOG_FILE", "/tmp/deck.log");
        config.apply_env_overrides();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/deck.log")));

        // An empty value unsets it
        env::set_var("LINKDECK_LOG_FILE", "");
        config.apply_env_overrides();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/linkdeck"),
            fetch_favicons: false,
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("fetch_favicons"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.fetch_favicons, config.fetch_favicons);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            fetch_favicons = false
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert!(!config.fetch_favicons);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        // Keep ensure_data_dir inside the temp dir
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("LINKDECK_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Defaults everywhere the file would have spoken
        assert!(config.fetch_favicons);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            fetch_favicons: false,
            log_file: Some(PathBuf::from("/tmp/deck.log")),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(!loaded.fetch_favicons);
        assert_eq!(loaded.log_file, config.log_file);
    }
}

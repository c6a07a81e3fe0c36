//! Configuration file loading and parsing

use super::GzbakConfigFile;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file names searched in the working directory
const CONFIG_FILE_NAMES: &[&str] = &["gzbak.yaml", "gzbak.yml"];

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "GZBAK_CONFIG";

/// Loaded gzbak configuration
#[derive(Debug, Clone, Default)]
pub struct GzbakConfig {
    /// The parsed configuration
    pub config: GzbakConfigFile,

    /// Path the configuration was read from, `None` for built-in defaults
    pub config_path: Option<Utf8PathBuf>,
}

impl GzbakConfig {
    /// Load configuration from the specified path or search for it.
    ///
    /// An explicit path (argument or `GZBAK_CONFIG`) must exist. Without one, the current
    /// directory and then the user config directory are searched, falling back to defaults.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load_file(p);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            if !env_path.is_empty() {
                return Self::load_file(Utf8Path::new(&env_path));
            }
        }

        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        match Self::find_config(&cwd) {
            Some(found) => Self::load_file(&found),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and parse a specific configuration file
    pub fn load_file(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let config = Self::parse(&content)?;
        debug!("Loaded configuration from {}", path);

        Ok(Self {
            config,
            config_path: Some(path.to_owned()),
        })
    }

    /// Parse YAML configuration content
    pub fn parse(content: &str) -> Result<GzbakConfigFile> {
        if content.trim().is_empty() {
            return Ok(GzbakConfigFile::default());
        }

        let config: GzbakConfigFile = serde_yaml_ng::from_str(content)?;
        if config.compression_level == 0 {
            return Err(Error::invalid_config(
                "compression_level must be between 1 and 9",
            ));
        }
        Ok(config)
    }

    /// Find a configuration file in `dir`, then in the user config directory
    fn find_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let user_config = dirs::config_dir()?.join("gzbak").join("config.yaml");
        let user_config = Utf8PathBuf::try_from(user_config).ok()?;
        user_config.is_file().then_some(user_config)
    }

    /// Default directory for new backups and listings
    pub fn backup_dir(&self) -> Option<&Utf8Path> {
        self.config.backup_dir.as_deref()
    }

    /// Default directory restores are written into
    pub fn restore_dir(&self) -> Option<&Utf8Path> {
        self.config.restore_dir.as_deref()
    }

    /// Compression level clamped to the valid gzip range
    pub fn compression_level(&self) -> u32 {
        self.config.compression_level.clamp(1, 9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_parse_full_config() {
        let config = GzbakConfig::parse(
            "backup_dir: /var/backups\nrestore_dir: /srv/projects\ncompression_level: 9\n",
        )
        .unwrap();

        assert_eq!(config.backup_dir, Some(Utf8PathBuf::from("/var/backups")));
        assert_eq!(config.restore_dir, Some(Utf8PathBuf::from("/srv/projects")));
        assert_eq!(config.compression_level, 9);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = GzbakConfig::parse("backup_dir: ./backups\n").unwrap();
        assert_eq!(config.compression_level, 6);
        assert!(config.restore_dir.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(GzbakConfig::parse("").unwrap(), GzbakConfigFile::default());
    }

    #[test]
    fn test_parse_rejects_zero_compression() {
        let err = GzbakConfig::parse("compression_level: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_yaml() {
        let err = GzbakConfig::parse("backup_dir: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_compression_level_clamped() {
        let config = GzbakConfig {
            config: GzbakConfigFile {
                compression_level: 42,
                ..Default::default()
            },
            config_path: None,
        };
        assert_eq!(config.compression_level(), 9);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = utf8(&temp_dir).join("nope.yaml");

        let err = GzbakConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir).join("custom.yaml");
        fs::write(&path, "restore_dir: /restore\n").unwrap();

        let config = GzbakConfig::load(Some(&path)).unwrap();
        assert_eq!(config.restore_dir(), Some(Utf8Path::new("/restore")));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_find_config_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = utf8(&temp_dir);
        fs::write(dir.join("gzbak.yml"), "compression_level: 3\n").unwrap();

        assert_eq!(GzbakConfig::find_config(&dir), Some(dir.join("gzbak.yml")));
    }

    #[test]
    #[serial]
    fn test_load_from_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir).join("env.yaml");
        fs::write(&path, "backup_dir: /from/env\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, path.as_str());
        let config = GzbakConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        let config = config.unwrap();
        assert_eq!(config.backup_dir(), Some(Utf8Path::new("/from/env")));
    }
}

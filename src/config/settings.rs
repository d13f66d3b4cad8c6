//! Application settings and paths.
//!
//! Settings live in an optional JSON file. The default location follows the
//! XDG base directory layout; `--config` points somewhere else.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ScannerConfig, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use crate::types::PortRange;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/lansweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve the per-user directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("org", "lansweep", "lansweep").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum in-flight probes.
    pub concurrency: usize,
    /// Hosts scanned at once.
    pub host_concurrency: usize,
    /// Probes per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Port range, "START-END" or a single port.
    pub ports: String,
    /// Output format: plain, json or csv.
    pub output: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            concurrency: DEFAULT_CONCURRENCY,
            host_concurrency: 1,
            rate_limit: 0,
            ports: PortRange::well_known().to_string(),
            output: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if no file
    /// exists there.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Check every value and build the scanner configuration from them.
    pub fn validate(&self) -> ConfigResult<ScannerConfig> {
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than zero"));
        }
        if self.concurrency == 0 || self.concurrency > usize::from(u16::MAX) {
            return Err(invalid("concurrency", "must be between 1 and 65535"));
        }
        if self.host_concurrency == 0 || self.host_concurrency > 255 {
            return Err(invalid("host_concurrency", "must be between 1 and 255"));
        }
        if !matches!(self.output.as_str(), "plain" | "json" | "csv") {
            return Err(invalid("output", "must be plain, json or csv"));
        }
        let ports: PortRange = self
            .ports
            .parse()
            .map_err(|e: crate::types::PortError| invalid("ports", e.to_string()))?;

        Ok(ScannerConfig::new()
            .with_ports(ports)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_concurrency(self.concurrency)
            .with_rate_limit(self.rate_limit))
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.timeout_ms, 1000);
        assert_eq!(settings.concurrency, 512);
        assert_eq!(settings.host_concurrency, 1);
        assert_eq!(settings.ports, "1-1023");

        let config = settings.validate().unwrap();
        assert_eq!(config.ports, PortRange::well_known());
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeout_ms": 250, "ports": "20-25" }}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.timeout_ms, 250);
        assert_eq!(settings.concurrency, 512);
        assert_eq!(settings.output, "plain");

        let config = settings.validate().unwrap();
        assert_eq!(config.ports.len(), 6);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "timeout_ms = 5").unwrap();

        let err = AppSettings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_invalid_values() {
        let settings = AppSettings {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { name: "concurrency", .. })
        ));

        let settings = AppSettings {
            ports: "900-80".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { name: "ports", .. })
        ));

        let settings = AppSettings {
            output: "xml".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}

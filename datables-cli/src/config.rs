//! `datables.toml` settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use datables_core::{hours::ServiceHours, model::LocationId};
use serde::Deserialize;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Service hours must satisfy open <= close <= 23, got {open} to {close}")]
    InvalidHours { open: u32, close: u32 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Location used when `--location` is not given.
    pub(crate) location: Option<LocationId>,
    /// Snapshot file, relative to the config file. Created from demo data on first save.
    pub(crate) snapshot: Option<PathBuf>,
    pub(crate) service_hours: HoursConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HoursConfig {
    pub(crate) open: u32,
    pub(crate) close: u32,
}

impl Default for HoursConfig {
    fn default() -> Self {
        let hours = ServiceHours::default();
        Self {
            open: hours.open_hour,
            close: hours.close_hour,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Analytics window, validated.
    pub(crate) fn service_hours(&self) -> Result<ServiceHours, ConfigError> {
        let HoursConfig { open, close } = self.service_hours;
        if open > close || close > 23 {
            return Err(ConfigError::InvalidHours { open, close });
        }
        Ok(ServiceHours {
            open_hour: open,
            close_hour: close,
        })
    }

    /// Snapshot path resolved against the directory holding `config_path`.
    pub(crate) fn snapshot_path(&self, config_path: &Path) -> Option<PathBuf> {
        let snapshot = self.snapshot.as_ref()?;
        if snapshot.is_absolute() {
            return Some(snapshot.clone());
        }
        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Settings {
        toml::from_str(raw).expect("valid settings")
    }

    #[test]
    fn empty_file_means_defaults() {
        let settings = parse("");
        assert!(settings.location.is_none());
        assert_eq!(settings.service_hours().ok(), Some(ServiceHours::default()));
    }

    #[test]
    fn reads_every_key() {
        let settings = parse(
            r#"
location = "santa-ana"
snapshot = "floor.json"

[service_hours]
open = 10
close = 22
"#,
        );
        assert_eq!(settings.location, Some(LocationId::from("santa-ana")));
        let hours = settings.service_hours().expect("valid hours");
        assert_eq!((hours.open_hour, hours.close_hour), (10, 22));
        assert_eq!(
            settings.snapshot_path(Path::new("/srv/datables/datables.toml")),
            Some(PathBuf::from("/srv/datables/floor.json"))
        );
    }

    #[test]
    fn rejects_inverted_hours_and_unknown_keys() {
        let settings = parse("[service_hours]\nopen = 20\nclose = 12\n");
        assert!(matches!(
            settings.service_hours(),
            Err(ConfigError::InvalidHours { open: 20, close: 12 })
        ));
        assert!(toml::from_str::<Settings>("colour = \"blue\"").is_err());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = Settings::load(&dir.path().join("absent.toml")).expect("defaults");
        assert!(settings.snapshot.is_none());
    }
}

//! Persisted user settings, stored as TOML under the config directory.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::deadline::DeadlineResolver;
use crate::reminders::ReminderList;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("timezone offset out of range: {0} hours")]
    InvalidOffset(i32),

    #[error("default_time must be HH:MM, got '{0}'")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Destination list for new reminders; empty means the default list.
    pub destination_list_id: String,
    /// Focus the title field when the form opens.
    pub auto_focus: bool,
    /// Zone deadlines are resolved and recorded in.
    pub timezone_offset_hours: i32,
    /// Time used when a deadline names a day only.
    pub default_time: String,
    pub log_level: String,
    /// Accent color, "#rrggbb" or a color name.
    pub accent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            destination_list_id: String::new(),
            auto_focus: false,
            timezone_offset_hours: 9,
            default_time: "09:00".to_string(),
            log_level: "info".to_string(),
            accent: None,
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reminder-assistant").join("config.toml"))
}

impl Settings {
    /// Load settings; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&content)?;
        settings.zone()?;
        settings.default_time()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn destination(&self) -> Option<&str> {
        Some(self.destination_list_id.as_str()).filter(|id| !id.is_empty())
    }

    /// Forget a destination that no longer exists. Returns whether anything
    /// changed.
    pub fn reconcile(&mut self, lists: &[ReminderList]) -> bool {
        let Some(id) = self.destination() else {
            return false;
        };
        if lists.iter().any(|list| list.id == id) {
            return false;
        }
        info!(stale = %id, "stored destination list is gone; using the default list");
        self.destination_list_id.clear();
        true
    }

    pub fn zone(&self) -> Result<FixedOffset> {
        self.timezone_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.timezone_offset_hours))
    }

    pub fn default_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.default_time, "%H:%M")
            .map_err(|_| ConfigError::InvalidTime(self.default_time.clone()))
    }

    pub fn resolver(&self) -> Result<DeadlineResolver> {
        Ok(DeadlineResolver::new(self.zone()?, self.default_time()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> Vec<ReminderList> {
        vec![
            ReminderList::new("list-a", "リストA"),
            ReminderList::new("list-b", "リストB"),
        ]
    }

    #[test]
    fn reconcile_clears_a_stale_destination() {
        let mut settings = Settings {
            destination_list_id: "list-x".to_string(),
            ..Settings::default()
        };
        assert!(settings.reconcile(&lists()));
        assert_eq!(settings.destination(), None);
    }

    #[test]
    fn reconcile_keeps_a_live_destination() {
        let mut settings = Settings {
            destination_list_id: "list-b".to_string(),
            ..Settings::default()
        };
        assert!(!settings.reconcile(&lists()));
        assert_eq!(settings.destination(), Some("list-b"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings: Settings = toml::from_str("auto_focus = true").unwrap();
        assert!(settings.auto_focus);
        assert_eq!(settings.default_time, "09:00");
        assert_eq!(settings.zone().unwrap().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn rejects_bad_default_time() {
        let settings = Settings {
            default_time: "9am".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.resolver(), Err(ConfigError::InvalidTime(_))));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let settings = Settings {
            timezone_offset_hours: 30,
            ..Settings::default()
        };
        assert!(matches!(settings.zone(), Err(ConfigError::InvalidOffset(30))));
    }
}

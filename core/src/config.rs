// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;

use crate::datetime::{resolve_zone, system_zone};
use crate::error::ConfigError;
use crate::ingest::CalendarRef;

/// The name of the application.
pub const APP_NAME: &str = "tidecal";

/// Configuration of the calendar store and the ingestion context.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Path to the calendar directory.
    pub calendar_path: PathBuf,

    /// Identifier of the current calendar, defaults to the directory name.
    #[serde(default)]
    pub calendar_id: Option<String>,

    /// IANA name of the current time zone, defaults to the system zone.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), ConfigError> {
        self.calendar_path = expand_path(&self.calendar_path)?;
        Ok(())
    }

    /// The current calendar, if one can be named.
    #[must_use]
    pub fn calendar(&self) -> Option<CalendarRef> {
        match &self.calendar_id {
            Some(id) if !id.trim().is_empty() => Some(CalendarRef::new(id.trim())),
            _ => self
                .calendar_path
                .file_name()
                .and_then(|name| name.to_str())
                .map(CalendarRef::new),
        }
    }

    /// The current time zone: the configured one, else the system zone, else
    /// UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured zone is unknown.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        if let Some(name) = &self.timezone {
            return resolve_zone(name).map_err(|source| ConfigError::UnknownTimeZone {
                name: name.clone(),
                source,
            });
        }

        Ok(system_zone())
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let Some(path) = path.to_str() else {
        return Err(ConfigError::Path {
            path: path.to_string_lossy().into_owned(),
            reason: "path is not valid UTF-8",
        });
    };

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir(path)?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir(path)?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir(path: &str) -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or_else(|| ConfigError::Path {
        path: path.to_string(),
        reason: "user-specific home directory not found",
    })
}

fn get_config_dir(path: &str) -> Result<PathBuf, ConfigError> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_local_dir();
    config_dir.ok_or_else(|| ConfigError::Path {
        path: path.to_string(),
        reason: "user-specific config directory not found",
    })
}

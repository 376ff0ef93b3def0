//! Global zonecal configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::Calendar;
use crate::container::{CalendarContainer, DEFAULT_CALENDAR};
use crate::error::{CalError, CalResult};
use crate::time::parse_timezone;

static DEFAULT_TIMEZONE: &str = "UTC";
static DEFAULT_EXPORT_DIR: &str = ".";
static ENV_PREFIX: &str = "ZONECAL";

fn default_calendar() -> String {
    DEFAULT_CALENDAR.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

/// Configuration at ~/.config/zonecal/config.toml, overridable with `ZONECAL_*`
/// environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ZonecalConfig {
    /// Calendar created at startup and used until another is selected.
    #[serde(default = "default_calendar")]
    pub default_calendar: String,

    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Relative export paths are resolved against this directory.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for ZonecalConfig {
    fn default() -> Self {
        ZonecalConfig {
            default_calendar: default_calendar(),
            default_timezone: default_timezone(),
            export_dir: default_export_dir(),
        }
    }
}

impl ZonecalConfig {
    pub fn config_path() -> CalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalError::Config("Could not determine config directory".into()))?
            .join("zonecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location.
    pub fn load() -> CalResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, writing a commented default file there first if it is missing.
    pub fn load_from(path: &Path) -> CalResult<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: &Path, env: Environment) -> CalResult<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let config: ZonecalConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| CalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalError::Config(e.to_string()))?;

        config.timezone()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn timezone(&self) -> CalResult<Tz> {
        parse_timezone(&self.default_timezone).map_err(|e| {
            CalError::Config(format!("default_timezone: {}", e))
        })
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export_dir.to_string_lossy()).into_owned())
    }

    /// Where an export named `file` should be written.
    pub fn resolve_export_path(&self, file: &str) -> PathBuf {
        let file = PathBuf::from(shellexpand::tilde(file).into_owned());
        if file.is_absolute() {
            file
        } else {
            self.export_dir().join(file)
        }
    }

    /// A container holding the default calendar, already selected.
    pub fn bootstrap(&self) -> CalResult<CalendarContainer> {
        let mut container = CalendarContainer::new();
        container.add_calendar(Calendar::new(&self.default_calendar, self.timezone()?))?;
        container.set_active_calendar(&self.default_calendar)?;
        Ok(container)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalResult<()> {
        let contents = format!(
            "\
# zonecal configuration

# Calendar used until another one is selected:
# default_calendar = \"{}\"

# Time zone of the default calendar (IANA id):
# default_timezone = \"{}\"

# Where relative export paths are written:
# export_dir = \"{}\"
",
            DEFAULT_CALENDAR, DEFAULT_TIMEZONE, DEFAULT_EXPORT_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

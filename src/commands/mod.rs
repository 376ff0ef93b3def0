pub mod config;
pub mod run;

use std::path::Path;

use anyhow::Result;
use zonecal_core::config::ZonecalConfig;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ZonecalConfig> {
    let config = match path {
        Some(path) => ZonecalConfig::load_from(path),
        None => ZonecalConfig::load(),
    };
    config.map_err(|e| anyhow::anyhow!(e))
}

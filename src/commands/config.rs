use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use zonecal_core::config::ZonecalConfig;

use crate::render::Render;

pub fn run(path: Option<&Path>) -> Result<()> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => ZonecalConfig::config_path().map_err(|e| anyhow::anyhow!(e))?,
    };
    let config = super::load_config(path)?;
    let container = config.bootstrap().map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Exports:    {}", config.export_dir().display());
    println!();
    println!("{}", "Startup calendar".bold());
    for calendar in container.calendars() {
        println!("  {}", calendar.render());
    }

    Ok(())
}

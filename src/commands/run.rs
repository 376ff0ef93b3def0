use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::debug;
use zonecal_core::command::{Command, ExportData, dispatch};

use crate::render::Render;
use crate::script::Script;

pub fn run(config_path: Option<&Path>, script_path: &Path, stop_on_error: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let mut container = config
        .bootstrap()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Could not set up the default calendar")?;
    let script = Script::load(script_path)?;

    let total = script.commands.len();
    let mut failed = 0;

    for (index, command) in script.commands.into_iter().enumerate() {
        // Relative export files land in the configured export directory
        let command = match command {
            Command::Export(ExportData { file }) => Command::Export(ExportData {
                file: config.resolve_export_path(&file).to_string_lossy().into_owned(),
            }),
            other => other,
        };

        debug!(index, ?command, "dispatching");
        match dispatch(&mut container, command) {
            Ok(output) => println!("{}", output.render()),
            Err(e) => {
                failed += 1;
                eprintln!("{}", e.render());
                if stop_on_error {
                    anyhow::bail!("Stopped at command {} of {}", index + 1, total);
                }
            }
        }
    }

    if failed > 0 {
        eprintln!(
            "{}",
            format!("{} of {} commands failed", failed, total).dimmed()
        );
    }

    Ok(())
}

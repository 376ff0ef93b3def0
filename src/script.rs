//! Command scripts: a TOML document with a `[[commands]]` array.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use zonecal_core::command::Command;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecal_core::edit::EditScope;

    #[test]
    fn test_parse_script() {
        let script = Script::parse(
            r#"
[[commands]]
command = "create_calendar"
name = "Work"
timezone = "America/New_York"

[[commands]]
command = "delete_event"
scope = "from"
subject = "Standup"
start = "2025-06-04T09:00"

[[commands]]
command = "export"
file = "week.ics"
"#,
        )
        .unwrap();

        assert_eq!(script.commands.len(), 3);
        assert!(matches!(
            &script.commands[1],
            Command::DeleteEvent(data) if data.scope == EditScope::From
        ));
    }

    #[test]
    fn test_empty_script() {
        let script = Script::parse("").unwrap();
        assert!(script.commands.is_empty());
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let result = Script::parse(
            r#"
[[commands]]
command = "launch_rocket"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Script::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Could not read script"));
    }
}

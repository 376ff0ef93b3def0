//! One-way export of a calendar's events to a file.
//!
//! The file extension picks the format: `.csv`, or `.ics` / `.ical` for iCalendar.

mod csv;
mod ics;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::calendar::Calendar;
use crate::error::{CalError, CalResult};

pub use csv::generate_csv;
pub use ics::generate_ics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    ICalendar,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> CalResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("ics") | Some("ical") => Ok(ExportFormat::ICalendar),
            _ => Err(CalError::InvalidValue(format!(
                "Unsupported export file '{}'. Use a .csv, .ics or .ical file",
                path.display()
            ))),
        }
    }
}

/// Write every event of `calendar` to `path` and return the absolute path written.
pub fn export_calendar(calendar: &Calendar, path: &Path) -> CalResult<PathBuf> {
    let format = ExportFormat::from_path(path)?;

    let content = match format {
        ExportFormat::Csv => generate_csv(calendar),
        ExportFormat::ICalendar => generate_ics(calendar),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .map_err(|e| CalError::Export(format!("Error writing to file {}: {}", path.display(), e)))?;

    let absolute = std::path::absolute(path)?;
    info!(
        calendar = %calendar.name(),
        path = %absolute.display(),
        events = calendar.store().len(),
        "exported calendar"
    );
    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::time::parse_date_time;

    fn make_test_calendar() -> Calendar {
        let mut calendar = Calendar::new("Work", chrono_tz::America::New_York);
        calendar
            .store_mut()
            .add(
                Event::builder("Standup", parse_date_time("2025-06-02T09:00").unwrap())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        calendar
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/Week.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("week.ical")).unwrap(),
            ExportFormat::ICalendar
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("week.txt")),
            Err(CalError::InvalidValue(_))
        ));
        assert!(ExportFormat::from_path(Path::new("week")).is_err());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("work.csv");

        let written = export_calendar(&make_test_calendar(), &path).unwrap();

        assert!(written.is_absolute());
        let content = std::fs::read_to_string(&written).unwrap();
        assert!(content.contains("Standup,06/02/2025,9:00AM"));
    }

    #[test]
    fn test_export_ics_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work.ics");

        export_calendar(&make_test_calendar(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("BEGIN:VCALENDAR"));
        assert!(content.contains("SUMMARY:Standup"));
    }
}

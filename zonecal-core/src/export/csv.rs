//! CSV export: one row per event with its start date and 12-hour start time.

use crate::calendar::Calendar;

const HEADER: &str = "Subject,StartDate,StartTime";

pub fn generate_csv(calendar: &Calendar) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for event in calendar.store().iter() {
        out.push_str(&escape(event.subject()));
        out.push(',');
        out.push_str(&event.start().format("%m/%d/%Y").to_string());
        out.push(',');
        out.push_str(&event.start().format("%-I:%M%p").to_string());
        out.push('\n');
    }

    out
}

/// Quote a field holding a comma, quote or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

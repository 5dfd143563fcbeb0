//! Plain-text export, one line per item.

use chrono::NaiveDateTime;

use crate::item::{CalendarItem, Recurrence, RecurrenceEnd};

const INVALID_DATE: &str = "Invalid Date";

pub fn to_text(items: &[CalendarItem]) -> String {
    items.iter().map(|item| item_line(item) + "\n").collect()
}

fn item_line(item: &CalendarItem) -> String {
    let summary = if item.summary.is_empty() {
        "(no summary)"
    } else {
        item.summary.as_str()
    };

    let mut parts = vec![
        format!("{}: {}", item.kind, flatten(summary)),
        format!("{} - {}", display_datetime(item.start), display_datetime(item.end)),
    ];

    if let Some(ref location) = item.location {
        parts.push(format!("at {}", flatten(location)));
    }
    if let Some(ref description) = item.description {
        parts.push(flatten(description));
    }
    if let Some(ref recurrence) = item.recurrence {
        parts.push(describe_recurrence(recurrence));
    }
    if let Some(alarm) = item.alarm {
        parts.push(format!("alarm {} min before", alarm.minutes_before));
    }

    parts.join(" | ")
}

fn display_datetime(dt: Option<NaiveDateTime>) -> String {
    dt.map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn describe_recurrence(recurrence: &Recurrence) -> String {
    let unit = recurrence.frequency.unit();
    let mut text = if recurrence.interval == 1 {
        format!("repeats every {unit}")
    } else {
        format!("repeats every {} {unit}s", recurrence.interval)
    };

    match recurrence.end {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Count(1) => text.push_str(", once"),
        RecurrenceEnd::Count(n) => text.push_str(&format!(", {n} times")),
        RecurrenceEnd::Until(dt) => {
            text.push_str(&format!(", until {}", dt.format("%Y-%m-%d %H:%M")))
        }
    }

    text
}

/// Keep each item on a single line
fn flatten(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Field collector: turns an item's raw form fields into a `CalendarItem`.
//!
//! Collection never fails. Values that cannot be read are dropped with a
//! warning, the way a form silently ignores an unparsable input.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::fields::ItemFields;
use crate::item::{
    Alarm, CalendarItem, Frequency, InvalidDates, ItemId, ItemKind, Recurrence, RecurrenceEnd,
};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a local date-time as entered in a form. A bare date means midnight.
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Canonical form-field spelling of a local date-time
pub fn format_local_datetime(dt: &NaiveDateTime) -> String {
    if dt.second() == 0 {
        dt.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Read the fields of one item into a typed record.
pub fn collect(id: ItemId, fields: &ItemFields) -> CalendarItem {
    let kind = ItemKind::parse(&fields.kind).unwrap_or_else(|| {
        tracing::warn!(%id, value = %fields.kind, "unknown item type, treating as event");
        ItemKind::Event
    });

    let start = collect_datetime(id, "start", &fields.start);
    let end = collect_datetime(id, "end", &fields.end);
    let invalid_dates = InvalidDates {
        start: unread(&fields.start, start),
        end: unread(&fields.end, end),
    };

    CalendarItem {
        id,
        kind,
        summary: fields.summary.trim().to_string(),
        start,
        end,
        location: non_empty(&fields.location),
        description: non_empty(&fields.description),
        alarm: collect_alarm(id, &fields.alarm),
        recurrence: collect_recurrence(id, fields),
        invalid_dates,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn collect_datetime(id: ItemId, field: &str, value: &str) -> Option<NaiveDateTime> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_local_datetime(value);
    if parsed.is_none() {
        tracing::warn!(%id, field, value, "invalid date");
    }
    parsed
}

/// Non-empty input that did not parse
fn unread(raw: &str, parsed: Option<NaiveDateTime>) -> Option<String> {
    let raw = raw.trim();
    (parsed.is_none() && !raw.is_empty()).then(|| raw.to_string())
}

fn collect_alarm(id: ItemId, value: &str) -> Option<Alarm> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<u32>() {
        Ok(minutes_before) => Some(Alarm { minutes_before }),
        Err(_) => {
            tracing::warn!(%id, value, "alarm is not a number of minutes, ignoring");
            None
        }
    }
}

fn collect_recurrence(id: ItemId, fields: &ItemFields) -> Option<Recurrence> {
    let freq = fields.frequency.trim();
    if freq.is_empty() || freq.eq_ignore_ascii_case("none") {
        return None;
    }
    let Some(frequency) = Frequency::parse(freq) else {
        tracing::warn!(%id, value = freq, "unknown recurrence frequency, ignoring");
        return None;
    };

    let interval = match fields.interval.trim() {
        "" => 1,
        raw => match raw.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!(%id, value = raw, "invalid recurrence interval, using 1");
                1
            }
        },
    };

    Some(Recurrence {
        frequency,
        interval,
        end: collect_recurrence_end(id, &fields.end_condition, &fields.end_value),
    })
}

fn collect_recurrence_end(id: ItemId, condition: &str, value: &str) -> RecurrenceEnd {
    let value = value.trim();
    match condition.trim().to_ascii_lowercase().as_str() {
        "" | "never" => RecurrenceEnd::Never,
        "count" => match value.parse::<u32>() {
            Ok(n) if n > 0 => RecurrenceEnd::Count(n),
            _ => {
                tracing::warn!(%id, value, "invalid occurrence count, recurrence never ends");
                RecurrenceEnd::Never
            }
        },
        "until" => match parse_until(value) {
            Some(dt) => RecurrenceEnd::Until(dt),
            None => {
                tracing::warn!(%id, value, "invalid end date, recurrence never ends");
                RecurrenceEnd::Never
            }
        },
        other => {
            tracing::warn!(%id, condition = other, "unknown end condition, recurrence never ends");
            RecurrenceEnd::Never
        }
    }
}

/// A bare date ends the recurrence at the end of that day.
fn parse_until(value: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return d.and_hms_opt(23, 59, 59);
    }
    parse_local_datetime(value)
}

//! VCALENDAR generation for collected items.

use chrono::{DateTime, Duration, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Todo, Trigger};

use crate::error::{CalFormError, CalFormResult};
use crate::form::CalendarHeader;
use crate::ics::rrule::rrule_value;
use crate::ics::zone::ExportZone;
use crate::item::{CalendarItem, ItemKind};

const PRODID_LINE: &str = concat!("PRODID:-//calform//calform ", env!("CARGO_PKG_VERSION"), "//EN");

/// The builder has no public constructor for VJOURNAL, so journals are built
/// as events carrying this property and renamed in post-processing.
const JOURNAL_MARKER: &str = "X-CALFORM-JOURNAL";

/// Generate a complete .ics document for the given items.
///
/// `generated_at` becomes every component's DTSTAMP.
pub fn generate_ics(
    header: &CalendarHeader,
    items: &[CalendarItem],
    generated_at: DateTime<Utc>,
) -> CalFormResult<String> {
    let zone = ExportZone::parse(&header.time_zone)?;
    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    let name = header.name.trim();
    if !name.is_empty() {
        cal.append_property(Property::new("X-WR-CALNAME", text(name)));
    }
    if let Some(tz) = zone.name() {
        cal.append_property(Property::new("X-WR-TIMEZONE", tz));
    }

    for item in items {
        validate(item)?;
        match item.kind {
            ItemKind::Event => {
                let mut ics_event = icalendar::Event::new();
                add_common_properties(&mut ics_event, item, &zone, &dtstamp)?;
                if let Some(ref end) = item.end {
                    ics_event.append_property(zone.property("DTEND", end));
                }
                add_location(&mut ics_event, item);
                if let Some(trigger) = alarm_trigger(item) {
                    ics_event.alarm(Alarm::display(&alarm_description(item), trigger));
                }
                cal.push(ics_event.done());
            }
            ItemKind::Todo => {
                let mut ics_todo = Todo::new();
                add_common_properties(&mut ics_todo, item, &zone, &dtstamp)?;
                if let Some(ref end) = item.end {
                    ics_todo.append_property(zone.property("DUE", end));
                }
                add_location(&mut ics_todo, item);
                if let Some(trigger) = alarm_trigger(item) {
                    ics_todo.alarm(Alarm::display(&alarm_description(item), trigger));
                }
                cal.push(ics_todo.done());
            }
            ItemKind::Journal => {
                let mut ics_journal = icalendar::Event::new();
                add_common_properties(&mut ics_journal, item, &zone, &dtstamp)?;
                if item.end.is_some() {
                    tracing::warn!(id = %item.id, "journal entries have no end time, dropping it");
                }
                if item.location.is_some() {
                    tracing::warn!(id = %item.id, "journal entries have no location, dropping it");
                }
                if item.alarm.is_some() {
                    tracing::warn!(id = %item.id, "journal entries cannot carry alarms, dropping it");
                }
                ics_journal.add_property(JOURNAL_MARKER, "TRUE");
                cal.push(ics_journal.done());
            }
        }
    }

    let cal = cal.done();
    let output = strip_ics_bloat(&cal.to_string());

    tracing::debug!(items = items.len(), "generated ics");
    Ok(output)
}

/// Properties shared by every component kind.
fn add_common_properties<C: Component>(
    component: &mut C,
    item: &CalendarItem,
    zone: &ExportZone,
    dtstamp: &str,
) -> CalFormResult<()> {
    component.uid(&item.id.to_uid());
    component.add_property("DTSTAMP", dtstamp);

    if !item.summary.is_empty() {
        component.summary(&text(&item.summary));
    }

    if let Some(ref start) = item.start {
        component.append_property(zone.property("DTSTART", start));
    }

    if let Some(ref description) = item.description {
        component.description(&text(description));
    }

    if let Some(ref recurrence) = item.recurrence {
        // RRULE is anchored on DTSTART
        if item.start.is_some() {
            component.add_property("RRULE", rrule_value(recurrence, zone)?);
        } else {
            tracing::warn!(id = %item.id, "recurrence without a start date, dropping it");
        }
    }

    Ok(())
}

fn add_location<C: EventLike>(component: &mut C, item: &CalendarItem) {
    if let Some(ref location) = item.location {
        component.location(&text(location));
    }
}

fn validate(item: &CalendarItem) -> CalFormResult<()> {
    if item.kind == ItemKind::Event && item.start.is_none() {
        return Err(CalFormError::MissingStart {
            kind: item.kind.label().to_string(),
            summary: item.summary.clone(),
        });
    }

    if let (Some(start), Some(end)) = (item.start, item.end) {
        if item.kind != ItemKind::Journal && end < start {
            return Err(CalFormError::EndBeforeStart {
                kind: item.kind.label().to_string(),
                summary: item.summary.clone(),
            });
        }
    }

    Ok(())
}

/// A relative trigger needs something to be relative to: the start, or
/// for a todo without one, the due time.
fn alarm_trigger(item: &CalendarItem) -> Option<Trigger> {
    let minutes = Duration::minutes(i64::from(item.alarm?.minutes_before));
    match (item.kind, item.start, item.end) {
        (_, Some(_), _) => Some(Trigger::before_start(minutes)),
        (ItemKind::Todo, None, Some(_)) => Some(Trigger::before_end(minutes)),
        _ => {
            tracing::warn!(id = %item.id, "alarm needs a start or due time, dropping it");
            None
        }
    }
}

fn alarm_description(item: &CalendarItem) -> String {
    if item.summary.is_empty() {
        "Reminder".to_string()
    } else {
        text(&item.summary)
    }
}

/// TEXT values go through the builder's escaping, which keeps a bare CR.
/// A CRLF pair becomes a single newline and a lone CR is dropped.
fn text(value: &str) -> String {
    value.replace('\r', "")
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
/// - Rename marked events to VJOURNAL
fn strip_ics_bloat(ics: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_valarm = false;
    let mut component_begin: Option<usize> = None;
    let mut in_journal = false;
    let journal_line = format!("{JOURNAL_MARKER}:TRUE");

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            lines.push(PRODID_LINE);
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        } else if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        if line == "BEGIN:VEVENT" {
            component_begin = Some(lines.len());
        } else if line == journal_line {
            if let Some(begin) = component_begin {
                lines[begin] = "BEGIN:VJOURNAL";
                in_journal = true;
            }
            continue;
        } else if line == "END:VEVENT" && in_journal {
            lines.push("END:VJOURNAL");
            in_journal = false;
            component_begin = None;
            continue;
        }

        lines.push(line);
    }

    let mut result = String::with_capacity(ics.len());
    for line in lines {
        result.push_str(line);
        result.push_str("\r\n");
    }
    result
}

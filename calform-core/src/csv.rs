//! CSV export and upload parsing.
//!
//! Both directions use the same fixed column order, `Field::ALL`. Fields that
//! contain a comma, quote or line break are quoted with doubled inner quotes.

use crate::collect::format_local_datetime;
use crate::error::{CalFormError, CalFormResult};
use crate::fields::{Field, ItemFields};
use crate::item::{CalendarItem, RecurrenceEnd};

/// The header row, without line terminator.
pub fn header_row() -> String {
    Field::ALL
        .iter()
        .map(|f| f.header())
        .collect::<Vec<_>>()
        .join(",")
}

/// Header row followed by one row per item, CRLF-terminated.
pub fn to_csv(items: &[CalendarItem]) -> String {
    let mut out = header_row();
    out.push_str("\r\n");
    for item in items {
        let row: Vec<String> = item_row(item).iter().map(|v| quote_field(v)).collect();
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }
    out
}

fn item_row(item: &CalendarItem) -> [String; 11] {
    // Unreadable input is written back as typed so a re-upload keeps it
    let datetime = |dt: &Option<chrono::NaiveDateTime>, unread: &Option<String>| {
        dt.as_ref()
            .map(format_local_datetime)
            .or_else(|| unread.clone())
            .unwrap_or_default()
    };
    let recurrence = item.recurrence.as_ref();

    [
        item.kind.as_ics_str().to_string(),
        item.summary.clone(),
        datetime(&item.start, &item.invalid_dates.start),
        datetime(&item.end, &item.invalid_dates.end),
        item.location.clone().unwrap_or_default(),
        item.description.clone().unwrap_or_default(),
        item.alarm
            .map(|a| a.minutes_before.to_string())
            .unwrap_or_default(),
        recurrence
            .map(|r| r.frequency.as_ics_str().to_string())
            .unwrap_or_default(),
        recurrence.map(|r| r.interval.to_string()).unwrap_or_default(),
        recurrence
            .map(|r| r.end.condition_name().to_string())
            .unwrap_or_default(),
        recurrence
            .map(|r| match r.end {
                RecurrenceEnd::Never => String::new(),
                RecurrenceEnd::Count(n) => n.to_string(),
                RecurrenceEnd::Until(dt) => format_local_datetime(&dt),
            })
            .unwrap_or_default(),
    ]
}

fn quote_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parse an uploaded CSV into item fields.
///
/// A leading header row is skipped, blank rows are ignored, short rows are
/// padded with empty values and surplus columns are dropped.
pub fn parse_csv(input: &str) -> CalFormResult<Vec<ItemFields>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut rows = Vec::new();
    let mut seen_record = false;

    for (line, record) in parse_records(input)? {
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        // Only the first non-blank record can be the header
        let first = !seen_record;
        seen_record = true;
        if first && is_header(&record) {
            continue;
        }
        if record.len() > Field::ALL.len() {
            tracing::warn!(
                line,
                columns = record.len(),
                "row has more than {} columns, ignoring the rest",
                Field::ALL.len()
            );
        }
        rows.push(ItemFields::from_row(&record));
    }

    tracing::debug!(rows = rows.len(), "parsed csv");
    Ok(rows)
}

fn is_header(record: &[String]) -> bool {
    record
        .first()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(Field::Type.header()))
}

/// Split CSV text into records, each tagged with the line it starts on.
fn parse_records(input: &str) -> CalFormResult<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                record.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut record)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CalFormError::Csv {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Alarm, Frequency, InvalidDates, ItemId, ItemKind, Recurrence};
    use chrono::NaiveDate;

    const HEADER: &str =
        "Type,Summary,Start,End,Location,Description,Alarm,Frequency,Interval,End Condition,End Value";

    fn item() -> CalendarItem {
        CalendarItem {
            id: ItemId::new(),
            kind: ItemKind::Event,
            summary: "Book club".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap().and_hms_opt(19, 0, 0),
            end: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap().and_hms_opt(21, 0, 0),
            location: Some("Library, room 2".to_string()),
            description: Some("Bring \"Dune\"".to_string()),
            alarm: Some(Alarm { minutes_before: 30 }),
            recurrence: Some(Recurrence {
                frequency: Frequency::Monthly,
                interval: 1,
                end: RecurrenceEnd::Count(6),
            }),
            invalid_dates: InvalidDates::default(),
        }
    }

    #[test]
    fn header_has_eleven_columns() {
        assert_eq!(header_row(), HEADER);
        assert_eq!(header_row().split(',').count(), 11);
    }

    #[test]
    fn export_starts_with_header_row() {
        let csv = to_csv(&[]);
        assert_eq!(csv, format!("{HEADER}\r\n"));
    }

    #[test]
    fn export_quotes_fields_with_commas_and_quotes() {
        let csv = to_csv(&[item()]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "VEVENT,Book club,2025-06-05T19:00,2025-06-05T21:00,\"Library, room 2\",\"Bring \"\"Dune\"\"\",30,MONTHLY,1,count,6"
        );
    }

    #[test]
    fn export_then_parse_preserves_values() {
        let original = item();
        let rows = parse_csv(&to_csv(std::slice::from_ref(&original))).unwrap();
        assert_eq!(rows.len(), 1);
        let collected = crate::collect::collect(original.id, &rows[0]);
        assert_eq!(collected, original);
    }

    #[test]
    fn parses_rows_without_header() {
        let rows = parse_csv("VTODO,Call mom,2025-01-01T10:00\nVJOURNAL,Thoughts").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "VTODO");
        assert_eq!(rows[0].start, "2025-01-01T10:00");
        assert_eq!(rows[0].end, "");
        assert_eq!(rows[1].summary, "Thoughts");
    }

    #[test]
    fn header_after_leading_blank_line_is_skipped() {
        let input = format!("\r\n{HEADER}\r\nVEVENT,Gym\r\n");
        let rows = parse_csv(&input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "VEVENT");
        assert_eq!(rows[0].summary, "Gym");
    }

    #[test]
    fn header_after_bom_and_blank_lines_is_skipped() {
        let input = format!("\u{feff}\n,,\n{HEADER}\nVTODO,Taxes\n");
        let rows = parse_csv(&input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "Taxes");
    }

    #[test]
    fn header_text_after_first_record_is_data() {
        let input = format!("VEVENT,Gym\n{HEADER}\n");
        let rows = parse_csv(&input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, "Type");
    }

    #[test]
    fn unreadable_dates_are_exported_as_typed() {
        let mut fields = ItemFields::new(ItemKind::Todo);
        fields.set(Field::Summary, "Renew passport");
        fields.set(Field::Start, "next tuesday");
        let item = crate::collect::collect(ItemId::new(), &fields);
        assert_eq!(item.start, None);

        let csv = to_csv(std::slice::from_ref(&item));
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("VTODO,Renew passport,next tuesday,,"));

        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows[0].start, "next tuesday");
        assert_eq!(rows[0].end, "");
    }

    #[test]
    fn skips_header_bom_and_blank_lines() {
        let input = format!("\u{feff}{HEADER}\r\n\r\nVEVENT,Gym\r\n,,,\r\n");
        let rows = parse_csv(&input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "Gym");
    }

    #[test]
    fn quoted_fields_keep_commas_and_newlines() {
        let input = "VEVENT,\"Lunch, downtown\",2025-01-01T12:00,,,\"line one\nline \"\"two\"\"\"\nVEVENT,Next";
        let rows = parse_csv(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].summary, "Lunch, downtown");
        assert_eq!(rows[0].description, "line one\nline \"two\"");
        assert_eq!(rows[1].summary, "Next");
    }

    #[test]
    fn surplus_columns_are_dropped() {
        let input = "VEVENT,a,,,,,,,,,,extra,more";
        let rows = parse_csv(input).unwrap();
        assert_eq!(rows[0].summary, "a");
        assert_eq!(rows[0].end_value, "");
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let input = "VEVENT,ok\nVEVENT,\"broken";
        match parse_csv(input) {
            Err(CalFormError::Csv { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}

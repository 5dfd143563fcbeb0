// Full chain tests: fill a form, export it, read the output back.
use calform_core::csv::parse_csv;
use calform_core::file_io::{load_rows, save};
use calform_core::{CalendarHeader, CalendarItem, ExportFormat, Field, Form, ItemKind};
use chrono::{TimeZone, Utc};
use icalendar::parser::{read_calendar, unfold};

fn sample_form() -> Form {
    let mut form = Form::new(CalendarHeader {
        name: "Family, 2025".to_string(),
        time_zone: "Europe/Paris".to_string(),
    });

    let event = form.add_item(ItemKind::Event);
    form.set_field(event, Field::Summary, "Dinner; with grandparents")
        .unwrap();
    form.set_field(event, Field::Start, "2025-05-10T19:30").unwrap();
    form.set_field(event, Field::End, "2025-05-10T22:00").unwrap();
    form.set_field(event, Field::Location, "12 Rue de la Paix, Paris")
        .unwrap();
    form.set_field(event, Field::Description, "Bring wine\nand dessert")
        .unwrap();
    form.set_field(event, Field::Alarm, "60").unwrap();
    form.set_field(event, Field::Frequency, "MONTHLY").unwrap();
    form.set_field(event, Field::EndCondition, "until").unwrap();
    form.set_field(event, Field::EndValue, "2025-12-31").unwrap();

    let todo = form.add_item(ItemKind::Todo);
    form.set_field(todo, Field::Summary, "Book tickets").unwrap();
    form.set_field(todo, Field::End, "2025-05-01T12:00").unwrap();
    form.set_field(todo, Field::Alarm, "1440").unwrap();

    let removed = form.add_item(ItemKind::Event);
    form.set_field(removed, Field::Summary, "Cancelled plan").unwrap();
    form.remove_item(removed).unwrap();

    let journal = form.add_item(ItemKind::Journal);
    form.set_field(journal, Field::Summary, "Trip notes").unwrap();
    form.set_field(journal, Field::Start, "2025-05-11").unwrap();
    form.set_field(journal, Field::Description, &"long text ".repeat(20))
        .unwrap();

    form
}

fn stamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
}

#[test]
fn ics_export_is_readable_by_an_independent_parser() {
    let ics = sample_form().export(ExportFormat::Ics, stamp()).unwrap();

    let unfolded = unfold(&ics);
    let calendar = read_calendar(&unfolded).expect("generated ICS should parse");

    let names: Vec<&str> = calendar
        .components
        .iter()
        .map(|c| c.name.as_ref())
        .collect();
    assert_eq!(names, vec!["VEVENT", "VTODO", "VJOURNAL"]);

    let vevent = &calendar.components[0];
    assert!(
        vevent
            .find_prop("SUMMARY")
            .unwrap()
            .val
            .as_ref()
            .contains("grandparents")
    );
    assert_eq!(
        vevent.find_prop("RRULE").unwrap().val.as_ref(),
        "FREQ=MONTHLY;UNTIL=20251231T225959Z"
    );
    assert_eq!(
        vevent
            .components
            .iter()
            .filter(|c| c.name == "VALARM")
            .count(),
        1
    );

    let vtodo = &calendar.components[1];
    assert!(vtodo.find_prop("DUE").is_some());
    assert!(vtodo.find_prop("DTSTART").is_none());

    assert!(!ics.contains("Cancelled plan"));
}

#[test]
fn ics_calendar_name_is_escaped() {
    let ics = sample_form().export(ExportFormat::Ics, stamp()).unwrap();
    assert!(ics.contains("X-WR-CALNAME:Family\\, 2025\r\n"));
    assert!(ics.contains("X-WR-TIMEZONE:Europe/Paris\r\n"));

    let unfolded = unfold(&ics);
    let calendar = read_calendar(&unfolded).unwrap();
    let name = calendar
        .properties
        .iter()
        .find(|p| p.name == "X-WR-CALNAME")
        .unwrap();
    assert_eq!(name.val.as_ref(), "Family, 2025");
}

#[test]
fn ics_lines_are_folded() {
    let ics = sample_form().export(ExportFormat::Ics, stamp()).unwrap();
    for line in ics.split("\r\n") {
        assert!(line.len() <= 75, "line longer than 75 octets: {line:?}");
    }
}

#[test]
fn csv_round_trip_through_upload() {
    let form = sample_form();
    let csv = form.export(ExportFormat::Csv, stamp()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.csv");
    save(&path, &csv).unwrap();

    let mut reloaded = Form::new(form.header.clone());
    reloaded.import_rows(load_rows(&path).unwrap());

    assert_eq!(reloaded.items().len(), 3);
    assert_eq!(reloaded.export(ExportFormat::Csv, stamp()).unwrap(), csv);
}

#[test]
fn csv_upload_rows_collect_like_form_input() {
    let rows = parse_csv(
        "Type,Summary,Start,End,Location,Description,Alarm,Frequency,Interval,End Condition,End Value\n\
         todo,Renew passport,,2025-09-01,,,30,,,,\n",
    )
    .unwrap();
    let mut form = Form::default();
    let indices = form.import_rows(rows);
    let item = form.collect(indices[0]).unwrap();
    assert_eq!(item.kind, ItemKind::Todo);
    assert_eq!(item.summary, "Renew passport");
    assert!(item.start.is_none());
    assert!(item.end.is_some());
    assert_eq!(item.alarm.map(|a| a.minutes_before), Some(30));
}

#[test]
fn json_export_matches_collected_items() {
    let form = sample_form();
    let json = form.export(ExportFormat::Json, stamp()).unwrap();
    let parsed: Vec<CalendarItem> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, form.collect_all());
}

#[test]
fn text_export_has_one_line_per_live_item() {
    let text = sample_form().export(ExportFormat::Text, stamp()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("VEVENT: Dinner; with grandparents | 2025-05-10 19:30"));
    assert!(lines[1].starts_with("VTODO: Book tickets | Invalid Date - 2025-05-01 12:00"));
    assert!(lines[2].starts_with("VJOURNAL: Trip notes"));
}

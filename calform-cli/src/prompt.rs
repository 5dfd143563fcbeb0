//! Interactive header form and item subforms.
//!
//! Every prompt starts from the field's current value, so the same subform
//! serves both adding and editing. Answers are stored as form text; the core
//! collector decides what they mean at export time.

use anyhow::{Result, anyhow, bail};
use calform_core::collect::{format_local_datetime, parse_local_datetime};
use calform_core::ics::ExportZone;
use calform_core::{CalendarHeader, Field, Frequency, ItemFields, ItemKind};
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

/// Prompt with the current value pre-filled and editable.
fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(input.trim().to_string())
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<T, F>(prompt: &str, current: &str, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T>,
{
    loop {
        let input = prompt_text(prompt, current)?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

pub fn header_form(current: &CalendarHeader) -> Result<CalendarHeader> {
    let name = prompt_text("Calendar name", &current.name)?;
    let time_zone = prompt_with_retry(
        "Time zone (blank for floating times)",
        &current.time_zone,
        parse_time_zone,
    )?;
    Ok(CalendarHeader { name, time_zone })
}

/// Run the subform for one item and return the updated fields.
pub fn item_form(current: &ItemFields) -> Result<ItemFields> {
    let mut fields = current.clone();

    let kind = select_kind(ItemKind::parse(&current.kind).unwrap_or_default())?;
    fields.set(Field::Type, kind.as_ics_str());

    fields.set(Field::Summary, prompt_text("Summary", &current.summary)?);

    let start_required = kind == ItemKind::Event;
    let start_prompt = if start_required { "Start" } else { "Start (optional)" };
    let start = prompt_with_retry(start_prompt, &current.start, |input| {
        parse_datetime_field(input, start_required)
    })?;
    fields.set(Field::Start, start);

    match kind {
        ItemKind::Event => {
            let end = prompt_with_retry("End (optional)", &current.end, |input| {
                parse_datetime_field(input, false)
            })?;
            fields.set(Field::End, end);
        }
        ItemKind::Todo => {
            let due = prompt_with_retry("Due (optional)", &current.end, |input| {
                parse_datetime_field(input, false)
            })?;
            fields.set(Field::End, due);
        }
        ItemKind::Journal => fields.set(Field::End, ""),
    }

    if kind == ItemKind::Journal {
        fields.set(Field::Location, "");
    } else {
        fields.set(Field::Location, prompt_text("Location", &current.location)?);
    }

    fields.set(
        Field::Description,
        prompt_text("Description", &current.description)?,
    );

    if kind == ItemKind::Journal {
        fields.set(Field::Alarm, "");
    } else {
        let alarm = prompt_with_retry(
            "Alarm (minutes before, e.g. 15 or 1h)",
            &current.alarm,
            parse_alarm,
        )?;
        fields.set(Field::Alarm, alarm);
    }

    recurrence_form(&mut fields)?;

    Ok(fields)
}

fn select_kind(current: ItemKind) -> Result<ItemKind> {
    let labels: Vec<&str> = ItemKind::ALL.iter().map(|k| k.label()).collect();
    let default = ItemKind::ALL
        .iter()
        .position(|k| *k == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Type")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(ItemKind::ALL[selection])
}

fn recurrence_form(fields: &mut ItemFields) -> Result<()> {
    let mut labels = vec!["Does not repeat"];
    labels.extend(Frequency::ALL.iter().map(|f| frequency_label(*f)));

    let default = Frequency::parse(&fields.frequency)
        .and_then(|current| Frequency::ALL.iter().position(|f| *f == current))
        .map_or(0, |i| i + 1);

    let selection = Select::new()
        .with_prompt("Repeat")
        .items(&labels)
        .default(default)
        .interact()?;

    if selection == 0 {
        for field in [
            Field::Frequency,
            Field::Interval,
            Field::EndCondition,
            Field::EndValue,
        ] {
            fields.set(field, "");
        }
        return Ok(());
    }

    let frequency = Frequency::ALL[selection - 1];
    fields.set(Field::Frequency, frequency.as_ics_str());

    let current_interval = if fields.interval.is_empty() {
        "1".to_string()
    } else {
        fields.interval.clone()
    };
    let interval = prompt_with_retry(
        &format!("Every how many {}s", frequency.unit()),
        &current_interval,
        parse_interval,
    )?;
    fields.set(Field::Interval, interval);

    let ends = ["Never", "After a number of occurrences", "On a date"];
    let default_end = match fields.end_condition.trim().to_ascii_lowercase().as_str() {
        "count" => 1,
        "until" => 2,
        _ => 0,
    };
    let end = Select::new()
        .with_prompt("Ends")
        .items(&ends)
        .default(default_end)
        .interact()?;

    let current_value = fields.end_value.clone();
    match end {
        0 => {
            fields.set(Field::EndCondition, "never");
            fields.set(Field::EndValue, "");
        }
        1 => {
            let count =
                prompt_with_retry("Number of occurrences", &current_value, parse_count)?;
            fields.set(Field::EndCondition, "count");
            fields.set(Field::EndValue, count);
        }
        _ => {
            let until = prompt_with_retry("Last date", &current_value, |input| {
                parse_datetime_field(input, true)
            })?;
            fields.set(Field::EndCondition, "until");
            fields.set(Field::EndValue, until);
        }
    }

    Ok(())
}

fn frequency_label(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "Daily",
        Frequency::Weekly => "Weekly",
        Frequency::Monthly => "Monthly",
        Frequency::Yearly => "Yearly",
    }
}

/// Accept a known zone name, suggesting close matches otherwise.
pub fn parse_time_zone(input: &str) -> Result<String> {
    match ExportZone::parse(input) {
        Ok(_) => Ok(input.trim().to_string()),
        Err(e) => {
            let suggestions = suggest_time_zones(input);
            if suggestions.is_empty() {
                Err(e.into())
            } else {
                Err(anyhow!("{e}. Did you mean: {}?", suggestions.join(", ")))
            }
        }
    }
}

fn suggest_time_zones(input: &str) -> Vec<&'static str> {
    let needle = input.trim().to_ascii_lowercase().replace(' ', "_");
    if needle.len() < 3 {
        return Vec::new();
    }
    chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| name.to_ascii_lowercase().contains(&needle))
        .take(5)
        .collect()
}

fn parse_datetime_field(input: &str, required: bool) -> Result<String> {
    if input.is_empty() {
        if required {
            bail!("A date is required here");
        }
        return Ok(String::new());
    }
    parse_datetime(input)
}

/// Parse a date/time answer into its form spelling.
///
/// Exact forms (`2025-03-20`, `2025-03-20T15:00`) are kept as typed. Anything
/// else goes through fuzzydate; inputs without a time stay date-only.
fn parse_datetime(input: &str) -> Result<String> {
    if parse_local_datetime(input).is_some() {
        return Ok(input.to_string());
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(input) {
        Ok(format_local_datetime(&dt))
    } else {
        Ok(dt.date().format("%Y-%m-%d").to_string())
    }
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    let lower = input.to_lowercase();
    lower
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map_or(word, |(_, full)| *full)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the answer names a time of day (am/pm, HH:MM, noon, "at 3").
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'a' || b == b'p') && bytes.get(i + 1) == Some(&b'm') {
            if i > 0 && bytes[i - 1].is_ascii_digit() {
                return true;
            }
            if i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit() {
                return true;
            }
        }
    }

    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let digit_after = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
            if digit_before && digit_after {
                return true;
            }
        }
    }

    let after_at = lower
        .find(" at ")
        .map(|pos| &lower[pos + 4..])
        .or_else(|| lower.strip_prefix("at "));
    after_at.is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Alarm lead time in whole minutes: `15`, `15m`, `1h 30m`, `1day`.
fn parse_alarm(input: &str) -> Result<String> {
    if input.is_empty() {
        return Ok(String::new());
    }
    if let Ok(minutes) = input.parse::<u32>() {
        return Ok(minutes.to_string());
    }

    let duration = humantime::parse_duration(input)
        .map_err(|e| anyhow!("Could not parse alarm \"{}\": {}", input, e))?;
    let secs = duration.as_secs();
    if secs % 60 != 0 {
        bail!("Alarms are set in whole minutes");
    }
    let minutes = u32::try_from(secs / 60).map_err(|_| anyhow!("Alarm is too far ahead"))?;
    Ok(minutes.to_string())
}

fn parse_interval(input: &str) -> Result<String> {
    match input.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n.to_string()),
        _ => bail!("Enter a whole number of at least 1"),
    }
}

fn parse_count(input: &str) -> Result<String> {
    match input.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n.to_string()),
        _ => bail!("Enter how many times it happens, at least 1"),
    }
}

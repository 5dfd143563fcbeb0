//! Terminal rendering for the form and its subforms.
//!
//! Rendering reads the raw fields directly rather than collecting them, so
//! a half-filled subform shows what was typed, with bad dates marked.

use calform_core::collect::parse_local_datetime;
use calform_core::{CalendarHeader, Form, Frequency, ItemFields, ItemKind};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarHeader {
    fn render(&self) -> String {
        let name = match self.name.trim() {
            "" => "(untitled calendar)",
            name => name,
        };
        let zone = match self.time_zone.trim() {
            "" => "floating time",
            zone => zone,
        };
        format!("📅 {} {}", name.bold(), format!("({zone})").dimmed())
    }
}

impl Render for ItemKind {
    fn render(&self) -> String {
        let name = self.as_ics_str();
        match self {
            ItemKind::Event => name.blue().to_string(),
            ItemKind::Todo => name.yellow().to_string(),
            ItemKind::Journal => name.magenta().to_string(),
        }
    }
}

/// One live subform, as listed in the session overview and pickers
pub struct ItemLine<'a> {
    pub index: usize,
    pub fields: &'a ItemFields,
}

impl Render for ItemLine<'_> {
    fn render(&self) -> String {
        let fields = self.fields;
        let kind = match ItemKind::parse(&fields.kind) {
            Some(kind) => kind.render(),
            None => fields.kind.red().to_string(),
        };
        let summary = match fields.summary.trim() {
            "" => "(no summary)".dimmed().to_string(),
            summary => summary.to_string(),
        };

        let mut line = format!("{} {} {}", format!("[{}]", self.index).dimmed(), kind, summary);

        let start = render_time(&fields.start);
        let end = render_time(&fields.end);
        match (start, end) {
            (Some(start), Some(end)) => line.push_str(&format!("  {start} → {end}")),
            (Some(start), None) => line.push_str(&format!("  {start}")),
            (None, Some(end)) => line.push_str(&format!("  {} {end}", "due".dimmed())),
            (None, None) => {}
        }

        if let Some(frequency) = Frequency::parse(&fields.frequency) {
            let every = match fields.interval.trim().parse::<u32>() {
                Ok(n) if n > 1 => format!("every {n} {}s", frequency.unit()),
                _ => format!("every {}", frequency.unit()),
            };
            line.push_str(&format!("  {}", format!("↻ {every}").cyan()));
        }

        if !fields.alarm.trim().is_empty() {
            line.push_str(&format!("  🔔 {}", fields.alarm.trim()));
        }

        line
    }
}

fn render_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match parse_local_datetime(raw) {
        Some(dt) => Some(dt.format("%Y-%m-%d %H:%M").to_string()),
        None => Some(format!("{raw} (invalid)").red().to_string()),
    }
}

impl Render for Form {
    fn render(&self) -> String {
        let mut lines = vec![self.header.render()];

        if self.items().is_empty() {
            lines.push(format!("   {}", "No items yet".dimmed()));
        }
        for (index, _, fields) in self.items().iter() {
            lines.push(format!("   {}", ItemLine { index, fields }.render()));
        }

        lines.join("\n")
    }
}

//! Output formats and serializer dispatch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalFormResult;
use crate::form::CalendarHeader;
use crate::item::CalendarItem;
use crate::{csv, ics, json, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Ics,
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Ics,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Text,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ics => "ics",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }

    /// Convert collected items to this format.
    pub fn serialize(
        &self,
        header: &CalendarHeader,
        items: &[CalendarItem],
        generated_at: DateTime<Utc>,
    ) -> CalFormResult<String> {
        tracing::debug!(format = %self, items = items.len(), "serializing");
        match self {
            ExportFormat::Ics => ics::generate_ics(header, items, generated_at),
            ExportFormat::Json => json::to_json(items),
            ExportFormat::Csv => Ok(csv::to_csv(items)),
            ExportFormat::Text => Ok(text::to_text(items)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Ics => "ics",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "text",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ics" | "ical" | "icalendar" => Ok(ExportFormat::Ics),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(format!(
                "Unknown format '{other}'. Expected one of: ics, json, csv, text"
            )),
        }
    }
}

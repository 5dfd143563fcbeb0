//! Collected calendar item types.
//!
//! A `CalendarItem` is the typed record the field collector produces from an
//! item's raw form fields. Every serializer works exclusively with these.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned to an item when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        ItemId(Uuid::new_v4())
    }

    /// Value used for the iCalendar UID property.
    pub fn to_uid(&self) -> String {
        format!("{}@calform", self.0)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three calendar-object kinds an item can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    #[serde(rename = "VEVENT")]
    Event,
    #[serde(rename = "VTODO")]
    Todo,
    #[serde(rename = "VJOURNAL")]
    Journal,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Event, ItemKind::Todo, ItemKind::Journal];

    /// Parse a type field. Accepts component names and plain words, any case.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "VEVENT" | "EVENT" => Some(ItemKind::Event),
            "VTODO" | "TODO" | "TASK" => Some(ItemKind::Todo),
            "VJOURNAL" | "JOURNAL" | "NOTE" => Some(ItemKind::Journal),
            _ => None,
        }
    }

    /// iCalendar component name
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            ItemKind::Event => "VEVENT",
            ItemKind::Todo => "VTODO",
            ItemKind::Journal => "VJOURNAL",
        }
    }

    /// Human-readable label for menus and prompts
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Event => "event",
            ItemKind::Todo => "todo",
            ItemKind::Journal => "journal entry",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ics_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn as_ics_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Unit noun used in plain-text output ("every 2 weeks")
    pub fn unit(&self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        }
    }
}

/// When a recurrence stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceEnd {
    Never,
    /// Total number of occurrences, including the first
    Count(u32),
    /// Last allowed occurrence, in the calendar's local time
    Until(NaiveDateTime),
}

impl RecurrenceEnd {
    /// Value of the CSV/form "End Condition" field
    pub fn condition_name(&self) -> &'static str {
        match self {
            RecurrenceEnd::Never => "never",
            RecurrenceEnd::Count(_) => "count",
            RecurrenceEnd::Until(_) => "until",
        }
    }
}

/// Recurrence descriptor. Emitted as an RRULE, never expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub end: RecurrenceEnd,
}

/// Reminder lead time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alarm {
    pub minutes_before: u32,
}

/// A calendar item as collected from its form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub summary: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "alarm_minutes")]
    pub alarm: Option<Alarm>,
    pub recurrence: Option<Recurrence>,
    #[serde(skip)]
    pub invalid_dates: InvalidDates,
}

/// Date text the collector could not read, so CSV export can hand it back
/// unchanged instead of blanking the cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidDates {
    pub start: Option<String>,
    pub end: Option<String>,
}

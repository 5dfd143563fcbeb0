//! Raw form fields of a calendar item.

use std::fmt;

use crate::item::ItemKind;

/// One input of an item subform. The declaration order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Type,
    Summary,
    Start,
    End,
    Location,
    Description,
    Alarm,
    Frequency,
    Interval,
    EndCondition,
    EndValue,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Type,
        Field::Summary,
        Field::Start,
        Field::End,
        Field::Location,
        Field::Description,
        Field::Alarm,
        Field::Frequency,
        Field::Interval,
        Field::EndCondition,
        Field::EndValue,
    ];

    /// Column title in the CSV header row
    pub fn header(&self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::Summary => "Summary",
            Field::Start => "Start",
            Field::End => "End",
            Field::Location => "Location",
            Field::Description => "Description",
            Field::Alarm => "Alarm",
            Field::Frequency => "Frequency",
            Field::Interval => "Interval",
            Field::EndCondition => "End Condition",
            Field::EndValue => "End Value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The current value of every input of an item subform, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFields {
    pub kind: String,
    pub summary: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    pub alarm: String,
    pub frequency: String,
    pub interval: String,
    pub end_condition: String,
    pub end_value: String,
}

impl ItemFields {
    /// Blank subform for a new item of the given kind
    pub fn new(kind: ItemKind) -> Self {
        ItemFields {
            kind: kind.as_ics_str().to_string(),
            ..Default::default()
        }
    }

    /// Build fields from a row of values in CSV column order. Missing values are empty.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Self {
        let mut fields = ItemFields::default();
        for (field, value) in Field::ALL.iter().zip(row) {
            fields.set(*field, value.as_ref());
        }
        fields
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Type => &self.kind,
            Field::Summary => &self.summary,
            Field::Start => &self.start,
            Field::End => &self.end,
            Field::Location => &self.location,
            Field::Description => &self.description,
            Field::Alarm => &self.alarm,
            Field::Frequency => &self.frequency,
            Field::Interval => &self.interval,
            Field::EndCondition => &self.end_condition,
            Field::EndValue => &self.end_value,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Type => &mut self.kind,
            Field::Summary => &mut self.summary,
            Field::Start => &mut self.start,
            Field::End => &mut self.end,
            Field::Location => &mut self.location,
            Field::Description => &mut self.description,
            Field::Alarm => &mut self.alarm,
            Field::Frequency => &mut self.frequency,
            Field::Interval => &mut self.interval,
            Field::EndCondition => &mut self.end_condition,
            Field::EndValue => &mut self.end_value,
        };
        *slot = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_row_follows_column_order() {
        let fields = ItemFields::from_row(&["VTODO", "Pay rent", "2025-04-01"]);
        assert_eq!(fields.kind, "VTODO");
        assert_eq!(fields.summary, "Pay rent");
        assert_eq!(fields.start, "2025-04-01");
        assert_eq!(fields.end, "");
        assert_eq!(fields.end_value, "");
    }

    #[test]
    fn set_then_get_every_field() {
        let mut fields = ItemFields::default();
        for (i, field) in Field::ALL.iter().enumerate() {
            fields.set(*field, format!("v{i}"));
        }
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(fields.get(*field), format!("v{i}"));
        }
    }
}

//! The calendar-wide time zone applied to every local date-time at export.

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::Property;

use crate::error::{CalFormError, CalFormResult};

const ICS_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportZone {
    /// No zone configured: times are written as floating local times
    Floating,
    /// Times are UTC and carry the `Z` suffix
    Utc,
    /// Times carry a `TZID` parameter
    Named(Tz),
}

impl ExportZone {
    /// Parse the header's time zone field. Empty means floating.
    pub fn parse(name: &str) -> CalFormResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(ExportZone::Floating);
        }
        if name.eq_ignore_ascii_case("UTC") || name.eq_ignore_ascii_case("Z") {
            return Ok(ExportZone::Utc);
        }
        name.parse::<Tz>()
            .map(ExportZone::Named)
            .map_err(|_| CalFormError::UnknownTimeZone(name.to_string()))
    }

    /// Zone name for the X-WR-TIMEZONE calendar property
    pub fn name(&self) -> Option<&'static str> {
        match self {
            ExportZone::Floating => None,
            ExportZone::Utc => Some("UTC"),
            ExportZone::Named(tz) => Some(tz.name()),
        }
    }

    /// Build a date-time property such as DTSTART in this zone.
    pub fn property(&self, name: &str, dt: &NaiveDateTime) -> Property {
        let local = dt.format(ICS_LOCAL_FORMAT).to_string();
        match self {
            ExportZone::Floating => Property::new(name, local),
            ExportZone::Utc => Property::new(name, format!("{local}Z")),
            ExportZone::Named(tz) => Property::new(name, local)
                .add_parameter("TZID", tz.name())
                .done(),
        }
    }

    /// Render an RRULE `UNTIL` value.
    ///
    /// RFC 5545 requires UNTIL in UTC whenever DTSTART is zoned, so local times
    /// in a named zone are converted. Floating starts keep a floating UNTIL.
    pub fn until_value(&self, dt: &NaiveDateTime) -> CalFormResult<String> {
        match self {
            ExportZone::Floating => Ok(dt.format(ICS_LOCAL_FORMAT).to_string()),
            ExportZone::Utc => Ok(format!("{}Z", dt.format(ICS_LOCAL_FORMAT))),
            ExportZone::Named(tz) => {
                let zoned = tz.from_local_datetime(dt).earliest().ok_or_else(|| {
                    CalFormError::NonexistentLocalTime {
                        datetime: dt.to_string(),
                        tz: tz.name().to_string(),
                    }
                })?;
                let utc = zoned.with_timezone(&Utc);
                Ok(format!("{}Z", utc.format(ICS_LOCAL_FORMAT)))
            }
        }
    }
}

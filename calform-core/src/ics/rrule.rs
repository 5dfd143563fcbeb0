//! RRULE assembly from a recurrence descriptor.

use crate::error::CalFormResult;
use crate::ics::zone::ExportZone;
use crate::item::{Recurrence, RecurrenceEnd};

/// Build the value of an RRULE property, e.g. `FREQ=WEEKLY;INTERVAL=2;COUNT=5`.
pub fn rrule_value(recurrence: &Recurrence, zone: &ExportZone) -> CalFormResult<String> {
    let mut parts = vec![format!("FREQ={}", recurrence.frequency.as_ics_str())];

    // INTERVAL=1 is the default
    if recurrence.interval > 1 {
        parts.push(format!("INTERVAL={}", recurrence.interval));
    }

    match recurrence.end {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Count(n) => parts.push(format!("COUNT={n}")),
        RecurrenceEnd::Until(dt) => parts.push(format!("UNTIL={}", zone.until_value(&dt)?)),
    }

    Ok(parts.join(";"))
}

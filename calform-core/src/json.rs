//! JSON export.

use crate::error::{CalFormError, CalFormResult};
use crate::item::CalendarItem;

/// Pretty-printed JSON array of collected records.
pub fn to_json(items: &[CalendarItem]) -> CalFormResult<String> {
    serde_json::to_string_pretty(items).map_err(|e| CalFormError::Serialization(e.to_string()))
}

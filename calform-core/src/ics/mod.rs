//! ICS file generation.
//!
//! Components are built with the icalendar crate, which escapes TEXT values
//! and folds content lines, then trimmed of what RFC 5545 does not require.

mod generate;
mod rrule;
mod zone;

pub use generate::generate_ics;
pub use zone::ExportZone;
